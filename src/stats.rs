//! Summary scalars over a measurement sequence.
//!
//! Each is computed straight from the measurements; none needs the composed
//! chart series.

use serde::Serialize;

use crate::analyzers::aggregate::yearly_series;
use crate::analyzers::grade::{AqiCategory, TrendDirection};
use crate::analyzers::regression::fit_series;
use crate::analyzers::utility::{max, mean};
use crate::model::Measurement;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub record_count: usize,
    /// Mean quality index over all records; 0.0 when there are none.
    pub average_index: f64,
    /// Highest PM2.5 reading; `None` when there are no records.
    pub max_secondary: Option<f64>,
    pub trend_slope: f64,
    /// Category of `average_index`; `None` when there are no records.
    pub category: Option<AqiCategory>,
    pub direction: TrendDirection,
}

impl Summary {
    pub fn from_measurements(measurements: &[Measurement]) -> Self {
        Self::with_slope(measurements, trend_slope(measurements))
    }

    /// Builds the summary around an already fitted slope.
    pub fn with_slope(measurements: &[Measurement], slope: f64) -> Self {
        let average = average_index(measurements);
        Summary {
            record_count: measurements.len(),
            average_index: average,
            max_secondary: max_secondary(measurements),
            trend_slope: slope,
            category: (!measurements.is_empty()).then(|| AqiCategory::from_index(average)),
            direction: TrendDirection::from_slope(slope),
        }
    }
}

pub fn average_index(measurements: &[Measurement]) -> f64 {
    mean(measurements.iter().map(|m| m.quality_index))
}

pub fn max_secondary(measurements: &[Measurement]) -> Option<f64> {
    max(measurements.iter().map(|m| m.particulate_level))
}

/// Slope of the yearly trend, without forecasting or composing series.
pub fn trend_slope(measurements: &[Measurement]) -> f64 {
    fit_series(&yearly_series(measurements)).slope
}
