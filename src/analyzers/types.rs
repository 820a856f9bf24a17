//! Data types used by the trend pipeline.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::stats::Summary;

/// Number of periods projected past the last observed year unless configured.
pub const DEFAULT_HORIZON: usize = 3;

/// Mean quality index for one calendar year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyAggregate {
    pub year: i32,
    pub average: f64,
    pub count: usize,
    pub stddev: f64,
}

/// Yearly aggregates in ascending calendar order, one per year with data.
///
/// Years without records are absent, so the position of an entry counts
/// "years with data", not calendar years. See [`YearlySeries::gap_years`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct YearlySeries {
    entries: Vec<YearlyAggregate>,
}

impl YearlySeries {
    /// Builds a series, ordering entries by year.
    pub fn new(mut entries: Vec<YearlyAggregate>) -> Self {
        entries.sort_by_key(|e| e.year);
        Self { entries }
    }

    /// Builds a series from `(year, average)` pairs, one record per year.
    pub fn from_averages(pairs: impl IntoIterator<Item = (i32, f64)>) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(year, average)| YearlyAggregate {
                    year,
                    average,
                    count: 1,
                    stddev: 0.0,
                })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[YearlyAggregate] {
        &self.entries
    }

    pub fn averages(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|e| e.average)
    }

    pub fn labels(&self) -> impl Iterator<Item = String> + '_ {
        self.entries.iter().map(|e| e.year.to_string())
    }

    pub fn last_year(&self) -> Option<i32> {
        self.entries.last().map(|e| e.year)
    }

    /// Calendar years strictly inside the observed range that have no records.
    pub fn gap_years(&self) -> Vec<i32> {
        self.entries
            .windows(2)
            .flat_map(|w| (w[0].year + 1)..w[1].year)
            .collect()
    }

    /// True when every year between the first and last observation has data.
    pub fn is_contiguous(&self) -> bool {
        self.entries.windows(2).all(|w| w[1].year == w[0].year + 1)
    }
}

/// Fitted line `average ≈ slope * index + intercept`, where `index` is the
/// zero-based position within a [`YearlySeries`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendModel {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendModel {
    /// Model used when fewer than two points are available.
    pub const ZERO: TrendModel = TrendModel {
        slope: 0.0,
        intercept: 0.0,
    };

    pub fn value_at(&self, index: usize) -> f64 {
        self.slope * index as f64 + self.intercept
    }
}

/// Position of a forecast period relative to the last observed year.
///
/// Renders as `+1`, `+2`, ... Only maps onto a calendar year when the
/// observed series has no gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeriodOffset(u32);

impl PeriodOffset {
    /// Offset of the `j`-th forecast period (zero-based), i.e. `+(j + 1)`.
    pub fn nth(j: usize) -> Self {
        PeriodOffset(j as u32 + 1)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn after(self, year: i32) -> i32 {
        year + self.0 as i32
    }
}

impl fmt::Display for PeriodOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{}", self.0)
    }
}

impl Serialize for PeriodOffset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub offset: PeriodOffset,
    pub value: f64,
    /// Set only when the observed years are contiguous.
    pub calendar_year: Option<i32>,
}

/// Projected values for the periods following the observed series.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ForecastSeries {
    points: Vec<ForecastPoint>,
}

impl ForecastSeries {
    pub fn new(points: Vec<ForecastPoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub(crate) fn points_mut(&mut self) -> &mut [ForecastPoint] {
        &mut self.points
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    pub fn labels(&self) -> impl Iterator<Item = String> + '_ {
        self.points.iter().map(|p| p.offset.to_string())
    }
}

/// Observed and forecast tracks aligned on one label axis.
///
/// `None` marks positions where a track has no value; it serializes as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComposedSeries {
    pub labels: Vec<String>,
    #[serde(rename = "observedTrack")]
    pub observed: Vec<Option<f64>>,
    #[serde(rename = "forecastTrack")]
    pub forecast: Vec<Option<f64>>,
}

impl ComposedSeries {
    /// `(label, observed, forecast)` per axis position.
    pub fn rows(&self) -> impl Iterator<Item = (&str, Option<f64>, Option<f64>)> + '_ {
        self.labels
            .iter()
            .zip(&self.observed)
            .zip(&self.forecast)
            .map(|((label, observed), forecast)| (label.as_str(), *observed, *forecast))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Number of periods to project.
    pub horizon: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
        }
    }
}

/// Complete result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    #[serde(flatten)]
    pub summary: Summary,
    pub trend_intercept: f64,
    #[serde(flatten)]
    pub series: ComposedSeries,
    pub years: YearlySeries,
    pub gap_years: Vec<i32>,
    pub forecast: ForecastSeries,
}
