//! Measurement record consumed by the analytics engine.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// One air-quality observation.
///
/// `particulate_level` (PM2.5) only feeds the summary maximum; the trend is
/// fitted on `quality_index` alone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub timestamp: NaiveDate,
    pub quality_index: f64,
    pub particulate_level: f64,
}

impl Measurement {
    pub fn new(timestamp: NaiveDate, quality_index: f64, particulate_level: f64) -> Self {
        Self {
            timestamp,
            quality_index,
            particulate_level,
        }
    }

    /// Calendar year used for yearly bucketing.
    pub fn year(&self) -> i32 {
        self.timestamp.year()
    }
}
