use serde::Serialize;

/// Slopes within this many AQI points per year of zero count as stable.
pub const STABLE_SLOPE_TOLERANCE: f64 = 0.05;

/// US EPA AQI category for an index value.
///
/// | Range       | Category                       |
/// |-------------|--------------------------------|
/// | <= 50       | Good                           |
/// | <= 100      | Moderate                       |
/// | <= 150      | Unhealthy for Sensitive Groups |
/// | <= 200      | Unhealthy                      |
/// | <= 300      | Very Unhealthy                 |
/// | > 300       | Hazardous                      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    pub fn from_index(aqi: f64) -> Self {
        match aqi {
            a if a <= 50.0 => AqiCategory::Good,
            a if a <= 100.0 => AqiCategory::Moderate,
            a if a <= 150.0 => AqiCategory::UnhealthyForSensitiveGroups,
            a if a <= 200.0 => AqiCategory::Unhealthy,
            a if a <= 300.0 => AqiCategory::VeryUnhealthy,
            _ => AqiCategory::Hazardous,
        }
    }
}

/// Direction of the fitted trend. A rising index means worsening air.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Stable,
    Worsening,
}

impl TrendDirection {
    pub fn from_slope(slope: f64) -> Self {
        match slope {
            s if s > STABLE_SLOPE_TOLERANCE => TrendDirection::Worsening,
            s if s < -STABLE_SLOPE_TOLERANCE => TrendDirection::Improving,
            _ => TrendDirection::Stable,
        }
    }
}
