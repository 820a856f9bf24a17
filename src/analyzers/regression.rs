//! Ordinary least-squares trend over yearly aggregates.
//!
//! The regressor is the position of each value in the series (0, 1, 2, ...),
//! not the calendar year.

use crate::analyzers::types::{TrendModel, YearlySeries};
use tracing::debug;

/// Fits `v[i] ≈ slope * i + intercept` with the closed-form OLS solution.
///
/// Fewer than two points yield [`TrendModel::ZERO`]. For `n >= 2` the
/// denominator `n·Σi² − (Σi)²` equals `n²(n²−1)/12` and is never zero.
pub fn fit_trend(values: &[f64]) -> TrendModel {
    let n = values.len();
    if n < 2 {
        debug!(points = n, "Too few points for a trend fit, using zero model");
        return TrendModel::ZERO;
    }

    let n = n as f64;
    let (sum_x, sum_y, sum_xy, sum_x2) = values.iter().enumerate().fold(
        (0.0, 0.0, 0.0, 0.0),
        |(sx, sy, sxy, sx2), (i, &y)| {
            let x = i as f64;
            (sx + x, sy + y, sxy + x * y, sx2 + x * x)
        },
    );

    let denominator = n * sum_x2 - sum_x * sum_x;
    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;

    TrendModel { slope, intercept }
}

/// Fits the trend over a series' yearly averages.
pub fn fit_series(series: &YearlySeries) -> TrendModel {
    let averages: Vec<f64> = series.averages().collect();
    fit_trend(&averages)
}
