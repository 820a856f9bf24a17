use crate::analyzers::types::{ComposedSeries, ForecastSeries, YearlySeries};
use std::iter;

/// Lays observed averages and forecast values out on one shared axis.
///
/// Both tracks have length `n + k`: observed values then `k` empty slots, and
/// `n` empty slots then forecast values.
pub fn compose(series: &YearlySeries, forecast: &ForecastSeries) -> ComposedSeries {
    let n = series.len();
    let k = forecast.len();

    ComposedSeries {
        labels: series.labels().chain(forecast.labels()).collect(),
        observed: series
            .averages()
            .map(Some)
            .chain(iter::repeat_n(None, k))
            .collect(),
        forecast: iter::repeat_n(None, n)
            .chain(forecast.values().map(Some))
            .collect(),
    }
}
