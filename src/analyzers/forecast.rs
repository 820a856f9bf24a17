use crate::analyzers::types::{
    ForecastPoint, ForecastSeries, PeriodOffset, TrendModel, YearlySeries,
};

/// Extrapolates `model` for `horizon` periods after `observed` points.
///
/// Period `+(j + 1)` is the line evaluated at index `observed + j`. The points
/// carry no calendar year; see [`forecast_series`].
pub fn forecast(model: &TrendModel, observed: usize, horizon: usize) -> ForecastSeries {
    let points = (0..horizon)
        .map(|j| ForecastPoint {
            offset: PeriodOffset::nth(j),
            value: model.value_at(observed + j),
            calendar_year: None,
        })
        .collect();

    ForecastSeries::new(points)
}

/// Extrapolates past the end of `series`, attaching calendar years to the
/// forecast points only when the observed years are contiguous.
pub fn forecast_series(
    series: &YearlySeries,
    model: &TrendModel,
    horizon: usize,
) -> ForecastSeries {
    let mut projected = forecast(model, series.len(), horizon);

    if series.is_contiguous()
        && let Some(last_year) = series.last_year()
    {
        for point in projected.points_mut() {
            point.calendar_year = Some(point.offset.after(last_year));
        }
    }

    projected
}
