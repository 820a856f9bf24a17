use crate::analyzers::aggregate::yearly_series;
use crate::analyzers::compose::compose;
use crate::analyzers::forecast::forecast_series;
use crate::analyzers::regression::fit_series;
use crate::analyzers::types::{AnalysisConfig, TrendReport};
use crate::model::Measurement;
use crate::services::record_store::RecordStore;
use crate::stats::Summary;
use anyhow::Result;
use tracing::{debug, info};

/// Runs the full pipeline: yearly aggregation, trend fit, forecast, and
/// composition of the chart series.
///
/// Pure: the same measurements always produce the same report.
pub fn analyze(measurements: &[Measurement], config: &AnalysisConfig) -> TrendReport {
    let years = yearly_series(measurements);
    let model = fit_series(&years);
    let forecast = forecast_series(&years, &model, config.horizon);
    let series = compose(&years, &forecast);

    debug!(
        slope = model.slope,
        intercept = model.intercept,
        horizon = config.horizon,
        "Trend fitted"
    );

    TrendReport {
        summary: Summary::with_slope(measurements, model.slope),
        trend_intercept: model.intercept,
        series,
        gap_years: years.gap_years(),
        years,
        forecast,
    }
}

/// Loads all records from `store` and analyzes them.
#[tracing::instrument(skip(store, config), fields(horizon = config.horizon))]
pub async fn analyze_source(
    store: &dyn RecordStore,
    config: &AnalysisConfig,
) -> Result<TrendReport> {
    let measurements = store.load().await?;
    info!(records = measurements.len(), "Records loaded");

    let report = analyze(&measurements, config);
    info!(
        years = report.years.len(),
        slope = report.summary.trend_slope,
        "Analysis complete"
    );

    Ok(report)
}
