use crate::analyzers::types::{YearlyAggregate, YearlySeries};
use crate::analyzers::utility::{mean, stddev};
use crate::model::Measurement;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Buckets measurements by calendar year and reduces each bucket to the mean
/// quality index.
///
/// Years come out in ascending numeric order regardless of input order. Years
/// with no records are omitted; a warning is logged when that leaves holes in
/// the observed range, since the trend index then skips those years.
pub fn yearly_series(measurements: &[Measurement]) -> YearlySeries {
    let mut buckets: BTreeMap<i32, Vec<f64>> = BTreeMap::new();

    for m in measurements {
        buckets.entry(m.year()).or_default().push(m.quality_index);
    }

    let entries = buckets
        .into_iter()
        .map(|(year, values)| {
            let average = mean(values.iter().copied());
            YearlyAggregate {
                year,
                average,
                count: values.len(),
                stddev: stddev(&values, average),
            }
        })
        .collect();

    let series = YearlySeries::new(entries);

    let gaps = series.gap_years();
    if !gaps.is_empty() {
        warn!(
            ?gaps,
            "Observed years are not contiguous; trend indices count years with data only"
        );
    }
    debug!(
        records = measurements.len(),
        years = series.len(),
        "Yearly series aggregated"
    );

    series
}
