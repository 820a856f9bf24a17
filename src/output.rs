//! Output formatting for trend reports.
//!
//! Supports debug pretty-printing, JSON, a plain-text table, and CSV export of
//! the composed chart series. Everything is written to a caller-supplied
//! writer; nothing is persisted.

use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use std::io::Write;
use tracing::debug;

use crate::analyzers::types::{ComposedSeries, TrendReport};

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &TrendReport) {
    debug!("{:#?}", report);
}

/// Writes any serializable result as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(mut writer: W, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    Ok(())
}

/// Writes the composed series as CSV rows `label,observed,forecast`.
///
/// Positions without a value are left as empty cells.
pub fn write_series_csv<W: Write>(writer: W, series: &ComposedSeries) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);

    writer.write_record(["label", "observed", "forecast"])?;
    for row in series.rows() {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes a human-readable summary followed by the aligned series table.
pub fn write_table<W: Write>(mut writer: W, report: &TrendReport) -> Result<()> {
    let summary = &report.summary;

    writeln!(writer, "Records:        {}", summary.record_count)?;
    writeln!(writer, "Average AQI:    {:.1}", summary.average_index)?;
    match summary.max_secondary {
        Some(max) => writeln!(writer, "Max PM2.5:      {max}")?,
        None => writeln!(writer, "Max PM2.5:      -")?,
    }
    writeln!(
        writer,
        "Trend slope:    {:.2} ({:?})",
        summary.trend_slope, summary.direction
    )?;
    if !report.gap_years.is_empty() {
        writeln!(writer, "Years missing:  {:?}", report.gap_years)?;
    }
    writeln!(writer)?;

    writeln!(writer, "{:<8} {:>10} {:>10}", "period", "observed", "forecast")?;
    for (label, observed, forecast) in report.series.rows() {
        writeln!(
            writer,
            "{:<8} {:>10} {:>10}",
            label,
            cell(observed),
            cell(forecast)
        )?;
    }

    Ok(())
}

fn cell(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::analyzer::analyze;
    use crate::analyzers::types::AnalysisConfig;
    use crate::model::Measurement;
    use chrono::NaiveDate;

    fn report() -> TrendReport {
        let records: Vec<Measurement> = [(2019, 80.0), (2020, 90.0), (2021, 100.0)]
            .into_iter()
            .map(|(y, aqi)| Measurement::new(NaiveDate::from_ymd_opt(y, 1, 1).unwrap(), aqi, 5.0))
            .collect();
        analyze(&records, &AnalysisConfig::default())
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&report());
    }

    #[test]
    fn test_write_json_round_trips_as_value() {
        let mut buf = Vec::new();
        write_json(&mut buf, &report()).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["trendSlope"], 10.0);
        assert!(buf.ends_with(b"\n"));
    }

    #[test]
    fn test_series_csv_leaves_missing_cells_empty() {
        let mut buf = Vec::new();
        write_series_csv(&mut buf, &report().series).unwrap();

        let content = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "label,observed,forecast");
        assert_eq!(lines[1], "2019,80.0,");
        assert_eq!(lines[4], "+1,,110.0");
    }

    #[test]
    fn test_table_lists_every_period() {
        let mut buf = Vec::new();
        write_table(&mut buf, &report()).unwrap();

        let content = String::from_utf8(buf).unwrap();
        assert!(content.contains("Average AQI:    90.0"));
        assert!(content.contains("Trend slope:    10.00 (Worsening)"));
        for label in ["2019", "2020", "2021", "+1", "+2", "+3"] {
            assert!(content.lines().any(|l| l.starts_with(label)));
        }
    }
}
