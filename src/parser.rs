//! Decoders for raw air-quality records.
//!
//! Both JSON (an array of `{ "date", "aqi", "pm25" }` objects) and CSV (header
//! row `date,aqi,pm25`) are accepted. A single bad record rejects the whole
//! input.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::model::Measurement;

const FIELD_DATE: &str = "date";
const FIELD_AQI: &str = "aqi";
const FIELD_PM25: &str = "pm25";

/// Length of `YYYY-MM-DDTHH:MM`.
const MINUTE_PRECISION_LEN: usize = 16;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Json,
    Csv,
}

impl RecordFormat {
    /// Infers the format from a file extension, defaulting to JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => RecordFormat::Csv,
            _ => RecordFormat::Json,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    date: Option<Value>,
    #[serde(default)]
    aqi: Option<Value>,
    #[serde(default)]
    pm25: Option<Value>,
}

/// Decodes raw bytes in the given format into measurements.
///
/// # Errors
///
/// Returns [`EngineError::MalformedDocument`] if the bytes are not a JSON array
/// or a CSV table with the expected header, and [`EngineError::MalformedInput`]
/// for the first record whose date or numeric fields cannot be parsed.
pub fn parse_records(bytes: &[u8], format: RecordFormat) -> EngineResult<Vec<Measurement>> {
    let records = match format {
        RecordFormat::Json => parse_json(bytes)?,
        RecordFormat::Csv => parse_csv(bytes)?,
    };
    debug!(count = records.len(), ?format, "Records decoded");
    Ok(records)
}

fn parse_json(bytes: &[u8]) -> EngineResult<Vec<Measurement>> {
    let raw: Vec<RawRecord> = serde_json::from_slice(bytes)
        .map_err(|e| EngineError::MalformedDocument(e.to_string()))?;

    raw.iter()
        .enumerate()
        .map(|(index, r)| {
            let date = match &r.date {
                Some(Value::String(s)) => parse_timestamp(index, s)?,
                Some(other) => {
                    return Err(EngineError::malformed(
                        index,
                        FIELD_DATE,
                        format!("expected a date string, got {other}"),
                    ));
                }
                None => return Err(EngineError::malformed(index, FIELD_DATE, "missing")),
            };
            let aqi = json_number(index, FIELD_AQI, r.aqi.as_ref())?;
            let pm25 = json_number(index, FIELD_PM25, r.pm25.as_ref())?;
            Ok(Measurement::new(date, aqi, pm25))
        })
        .collect()
}

fn parse_csv(bytes: &[u8]) -> EngineResult<Vec<Measurement>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(bytes);

    let headers = rdr
        .headers()
        .map_err(|e| EngineError::MalformedDocument(e.to_string()))?
        .clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| EngineError::MalformedDocument(format!("missing column `{name}`")))
    };
    let date_col = column(FIELD_DATE)?;
    let aqi_col = column(FIELD_AQI)?;
    let pm25_col = column(FIELD_PM25)?;

    let mut records = Vec::new();
    for (index, row) in rdr.records().enumerate() {
        let row = row.map_err(|e| EngineError::malformed(index, "row", e.to_string()))?;
        let cell = |col: usize, field: &'static str| {
            row.get(col)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| EngineError::malformed(index, field, "missing"))
        };

        let date = parse_timestamp(index, cell(date_col, FIELD_DATE)?)?;
        let aqi = parse_number(index, FIELD_AQI, cell(aqi_col, FIELD_AQI)?)?;
        let pm25 = parse_number(index, FIELD_PM25, cell(pm25_col, FIELD_PM25)?)?;
        records.push(Measurement::new(date, aqi, pm25));
    }

    Ok(records)
}

/// Parses a record timestamp down to its calendar date.
///
/// RFC 3339 timestamps keep the date as written in their own offset. Only the
/// year matters downstream, so `YYYY-MM` and `YYYY` map to the first day of
/// that month or year.
pub fn parse_timestamp(index: usize, raw: &str) -> EngineResult<NaiveDate> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.date_naive());
    }

    // Minute precision with a zone, e.g. `2021-03-04T10:00Z`.
    if let Some((minutes, zone)) = raw.split_at_checked(MINUTE_PRECISION_LEN)
        && zone.starts_with(['Z', 'z', '+', '-'])
        && let Ok(dt) = DateTime::parse_from_rfc3339(&format!("{minutes}:00{zone}"))
    {
        return Ok(dt.date_naive());
    }

    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(dt.date());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }

    if let Ok(date) = NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d") {
        return Ok(date);
    }

    if raw.len() == 4
        && raw.bytes().all(|b| b.is_ascii_digit())
        && let Some(date) = raw
            .parse()
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
    {
        return Ok(date);
    }

    Err(EngineError::malformed(
        index,
        FIELD_DATE,
        format!("unrecognized timestamp {raw:?}"),
    ))
}

fn json_number(index: usize, field: &'static str, value: Option<&Value>) -> EngineResult<f64> {
    match value {
        None | Some(Value::Null) => Err(EngineError::malformed(index, field, "missing")),
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()).ok_or_else(|| {
            EngineError::malformed(index, field, format!("not a finite number: {n}"))
        }),
        Some(Value::String(s)) => parse_number(index, field, s),
        Some(other) => Err(EngineError::malformed(
            index,
            field,
            format!("expected a number, got {other}"),
        )),
    }
}

fn parse_number(index: usize, field: &'static str, raw: &str) -> EngineResult<f64> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(EngineError::malformed(
            index,
            field,
            format!("not a finite number: {raw:?}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_empty_json_array() {
        let records = parse_records(b"[]", RecordFormat::Json).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_json_numbers_and_numeric_strings() {
        let body = br#"[
            {"date": "2021-03-04", "aqi": 55, "pm25": 12.5},
            {"date": "2021-03-05T08:30:00Z", "aqi": "61.5", "pm25": "14"}
        ]"#;
        let records = parse_records(body, RecordFormat::Json).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0], Measurement::new(date(2021, 3, 4), 55.0, 12.5));
        assert_eq!(records[1], Measurement::new(date(2021, 3, 5), 61.5, 14.0));
    }

    #[test]
    fn test_parse_json_ignores_extra_fields() {
        let body =
            br#"[{"_id": "x1", "city": "Delhi", "date": "2020-01-01", "aqi": 300, "pm25": 210}]"#;
        let records = parse_records(body, RecordFormat::Json).unwrap();
        assert_eq!(records[0].quality_index, 300.0);
    }

    #[test]
    fn test_parse_json_bad_number_reports_index_and_field() {
        let body = br#"[
            {"date": "2021-01-01", "aqi": 10, "pm25": 1},
            {"date": "2021-01-02", "aqi": "high", "pm25": 1}
        ]"#;
        let err = parse_records(body, RecordFormat::Json).unwrap_err();
        assert!(matches!(
            err,
            EngineError::MalformedInput { index: 1, field: "aqi", .. }
        ));
    }

    #[test]
    fn test_parse_json_missing_pm25() {
        let body = br#"[{"date": "2021-01-01", "aqi": 10}]"#;
        let err = parse_records(body, RecordFormat::Json).unwrap_err();
        assert!(matches!(
            err,
            EngineError::MalformedInput { index: 0, field: "pm25", .. }
        ));
    }

    #[test]
    fn test_parse_json_bad_date_fails() {
        let body = br#"[{"date": "last tuesday", "aqi": 10, "pm25": 1}]"#;
        let err = parse_records(body, RecordFormat::Json).unwrap_err();
        assert!(matches!(
            err,
            EngineError::MalformedInput { index: 0, field: "date", .. }
        ));
    }

    #[test]
    fn test_parse_json_numeric_date_fails() {
        let body = br#"[{"date": 2021, "aqi": 10, "pm25": 1}]"#;
        assert!(parse_records(body, RecordFormat::Json).is_err());
    }

    #[test]
    fn test_parse_json_not_an_array() {
        let err = parse_records(br#"{"date": "2021-01-01"}"#, RecordFormat::Json).unwrap_err();
        assert!(matches!(err, EngineError::MalformedDocument(_)));
    }

    #[test]
    fn test_parse_csv() {
        let body = b"date,aqi,pm25\n2019-06-01,80,20.5\n2020-06-01 , 90 , 22\n";
        let records = parse_records(body, RecordFormat::Csv).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1], Measurement::new(date(2020, 6, 1), 90.0, 22.0));
    }

    #[test]
    fn test_parse_csv_column_order_is_free() {
        let body = b"pm25,date,aqi\n3,2019-06-01,80\n";
        let records = parse_records(body, RecordFormat::Csv).unwrap();
        assert_eq!(records[0], Measurement::new(date(2019, 6, 1), 80.0, 3.0));
    }

    #[test]
    fn test_parse_csv_missing_column() {
        let body = b"date,aqi\n2019-06-01,80\n";
        let err = parse_records(body, RecordFormat::Csv).unwrap_err();
        assert!(matches!(err, EngineError::MalformedDocument(_)));
    }

    #[test]
    fn test_parse_csv_empty_cell() {
        let body = b"date,aqi,pm25\n2019-06-01,80,1\n2019-06-02,,1\n";
        let err = parse_records(body, RecordFormat::Csv).unwrap_err();
        assert!(matches!(
            err,
            EngineError::MalformedInput { index: 1, field: "aqi", .. }
        ));
    }

    #[test]
    fn test_parse_csv_rejects_nan() {
        let body = b"date,aqi,pm25\n2019-06-01,NaN,1\n";
        assert!(parse_records(body, RecordFormat::Csv).is_err());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert_eq!(parse_timestamp(0, "2022-11-30").unwrap(), date(2022, 11, 30));
        assert_eq!(
            parse_timestamp(0, "2022-11-30T23:15:00").unwrap(),
            date(2022, 11, 30)
        );
        assert_eq!(
            parse_timestamp(0, "2022-11-30 23:15:00.250").unwrap(),
            date(2022, 11, 30)
        );
        assert_eq!(
            parse_timestamp(0, "2022-11-30T23:15:00.000Z").unwrap(),
            date(2022, 11, 30)
        );
    }

    #[test]
    fn test_parse_timestamp_minute_precision() {
        assert_eq!(parse_timestamp(0, "2021-03-04T10:00").unwrap(), date(2021, 3, 4));
        assert_eq!(parse_timestamp(0, "2021-03-04T10:00Z").unwrap(), date(2021, 3, 4));
        assert_eq!(
            parse_timestamp(0, "2021-03-04T23:00+05:30").unwrap(),
            date(2021, 3, 4)
        );
    }

    #[test]
    fn test_parse_timestamp_coarse_dates() {
        assert_eq!(parse_timestamp(0, "2021-03").unwrap(), date(2021, 3, 1));
        assert_eq!(parse_timestamp(0, "2021").unwrap(), date(2021, 1, 1));
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        for raw in ["", "21", "2021-13", "20211", "2021-03-04T10", "March 2021"] {
            assert!(
                matches!(
                    parse_timestamp(7, raw),
                    Err(EngineError::MalformedInput { index: 7, field: "date", .. })
                ),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_csv_year_only_dates() {
        let body = b"date,aqi,pm25\n2019,80,1\n2020-06,90,2\n";
        let records = parse_records(body, RecordFormat::Csv).unwrap();
        assert_eq!(records[0].year(), 2019);
        assert_eq!(records[1].year(), 2020);
    }

    #[test]
    fn test_parse_timestamp_keeps_local_date_of_offset() {
        // 23:30 at -05:00 is already the next day in UTC.
        assert_eq!(
            parse_timestamp(0, "2020-12-31T23:30:00-05:00").unwrap(),
            date(2020, 12, 31)
        );
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(RecordFormat::from_path("data/air.CSV"), RecordFormat::Csv);
        assert_eq!(RecordFormat::from_path("data/air.json"), RecordFormat::Json);
        assert_eq!(RecordFormat::from_path("airdata"), RecordFormat::Json);
    }
}
