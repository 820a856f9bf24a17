//! Error taxonomy for the analytics engine.
//!
//! Too few points for a trend fit is not an error: the fitter falls back to
//! [`TrendModel::ZERO`](crate::analyzers::types::TrendModel::ZERO).

use thiserror::Error;

/// Result type for engine operations that can reject their input.
pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    /// A record's timestamp or numeric field could not be parsed.
    ///
    /// `index` is the zero-based position of the record in its source.
    #[error("malformed record {index}: field `{field}`: {reason}")]
    MalformedInput {
        index: usize,
        field: &'static str,
        reason: String,
    },

    /// The payload as a whole is not a record table (bad JSON, missing CSV
    /// column), so no record index applies.
    #[error("malformed record set: {0}")]
    MalformedDocument(String),
}

impl EngineError {
    pub fn malformed(index: usize, field: &'static str, reason: impl Into<String>) -> Self {
        EngineError::MalformedInput {
            index,
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_display_names_record_and_field() {
        let err = EngineError::malformed(4, "aqi", "not a number: \"abc\"");
        assert_eq!(
            err.to_string(),
            "malformed record 4: field `aqi`: not a number: \"abc\""
        );
    }
}
