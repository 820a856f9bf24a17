//! Sources of measurement records.

pub mod record_store;
