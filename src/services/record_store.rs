//! Trait and implementations for loading measurement records.
//!
//! The analytics engine never reads from a store itself; callers load the
//! records and hand the slice to [`analyze`](crate::analyzers::analyzer::analyze).

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

use crate::fetch::{HttpClient, fetch_bytes};
use crate::model::Measurement;
use crate::parser::{RecordFormat, parse_records};

/// Abstraction over wherever the raw measurements live.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns every record, in source order.
    async fn load(&self) -> Result<Vec<Measurement>>;
}

/// Reads records from a local JSON or CSV file.
pub struct FileStore {
    path: PathBuf,
    format: RecordFormat,
}

impl FileStore {
    /// Format is inferred from the file extension.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = RecordFormat::from_path(&path);
        Self { path, format }
    }

    pub fn with_format(mut self, format: RecordFormat) -> Self {
        self.format = format;
        self
    }
}

#[async_trait]
impl RecordStore for FileStore {
    async fn load(&self) -> Result<Vec<Measurement>> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("reading records from {}", self.path.display()))?;
        let records = parse_records(&bytes, self.format)
            .with_context(|| format!("decoding {}", self.path.display()))?;
        info!(path = %self.path.display(), count = records.len(), "Loaded records from file");
        Ok(records)
    }
}

/// Fetches records from an HTTP endpoint such as `/api/airdata`.
///
/// Wrap the client in [`ApiKey`](crate::fetch::auth::ApiKey) when the
/// endpoint needs a token.
pub struct HttpStore<C> {
    client: C,
    url: String,
    format: RecordFormat,
}

impl<C: HttpClient> HttpStore<C> {
    pub fn new(client: C, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            format: RecordFormat::Json,
        }
    }

    pub fn with_format(mut self, format: RecordFormat) -> Self {
        self.format = format;
        self
    }
}

#[async_trait]
impl<C: HttpClient> RecordStore for HttpStore<C> {
    async fn load(&self) -> Result<Vec<Measurement>> {
        let bytes = fetch_bytes(&self.client, &self.url)
            .await
            .with_context(|| format!("fetching records from {}", self.url))?;
        let records = parse_records(&bytes, self.format)
            .with_context(|| format!("decoding response from {}", self.url))?;
        info!(url = %self.url, count = records.len(), "Fetched records");
        Ok(records)
    }
}
