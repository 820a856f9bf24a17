//! In-memory [`HttpClient`] for tests: answers every request with a canned
//! response and keeps the requests it saw.

use super::client::HttpClient;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use std::sync::{Arc, Mutex};

/// What the client saw for one request.
#[derive(Debug, Clone)]
pub(crate) struct SeenRequest {
    pub url: String,
    pub headers: HeaderMap,
}

#[derive(Clone)]
pub(crate) struct RecordingClient {
    status: u16,
    body: &'static str,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl RecordingClient {
    pub fn new(status: u16, body: &'static str) -> Self {
        Self {
            status,
            body,
            seen: Arc::default(),
        }
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for RecordingClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.seen.lock().unwrap().push(SeenRequest {
            url: req.url().to_string(),
            headers: req.headers().clone(),
        });
        let resp = http::Response::builder()
            .status(self.status)
            .body(self.body)
            .unwrap();
        Ok(reqwest::Response::from(resp))
    }
}
