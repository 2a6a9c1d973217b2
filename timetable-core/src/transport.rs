//! Feed download.
//!
//! The sync engine only needs "URL in, text out". `HttpTransport` is the
//! real implementation; tests plug in their own.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{TimetableError, TimetableResult};

const USER_AGENT: &str = concat!("timetable/", env!("CARGO_PKG_VERSION"));

#[async_trait]
pub trait FeedTransport: Send + Sync {
    /// Fetch the document at `url` as UTF-8 text.
    async fn fetch_text(&self, url: &str) -> TimetableResult<String>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> TimetableResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| TimetableError::Fetch(format!("Could not build HTTP client: {e}")))?;

        Ok(HttpTransport { client })
    }
}

#[async_trait]
impl FeedTransport for HttpTransport {
    async fn fetch_text(&self, url: &str) -> TimetableResult<String> {
        debug!(url, "fetching feed");

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "text/calendar, text/plain;q=0.9, */*;q=0.5")
            .send()
            .await
            .map_err(|e| TimetableError::Fetch(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TimetableError::Fetch(format!("Server responded with HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| TimetableError::Fetch(format!("Could not read response body: {e}")))?;

        debug!(bytes = body.len(), "feed downloaded");
        Ok(body)
    }
}
