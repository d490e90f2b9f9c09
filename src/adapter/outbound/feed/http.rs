//! HTTP market feed.
//!
//! Fetches the aggregated feed with a plain GET and decodes the JSON body.
//! Anything other than `200 OK` is treated as a failed fetch.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use crate::domain::MarketFeed;
use crate::error::{Result, Stage, UpstreamError};
use crate::port::FeedSource;

/// Feed fetched from an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    client: Client,
    url: Url,
}

impl HttpFeedSource {
    /// Create a feed source with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// Reject any status other than `200 OK`.
fn check_status(status: StatusCode) -> Result<()> {
    if status == StatusCode::OK {
        Ok(())
    } else {
        Err(UpstreamError::FeedStatus {
            status: status.as_u16(),
        }
        .into())
    }
}

/// Decode a feed body.
///
/// # Errors
///
/// Returns a JSON error for malformed bodies.
pub fn parse_feed(body: &str) -> Result<MarketFeed> {
    Ok(serde_json::from_str(body)?)
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self) -> Result<MarketFeed> {
        let response = self
            .client
            .get(self.url.clone())
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| UpstreamError::Unavailable {
                stage: Stage::Feed,
                reason: e.to_string(),
            })?;

        check_status(response.status())?;

        let body = response.text().await.map_err(|e| UpstreamError::Unavailable {
            stage: Stage::Feed,
            reason: e.to_string(),
        })?;
        debug!(bytes = body.len(), url = %self.url, "Feed body received");

        parse_feed(&body)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}
