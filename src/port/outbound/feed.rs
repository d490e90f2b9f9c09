//! Market-intelligence feed port.

use async_trait::async_trait;

use crate::domain::MarketFeed;
use crate::error::Result;

/// Source of the aggregated market feed.
///
/// Implementations must be thread-safe (`Send + Sync`).
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch and decode the current feed.
    ///
    /// # Errors
    ///
    /// Returns an upstream error for transport failures or a non-success
    /// status, and a JSON error for an undecodable body.
    async fn fetch(&self) -> Result<MarketFeed>;

    /// Where the feed comes from, for logging.
    fn describe(&self) -> String;
}
