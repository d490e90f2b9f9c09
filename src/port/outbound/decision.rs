//! Strategy decision port.

use async_trait::async_trait;

use crate::domain::{MarketFeed, StrategyPlan};
use crate::error::Result;

/// Turns a non-idle feed into a strategy plan.
///
/// The shipped engine is a static function of the feed; the trait leaves
/// room for engines that call out to a model.
#[async_trait]
pub trait StrategyEngine: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the engine cannot produce a plan.
    async fn decide(&self, feed: &MarketFeed) -> Result<StrategyPlan>;

    /// Engine name for logging.
    fn name(&self) -> &'static str;
}
