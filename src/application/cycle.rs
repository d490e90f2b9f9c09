//! One scheduled run: feed → decision → dispatch → persist.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use super::dispatch::{ChainContext, DispatchResult, SwapDispatcher};
use super::retry::RetryPolicy;
use crate::domain::{DispatchRecord, DomainError, MarketFeed};
use crate::error::{Result, Stage};
use crate::port::{DispatchStore, FeedSource, StrategyEngine};

/// What a cycle ended up doing.
#[derive(Debug, Clone)]
pub enum CycleOutcome {
    /// Feed reported no crisis; nothing was built or quoted.
    Idle { timestamp: String },
    /// A crisis was reported but no candidate could be dispatched.
    Skipped { incident: String, reason: String },
    /// A candidate was dispatched (or simulated in dry-run mode).
    Dispatched {
        incident: String,
        action: String,
        result: Box<DispatchResult>,
    },
}

/// Crisis-response cycle wired to its collaborators.
pub struct CrisisCycle {
    feed: Arc<dyn FeedSource>,
    engine: Arc<dyn StrategyEngine>,
    dispatcher: Arc<SwapDispatcher>,
    store: Arc<dyn DispatchStore>,
    context: ChainContext,
    retry: RetryPolicy,
}

impl CrisisCycle {
    /// Scheduled dispatches always generate a fresh salt, so any fixed salt in
    /// `context` is dropped.
    #[must_use]
    pub fn new(
        feed: Arc<dyn FeedSource>,
        engine: Arc<dyn StrategyEngine>,
        dispatcher: Arc<SwapDispatcher>,
        store: Arc<dyn DispatchStore>,
        mut context: ChainContext,
        retry: RetryPolicy,
    ) -> Self {
        if let Some(salt) = context.salt.take() {
            warn!(salt = %salt, "Ignoring fixed salt for scheduled dispatches");
        }
        Self {
            feed,
            engine,
            dispatcher,
            store,
            context,
            retry,
        }
    }

    /// Run one cycle.
    ///
    /// # Errors
    ///
    /// Returns feed, decision and dispatch failures. A plan without a
    /// dispatchable candidate is reported as [`CycleOutcome::Skipped`].
    pub async fn run_once(&self) -> Result<CycleOutcome> {
        let feed = self
            .retry
            .run(Stage::Feed, |_| self.feed.fetch())
            .await?;

        info!(
            status = feed.status_label(),
            incident = %feed.incident_id,
            severity = %feed.severity,
            "Feed received"
        );

        if feed.is_idle() {
            info!("Market stable, standing by");
            return Ok(CycleOutcome::Idle {
                timestamp: feed.aggregation_timestamp,
            });
        }

        log_intelligence(&feed);

        let plan = self.engine.decide(&feed).await?;
        info!(
            engine = self.engine.name(),
            strategy = %plan.strategy_type,
            candidates = plan.candidates.len(),
            confidence = plan.confidence,
            "Strategy plan ready"
        );

        let candidate = match plan.select_dispatchable() {
            Ok(candidate) => candidate,
            Err(e @ (DomainError::MissingBridgeParams { .. } | DomainError::NoCandidates)) => {
                warn!(incident = %feed.incident_id, reason = %e, "No dispatchable strategy");
                return Ok(CycleOutcome::Skipped {
                    incident: feed.incident_id,
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            action = %candidate.label(),
            priority = candidate.priority,
            curve = %candidate.curve_type,
            "Dispatching strategy"
        );
        let result = self.dispatcher.dispatch(candidate, &self.context).await?;

        let record = DispatchRecord::from_payload(
            &result.payload,
            result.tx_hash,
            result.fee.buffered_fee(),
            feed.incident_id.clone(),
            Utc::now(),
        );
        if let Err(e) = self.store.save(&record).await {
            error!(error = %e, "Failed to persist dispatch record");
        }

        Ok(CycleOutcome::Dispatched {
            incident: feed.incident_id,
            action: candidate.label(),
            result: Box::new(result),
        })
    }
}

fn log_intelligence(feed: &MarketFeed) {
    let social = &feed.social_intelligence;
    let exploit = &feed.onchain_intelligence.exploit_summary;
    let market = &feed.market_intelligence;

    info!(
        event = %feed.executive_summary.event,
        panic_level = social.panic_level,
        alerts = social.twitter_alerts.len(),
        drained_usd = exploit.total_drained_usd,
        pools = exploit.affected_pools.len(),
        volatility = %market.volatility.index,
        gas_gwei = market.gas_conditions.current_gwei,
        "Crisis detected"
    );
    for opp in market.arbitrage_opportunities.iter().take(3) {
        debug!(
            asset = %opp.asset,
            spread = ?opp.spread_percentage,
            depeg = ?opp.depeg_percentage,
            risk = %opp.risk_level,
            "Arbitrage opportunity"
        );
    }
}
