//! Scripted feed source, strategy engine, and feed fixtures.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::feed::{ArbitrageOpportunity, ExploitSummary};
use crate::domain::{MarketFeed, StrategyPlan};
use crate::error::Result;
use crate::port::{FeedSource, StrategyEngine};

/// Feed that pops scripted results, then repeats a fixed document.
pub struct StaticFeed {
    feed: MarketFeed,
    results: Mutex<VecDeque<Result<MarketFeed>>>,
    count: AtomicU32,
}

impl StaticFeed {
    pub fn new(feed: MarketFeed) -> Self {
        Self {
            feed,
            results: Mutex::new(VecDeque::new()),
            count: AtomicU32::new(0),
        }
    }

    pub fn with_results(self, results: Vec<Result<MarketFeed>>) -> Self {
        *self.results.lock() = results.into();
        self
    }

    pub fn count(&self) -> u32 {
        self.count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedSource for StaticFeed {
    async fn fetch(&self) -> Result<MarketFeed> {
        self.count.fetch_add(1, Ordering::SeqCst);
        let scripted = self.results.lock().pop_front();
        scripted.unwrap_or_else(|| Ok(self.feed.clone()))
    }

    fn describe(&self) -> String {
        "static".into()
    }
}

/// Engine returning the same plan and counting decisions.
pub struct ScriptedEngine {
    plan: StrategyPlan,
    count: AtomicU32,
}

impl ScriptedEngine {
    pub fn new(plan: StrategyPlan) -> Self {
        Self {
            plan,
            count: AtomicU32::new(0),
        }
    }

    pub fn count(&self) -> u32 {
        self.count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StrategyEngine for ScriptedEngine {
    async fn decide(&self, _feed: &MarketFeed) -> Result<StrategyPlan> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(self.plan.clone())
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Feed telling the pipeline to stand by.
pub fn idle_feed() -> MarketFeed {
    MarketFeed {
        aggregation_timestamp: "2025-01-01T00:00:00Z".into(),
        status: Some("idle".into()),
        ..MarketFeed::default()
    }
}

/// Feed describing an exploit with a CRV arbitrage.
pub fn crisis_feed() -> MarketFeed {
    let mut feed = MarketFeed {
        feed_version: "1.0".into(),
        aggregation_timestamp: "2025-01-01T00:05:00Z".into(),
        incident_id: "CURVE-EXPLOIT-001".into(),
        severity: "CRITICAL".into(),
        status: Some("chance".into()),
        ..MarketFeed::default()
    };
    feed.executive_summary.event = "Curve pool exploit".into();
    feed.onchain_intelligence.exploit_summary = ExploitSummary {
        total_drained_usd: 62_000_000.0,
        affected_pools: vec!["CRV/ETH".into(), "alETH/ETH".into()],
        ..ExploitSummary::default()
    };
    feed.market_intelligence
        .arbitrage_opportunities
        .push(ArbitrageOpportunity {
            asset: "CRV".into(),
            spread_percentage: Some(12.5),
            risk_level: "MEDIUM".into(),
            ..ArbitrageOpportunity::default()
        });
    feed
}
