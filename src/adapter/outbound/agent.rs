//! Static strategy engine.
//!
//! Produces a fixed three-asset crisis plan, filling the analysis fields from
//! the feed. Bridge parameters come from configuration and are attached to
//! the priority-1 candidate only.

use alloy_primitives::Bytes;
use async_trait::async_trait;

use crate::domain::strategy::ExecutionPlan;
use crate::domain::{BridgeParams, Candidate, MarketFeed, StrategyPlan};
use crate::error::Result;
use crate::port::StrategyEngine;

/// Program shipped with every static candidate.
const DEFAULT_PROGRAM: [u8; 2] = [0x11, 0x00];

/// Strategy family name.
pub const STRATEGY_TYPE: &str = "SCHRODINGER_LIQUIDITY";

/// Engine that always proposes the same candidates.
#[derive(Debug, Clone)]
pub struct StaticStrategyEngine {
    bridge: Option<BridgeParams>,
    program: Bytes,
}

impl StaticStrategyEngine {
    #[must_use]
    pub fn new(bridge: Option<BridgeParams>) -> Self {
        Self {
            bridge,
            program: Bytes::from_static(&DEFAULT_PROGRAM),
        }
    }

    /// Use `program` for every candidate instead of the default.
    #[must_use]
    pub fn with_program(mut self, program: Bytes) -> Self {
        self.program = program;
        self
    }

    fn candidate(
        &self,
        asset: &str,
        curve_type: &str,
        entry_price: f64,
        allocation_percent: f64,
        priority: u32,
    ) -> Candidate {
        Candidate {
            asset: asset.into(),
            action: "BUY".into(),
            curve_type: curve_type.into(),
            entry_price,
            allocation_percent,
            priority,
            program: self.program.clone(),
            bridge: (priority == 1).then(|| self.bridge.clone()).flatten(),
        }
    }

    /// Build the plan for `feed`.
    #[must_use]
    pub fn plan(&self, feed: &MarketFeed) -> StrategyPlan {
        let lead_spread = feed
            .market_intelligence
            .arbitrage_opportunities
            .first()
            .and_then(|o| o.spread_percentage)
            .map_or_else(|| "unknown".to_string(), |s| s.to_string());

        StrategyPlan {
            strategy_type: STRATEGY_TYPE.into(),
            incident: feed.incident_id.clone(),
            approach: "Deploy simultaneous buy orders across CRV, alETH, and pETH. \
                       First fill cancels others."
                .into(),
            reasoning: vec![
                "Cannot predict which asset will bottom first due to market chaos".into(),
                format!("CRV has {lead_spread}% CEX-DEX spread - safest arb"),
                "alETH and pETH are depegged but carry smart contract risk".into(),
                "Deploying all positions simultaneously hedges the uncertainty".into(),
            ],
            risk_assessment: "HIGH_RISK_HIGH_REWARD".into(),
            candidates: vec![
                self.candidate("CRV", "CONSTANT_SUM", 0.52, 30.0, 1),
                self.candidate("alETH", "STABLE_SWAP", 1550.0, 20.0, 2),
                self.candidate("pETH", "STABLE_SWAP", 1680.0, 15.0, 3),
            ],
            execution: ExecutionPlan {
                trigger: "Deploy all strategies simultaneously via LayerZero".into(),
                cancel_others: true,
                time_limit_hours: 6,
            },
            confidence: 0.78,
        }
    }
}

#[async_trait]
impl StrategyEngine for StaticStrategyEngine {
    async fn decide(&self, feed: &MarketFeed) -> Result<StrategyPlan> {
        Ok(self.plan(feed))
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::feed::ArbitrageOpportunity;
    use alloy_primitives::{Address, U256};

    fn params() -> BridgeParams {
        BridgeParams {
            amount: U256::from(10_000),
            token_out: Address::repeat_byte(0x02),
            strategy_buffer: U256::ZERO,
        }
    }

    fn crisis_feed() -> MarketFeed {
        let mut feed = MarketFeed {
            incident_id: "CURVE-EXPLOIT".into(),
            status: Some("chance".into()),
            ..MarketFeed::default()
        };
        feed.market_intelligence.arbitrage_opportunities.push(ArbitrageOpportunity {
            asset: "CRV".into(),
            spread_percentage: Some(12.5),
            ..ArbitrageOpportunity::default()
        });
        feed
    }

    #[test]
    fn plan_has_three_prioritised_candidates() {
        let plan = StaticStrategyEngine::new(Some(params())).plan(&crisis_feed());
        let priorities: Vec<u32> = plan.candidates.iter().map(|c| c.priority).collect();
        assert_eq!(priorities, vec![1, 2, 3]);
        assert_eq!(plan.incident, "CURVE-EXPLOIT");
        assert!(plan.reasoning[1].contains("12.5%"));
    }

    #[test]
    fn only_top_candidate_is_bridged() {
        let plan = StaticStrategyEngine::new(Some(params())).plan(&crisis_feed());
        assert_eq!(plan.candidates[0].bridge, Some(params()));
        assert!(plan.candidates[1..].iter().all(|c| c.bridge.is_none()));
        assert_eq!(plan.select_dispatchable().unwrap().asset, "CRV");
    }

    #[test]
    fn without_bridge_params_nothing_is_dispatchable() {
        let plan = StaticStrategyEngine::new(None).plan(&crisis_feed());
        assert!(plan.select_dispatchable().is_err());
    }

    #[test]
    fn custom_program_is_used() {
        let engine = StaticStrategyEngine::new(None).with_program(Bytes::from_static(&[0xde, 0xad]));
        let plan = engine.plan(&MarketFeed::default());
        assert!(plan
            .candidates
            .iter()
            .all(|c| c.program == Bytes::from_static(&[0xde, 0xad])));
        assert!(plan.reasoning[1].contains("unknown"));
    }
}
