//! Strategy plans produced by the decision engine.

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Bridging parameters attached to a dispatchable candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeParams {
    /// Amount to bridge, in source-token local decimals.
    pub amount: U256,
    /// Destination-chain token the strategy buys.
    pub token_out: Address,
    /// Balance seeded for `token_out` in the strategy.
    pub strategy_buffer: U256,
}

impl BridgeParams {
    /// # Errors
    ///
    /// Returns [`DomainError::ZeroAmount`] when nothing would be bridged.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.amount.is_zero() {
            return Err(DomainError::ZeroAmount {
                field: "bridge.amount",
            });
        }
        Ok(())
    }
}

/// One strategy the engine proposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub asset: String,
    pub action: String,
    pub curve_type: String,
    pub entry_price: f64,
    pub allocation_percent: f64,
    /// Lower is more urgent; `1` is dispatched first.
    pub priority: u32,
    /// Strategy program executed by the destination engine.
    pub program: Bytes,
    #[serde(default)]
    pub bridge: Option<BridgeParams>,
}

impl Candidate {
    /// Operator-specified candidate carrying its own bridge parameters.
    #[must_use]
    pub fn manual(program: Bytes, bridge: BridgeParams) -> Self {
        Self {
            asset: "MANUAL".into(),
            action: "SEND".into(),
            curve_type: "CUSTOM".into(),
            entry_price: 0.0,
            allocation_percent: 100.0,
            priority: 1,
            program,
            bridge: Some(bridge),
        }
    }

    /// Short label such as `"BUY CRV"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.action, self.asset)
    }
}

/// How the plan expects its candidates to be executed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    pub trigger: String,
    pub cancel_others: bool,
    pub time_limit_hours: u32,
}

/// The engine's full answer for one feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyPlan {
    pub strategy_type: String,
    pub incident: String,
    pub approach: String,
    #[serde(default)]
    pub reasoning: Vec<String>,
    pub risk_assessment: String,
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub execution: ExecutionPlan,
    pub confidence: f64,
}

impl StrategyPlan {
    /// Pick the most urgent candidate that can actually be bridged.
    ///
    /// Ties on priority keep the engine's original order.
    ///
    /// # Errors
    ///
    /// - [`DomainError::NoCandidates`] for an empty plan.
    /// - [`DomainError::MissingBridgeParams`] naming the most urgent asset
    ///   when no candidate carries bridge parameters.
    /// - [`DomainError::ZeroAmount`] when the selected candidate bridges zero.
    pub fn select_dispatchable(&self) -> Result<&Candidate, DomainError> {
        let mut ranked: Vec<&Candidate> = self.candidates.iter().collect();
        ranked.sort_by_key(|c| c.priority);

        let top = ranked.first().ok_or(DomainError::NoCandidates)?;
        let chosen = ranked
            .iter()
            .find(|c| c.bridge.is_some())
            .ok_or_else(|| DomainError::MissingBridgeParams {
                asset: top.asset.clone(),
            })?;

        if let Some(bridge) = &chosen.bridge {
            bridge.validate()?;
        }
        Ok(chosen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(asset: &str, priority: u32, bridged: Option<u64>) -> Candidate {
        Candidate {
            asset: asset.into(),
            action: "BUY".into(),
            curve_type: "CONSTANT_SUM".into(),
            entry_price: 1.0,
            allocation_percent: 10.0,
            priority,
            program: Bytes::from_static(&[0x11, 0x00]),
            bridge: bridged.map(|amount| BridgeParams {
                amount: U256::from(amount),
                token_out: Address::repeat_byte(0x22),
                strategy_buffer: U256::from(1_000),
            }),
        }
    }

    fn plan(candidates: Vec<Candidate>) -> StrategyPlan {
        StrategyPlan {
            strategy_type: "TEST".into(),
            incident: "INC-1".into(),
            approach: String::new(),
            reasoning: vec![],
            risk_assessment: String::new(),
            candidates,
            execution: ExecutionPlan::default(),
            confidence: 0.5,
        }
    }

    #[test]
    fn selects_lowest_priority_number() {
        let plan = plan(vec![
            candidate("alETH", 2, Some(5)),
            candidate("CRV", 1, Some(10)),
        ]);
        assert_eq!(plan.select_dispatchable().unwrap().asset, "CRV");
    }

    #[test]
    fn skips_candidates_without_bridge_params() {
        let plan = plan(vec![
            candidate("CRV", 1, None),
            candidate("alETH", 2, Some(5)),
        ]);
        assert_eq!(plan.select_dispatchable().unwrap().asset, "alETH");
    }

    #[test]
    fn reports_top_asset_when_nothing_is_bridgeable() {
        let plan = plan(vec![candidate("pETH", 3, None), candidate("CRV", 1, None)]);
        assert_eq!(
            plan.select_dispatchable(),
            Err(DomainError::MissingBridgeParams { asset: "CRV".into() })
        );
    }

    #[test]
    fn empty_plan_has_no_candidates() {
        assert_eq!(plan(vec![]).select_dispatchable(), Err(DomainError::NoCandidates));
    }

    #[test]
    fn zero_bridge_amount_is_rejected() {
        let plan = plan(vec![candidate("CRV", 1, Some(0))]);
        assert_eq!(
            plan.select_dispatchable(),
            Err(DomainError::ZeroAmount {
                field: "bridge.amount"
            })
        );
    }

    #[test]
    fn label_joins_action_and_asset() {
        assert_eq!(candidate("CRV", 1, None).label(), "BUY CRV");
    }
}
