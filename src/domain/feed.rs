//! Aggregated market-intelligence feed.
//!
//! Only `status` drives control flow. The intelligence sections are decoded
//! leniently (every field defaults) because they feed logging and the
//! decision engine, not the dispatch protocol.

use serde::{Deserialize, Serialize};

/// Status value that means "nothing to do".
pub const IDLE_STATUS: &str = "idle";

/// Top-level feed document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketFeed {
    pub feed_version: String,
    pub aggregation_timestamp: String,
    pub incident_id: String,
    pub severity: String,
    /// `"idle"` or an activation status such as `"chance"`.
    pub status: Option<String>,
    pub executive_summary: ExecutiveSummary,
    pub social_intelligence: SocialIntelligence,
    pub onchain_intelligence: OnchainIntelligence,
    pub market_intelligence: MarketIntelligence,
}

impl MarketFeed {
    /// True when the feed asks the pipeline to stand by. The match is exact.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.status.as_deref() == Some(IDLE_STATUS)
    }

    /// Status label for logging.
    #[must_use]
    pub fn status_label(&self) -> &str {
        self.status.as_deref().unwrap_or("unknown")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutiveSummary {
    pub event: String,
    pub impact: String,
    pub market_state: String,
    pub opportunity: String,
    pub risk_level: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialIntelligence {
    pub twitter_alerts: Vec<SocialAlert>,
    pub aggregate_sentiment: f64,
    pub panic_level: f64,
    pub fud_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialAlert {
    pub account: String,
    pub credibility: f64,
    pub message: String,
    pub sentiment: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnchainIntelligence {
    pub exploit_summary: ExploitSummary,
    pub suspicious_activity: Vec<SuspiciousActivity>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExploitSummary {
    pub total_drained_usd: f64,
    pub affected_pools: Vec<String>,
    pub attack_pattern: String,
    pub time_window_minutes: f64,
    pub exploit_confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuspiciousActivity {
    #[serde(rename = "type")]
    pub kind: String,
    pub pool: Option<String>,
    pub amount_usd: f64,
    pub flags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketIntelligence {
    pub arbitrage_opportunities: Vec<ArbitrageOpportunity>,
    pub volatility: Volatility,
    pub gas_conditions: GasConditions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbitrageOpportunity {
    pub asset: String,
    pub spread_percentage: Option<f64>,
    pub depeg_percentage: Option<f64>,
    pub risk_level: String,
    pub recommended_action: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Volatility {
    #[serde(alias = "level")]
    pub index: String,
    pub panic_selling: bool,
    pub liquidity_crisis: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasConditions {
    pub current_gwei: f64,
    pub recommendation: String,
}
