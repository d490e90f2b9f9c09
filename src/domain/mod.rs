//! Chain-agnostic dispatch domain.
//!
//! Pure types and arithmetic: nothing here performs I/O.

pub mod amount;
pub mod error;
pub mod fee;
pub mod feed;
pub mod identity;
pub mod options;
pub mod payload;
pub mod record;
pub mod report;
pub mod salt;
pub mod strategy;

pub use amount::Bps;
pub use error::DomainError;
pub use fee::{FeeQuote, FeeSource, OftReceipt};
pub use feed::MarketFeed;
pub use identity::{strategy_hash, StrategyHash};
pub use payload::{FinalizedPayload, SwapPayload, TokenOrder};
pub use record::DispatchRecord;
pub use report::{ReportBody, SignedReport};
pub use strategy::{BridgeParams, Candidate, StrategyPlan};
