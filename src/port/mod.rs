//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!                 ┌──────────────────────────┐
//!                 │       Application        │
//!                 │  CrisisCycle → Dispatcher│
//!                 └────────────┬─────────────┘
//!        ┌──────────┬──────────┼───────────┬────────────┐
//!        ▼          ▼          ▼           ▼            ▼
//!   ┌────────┐ ┌─────────┐ ┌────────┐ ┌──────────┐ ┌────────┐
//!   │  Feed  │ │ Engine  │ │ Bridge │ │ Signer / │ │ Store  │
//!   │        │ │         │ │ + ERC20│ │ Submitter│ │        │
//!   └────────┘ └─────────┘ └────────┘ └──────────┘ └────────┘
//! ```

pub mod outbound;

pub use outbound::approval::{ApprovalPolicy, ApprovalResult, TokenAllowance};
pub use outbound::bridge::{BridgeLayer, BridgeQuoteRequest};
pub use outbound::decision::StrategyEngine;
pub use outbound::feed::FeedSource;
pub use outbound::signer::ReportSigner;
pub use outbound::store::DispatchStore;
pub use outbound::submit::{Submission, SubmissionReceipt, Submitter};
