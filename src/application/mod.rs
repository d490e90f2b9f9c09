//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the dispatch pipeline.

pub mod cycle;
pub mod dispatch;
pub mod fee;
pub mod payload;
pub mod retry;

pub use cycle::{CrisisCycle, CycleOutcome};
pub use dispatch::{ChainContext, DispatchResult, DispatchSettings, SwapDispatcher};
pub use fee::{FeeQuoter, FeeRequest};
pub use payload::{Destination, PayloadBuilder};
pub use retry::RetryPolicy;
