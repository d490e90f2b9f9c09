//! Consistency errors for dispatch payloads and strategy plans.
//!
//! These are returned when a payload or plan violates an invariant that the
//! destination chain relies on. They are fatal for the dispatch attempt that
//! produced them.
//!
//! # Examples
//!
//! ```
//! use alloy_primitives::{Address, U256};
//! use ghostline::domain::error::DomainError;
//! use ghostline::domain::payload::check_parallel;
//!
//! let tokens = vec![Address::ZERO, Address::repeat_byte(1)];
//! let balances = vec![U256::from(1)];
//!
//! assert!(matches!(
//!     check_parallel(&tokens, &balances),
//!     Err(DomainError::LengthMismatch { tokens: 2, balances: 1 })
//! ));
//! ```

use alloy_primitives::Address;
use thiserror::Error;

/// Errors that occur when dispatch invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// `strategy_tokens` and `strategy_balances` must be parallel arrays.
    #[error("strategy tokens ({tokens}) and balances ({balances}) differ in length")]
    LengthMismatch {
        /// Number of token entries.
        tokens: usize,
        /// Number of balance entries.
        balances: usize,
    },

    /// The bridged token has no slot in `strategy_tokens`.
    #[error("bridged token {token} is not part of the strategy tokens")]
    BridgedTokenMissing {
        /// Destination-chain token that should receive the bridged amount.
        token: Address,
    },

    /// A token occurs more than once in `strategy_tokens`.
    #[error("token {token} appears more than once in the strategy tokens")]
    DuplicateToken {
        /// Repeated token address.
        token: Address,
    },

    /// The chosen candidate carries no bridging parameters.
    #[error("strategy for {asset} has no bridge parameters")]
    MissingBridgeParams {
        /// Asset of the highest-priority candidate.
        asset: String,
    },

    /// The decision engine produced no candidates at all.
    #[error("strategy plan contains no candidates")]
    NoCandidates,

    /// A required amount was zero.
    #[error("{field} must be greater than zero")]
    ZeroAmount {
        /// Name of the offending amount.
        field: &'static str,
    },

    /// A value supplied as text could not be decoded.
    #[error("invalid {field}: {reason}")]
    Malformed {
        /// Name of the offending value.
        field: &'static str,
        /// Parser message.
        reason: String,
    },
}
