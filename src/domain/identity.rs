//! Strategy identity.
//!
//! The destination liquidity engine keys a maker's virtual balance by
//! `keccak256(abi.encode(Order { maker, traits, data }))`. The same hash
//! labels a dispatch for later lookup, so it is computed here exactly as the
//! engine does.
//!
//! The strategy salt is deliberately not hashed. Two dispatches with the
//! same maker, traits and program address the same virtual balance; to make
//! them distinct the program itself must differ.

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_sol_types::{sol, SolValue};

use super::payload::SwapPayload;

sol! {
    /// Order tuple hashed by the destination liquidity engine.
    struct StrategyOrder {
        address maker;
        uint256 traits;
        bytes data;
    }
}

/// 32-byte strategy identity.
pub type StrategyHash = B256;

/// Hash `(maker, maker_traits, program)` the way the destination does.
#[must_use]
pub fn strategy_hash(maker: Address, maker_traits: U256, program: &Bytes) -> StrategyHash {
    let order = StrategyOrder {
        maker,
        traits: maker_traits,
        data: program.clone(),
    };
    keccak256(order.abi_encode())
}

/// Identity of the strategy a payload will create on the destination.
#[must_use]
pub fn payload_strategy_hash(payload: &SwapPayload) -> StrategyHash {
    strategy_hash(payload.maker, payload.maker_traits, &payload.program)
}
