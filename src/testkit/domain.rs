//! Canonical fixtures for dispatch tests.

use alloy_primitives::{Address, Bytes, U256};

use crate::application::{ChainContext, Destination};
use crate::domain::{BridgeParams, Candidate};

pub const MAKER: Address = Address::repeat_byte(0xaa);
pub const RECIPIENT: Address = Address::repeat_byte(0xbb);
/// Destination address of the bridged token.
pub const TOKEN_IN: Address = Address::repeat_byte(0x01);
pub const TOKEN_OUT: Address = Address::repeat_byte(0x02);
/// Source-chain sender contract and token spender.
pub const SENDER: Address = Address::repeat_byte(0x11);

pub fn program() -> Bytes {
    Bytes::from_static(&[0x11, 0x00])
}

pub fn bridge_params(amount: u64) -> BridgeParams {
    BridgeParams {
        amount: U256::from(amount),
        token_out: TOKEN_OUT,
        strategy_buffer: U256::ZERO,
    }
}

/// Top-priority candidate bridging `amount`.
pub fn candidate(amount: u64) -> Candidate {
    Candidate {
        asset: "CRV".into(),
        action: "BUY".into(),
        curve_type: "CONSTANT_SUM".into(),
        entry_price: 0.52,
        allocation_percent: 30.0,
        priority: 1,
        program: program(),
        bridge: Some(bridge_params(amount)),
    }
}

pub fn destination() -> Destination {
    Destination {
        maker: MAKER,
        token_in: TOKEN_IN,
        recipient: RECIPIENT,
    }
}

/// Context with no salt and no fee override.
pub fn context() -> ChainContext {
    ChainContext {
        destination: destination(),
        spender: SENDER,
        salt: None,
        fee_override: None,
    }
}
