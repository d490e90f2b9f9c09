//! Payload assembly and amount finalization.

use alloy_primitives::{Address, Bytes, B256, U256};
use tracing::debug;

use crate::domain::amount::min_amount_after_slippage;
use crate::domain::payload::FinalizedPayload;
use crate::domain::{Bps, Candidate, DomainError, SwapPayload, TokenOrder};

/// Destination-chain parties of a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Destination {
    /// Executor that consumes the strategy.
    pub maker: Address,
    /// Destination address of the bridged token.
    pub token_in: Address,
    pub recipient: Address,
}

/// Builds swap payloads from strategy candidates.
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    maker_traits: U256,
    slippage: Bps,
    token_order: TokenOrder,
    taker_traits_and_data: Bytes,
    metadata: Bytes,
}

impl PayloadBuilder {
    #[must_use]
    pub fn new(maker_traits: U256, slippage: Bps, token_order: TokenOrder) -> Self {
        Self {
            maker_traits,
            slippage,
            token_order,
            taker_traits_and_data: Bytes::new(),
            metadata: Bytes::new(),
        }
    }

    #[must_use]
    pub fn with_taker_data(mut self, data: Bytes) -> Self {
        self.taker_traits_and_data = data;
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: Bytes) -> Self {
        self.metadata = metadata;
        self
    }

    #[must_use]
    pub const fn slippage(&self) -> Bps {
        self.slippage
    }

    /// Assemble the skeleton payload for `candidate`.
    ///
    /// The bridged amount is a placeholder equal to the requested amount
    /// until [`finalize_amounts`](Self::finalize_amounts) runs.
    ///
    /// # Errors
    ///
    /// - [`DomainError::MissingBridgeParams`] if the candidate cannot bridge.
    /// - [`DomainError::ZeroAmount`] for a zero bridge amount.
    /// - [`DomainError::DuplicateToken`] when `token_in == token_out`.
    pub fn build(
        &self,
        candidate: &Candidate,
        destination: &Destination,
        salt: B256,
    ) -> Result<SwapPayload, DomainError> {
        let bridge = candidate
            .bridge
            .as_ref()
            .ok_or_else(|| DomainError::MissingBridgeParams {
                asset: candidate.asset.clone(),
            })?;
        bridge.validate()?;

        let (strategy_tokens, strategy_balances) = self.token_order.arrange(
            destination.token_in,
            bridge.token_out,
            bridge.amount,
            bridge.strategy_buffer,
        );

        let payload = SwapPayload {
            maker: destination.maker,
            token_in: destination.token_in,
            token_out: bridge.token_out,
            recipient: destination.recipient,
            amount_ld: bridge.amount,
            min_amount_out_ld: U256::ZERO,
            maker_traits: self.maker_traits,
            program: candidate.program.clone(),
            taker_traits_and_data: self.taker_traits_and_data.clone(),
            strategy_salt: salt,
            strategy_tokens,
            strategy_balances,
            metadata: self.metadata.clone(),
        };
        payload.validate()?;

        debug!(
            asset = %candidate.asset,
            token_out = %payload.token_out,
            amount_ld = %payload.amount_ld,
            salt = %salt,
            "Payload skeleton built"
        );
        Ok(payload)
    }

    /// Overwrite the bridged amounts with what the bridge will deliver.
    ///
    /// Sets `amount_ld` and the bridged token's balance to `received`, and
    /// `min_amount_out_ld` to `received` less slippage. Array order is never
    /// touched, and applying the same `received` again yields the same payload.
    ///
    /// # Errors
    ///
    /// - [`DomainError::ZeroAmount`] if nothing would be received.
    /// - [`DomainError::BridgedTokenMissing`] or
    ///   [`DomainError::LengthMismatch`] for a malformed payload.
    pub fn finalize_amounts(
        &self,
        mut payload: SwapPayload,
        received: U256,
    ) -> Result<FinalizedPayload, DomainError> {
        if received.is_zero() {
            return Err(DomainError::ZeroAmount {
                field: "amount_received_ld",
            });
        }
        payload.validate()?;
        let index = payload.bridged_index()?;

        payload.amount_ld = received;
        payload.strategy_balances[index] = received;
        payload.min_amount_out_ld = min_amount_after_slippage(received, self.slippage);

        Ok(FinalizedPayload::freeze(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::amount::DEFAULT_SLIPPAGE_BPS;
    use crate::domain::BridgeParams;

    const USDC: Address = Address::repeat_byte(0x01);
    const TOKEN_OUT: Address = Address::repeat_byte(0x02);

    fn destination() -> Destination {
        Destination {
            maker: Address::repeat_byte(0xaa),
            token_in: USDC,
            recipient: Address::repeat_byte(0xbb),
        }
    }

    fn candidate(amount: u64) -> Candidate {
        Candidate {
            asset: "CRV".into(),
            action: "BUY".into(),
            curve_type: "CONSTANT_SUM".into(),
            entry_price: 0.52,
            allocation_percent: 30.0,
            priority: 1,
            program: Bytes::from_static(&[0x11, 0x00]),
            bridge: Some(BridgeParams {
                amount: U256::from(amount),
                token_out: TOKEN_OUT,
                strategy_buffer: U256::from(500),
            }),
        }
    }

    fn builder(order: TokenOrder) -> PayloadBuilder {
        PayloadBuilder::new(U256::ZERO, Bps::new(DEFAULT_SLIPPAGE_BPS), order)
    }

    #[test]
    fn build_fills_every_field() {
        let salt = B256::repeat_byte(0x42);
        let payload = builder(TokenOrder::BridgedFirst)
            .build(&candidate(10_000), &destination(), salt)
            .unwrap();

        assert_eq!(payload.maker, Address::repeat_byte(0xaa));
        assert_eq!(payload.token_in, USDC);
        assert_eq!(payload.token_out, TOKEN_OUT);
        assert_eq!(payload.amount_ld, U256::from(10_000));
        assert_eq!(payload.strategy_salt, salt);
        assert_eq!(payload.strategy_tokens, vec![USDC, TOKEN_OUT]);
        assert_eq!(payload.strategy_balances, vec![U256::from(10_000), U256::from(500)]);
        assert_eq!(payload.program, Bytes::from_static(&[0x11, 0x00]));
    }

    #[test]
    fn build_without_bridge_params_fails() {
        let mut c = candidate(10);
        c.bridge = None;
        assert_eq!(
            builder(TokenOrder::BridgedFirst).build(&c, &destination(), B256::ZERO),
            Err(DomainError::MissingBridgeParams { asset: "CRV".into() })
        );
    }

    #[test]
    fn build_rejects_same_token_in_and_out() {
        let mut dest = destination();
        dest.token_in = TOKEN_OUT;
        assert_eq!(
            builder(TokenOrder::BridgedFirst).build(&candidate(10), &dest, B256::ZERO),
            Err(DomainError::DuplicateToken { token: TOKEN_OUT })
        );
    }

    #[test]
    fn finalize_sets_received_and_slippage_floor() {
        let b = builder(TokenOrder::BridgedFirst);
        let skeleton = b.build(&candidate(1_000_600), &destination(), B256::ZERO).unwrap();
        let finalized = b.finalize_amounts(skeleton, U256::from(1_000_000)).unwrap();

        assert_eq!(finalized.amount_ld, U256::from(1_000_000));
        assert_eq!(finalized.min_amount_out_ld, U256::from(995_000));
        assert_eq!(
            finalized.strategy_balances,
            vec![U256::from(1_000_000), U256::from(500)]
        );
    }

    #[test]
    fn finalize_updates_bridged_slot_in_either_order() {
        let b = builder(TokenOrder::BridgedLast);
        let skeleton = b.build(&candidate(10_000), &destination(), B256::ZERO).unwrap();
        assert_eq!(skeleton.strategy_tokens, vec![TOKEN_OUT, USDC]);

        let finalized = b.finalize_amounts(skeleton, U256::from(9_994)).unwrap();
        assert_eq!(finalized.strategy_tokens, vec![TOKEN_OUT, USDC]);
        assert_eq!(finalized.strategy_balances, vec![U256::from(500), U256::from(9_994)]);
    }

    #[test]
    fn finalize_is_idempotent() {
        let b = builder(TokenOrder::BridgedFirst);
        let skeleton = b.build(&candidate(10_000), &destination(), B256::ZERO).unwrap();
        let once = b.finalize_amounts(skeleton, U256::from(9_994)).unwrap();
        let twice = b
            .finalize_amounts(once.clone().into_inner(), U256::from(9_994))
            .unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn finalize_rejects_non_parallel_arrays() {
        let b = builder(TokenOrder::BridgedFirst);
        let mut skeleton = b.build(&candidate(10_000), &destination(), B256::ZERO).unwrap();
        skeleton.strategy_balances.push(U256::from(1));
        assert_eq!(
            b.finalize_amounts(skeleton, U256::from(9_994)),
            Err(DomainError::LengthMismatch {
                tokens: 2,
                balances: 3
            })
        );
    }

    #[test]
    fn finalize_rejects_zero_received() {
        let b = builder(TokenOrder::BridgedFirst);
        let skeleton = b.build(&candidate(10_000), &destination(), B256::ZERO).unwrap();
        assert!(matches!(
            b.finalize_amounts(skeleton, U256::ZERO),
            Err(DomainError::ZeroAmount { .. })
        ));
    }

    #[test]
    fn finalized_lengths_match_for_many_amounts() {
        let b = builder(TokenOrder::BridgedFirst);
        for received in [1u64, 199, 10_000, 987_654_321] {
            let skeleton = b.build(&candidate(10_000), &destination(), B256::ZERO).unwrap();
            let finalized = b.finalize_amounts(skeleton, U256::from(received)).unwrap();
            assert_eq!(finalized.strategy_tokens.len(), finalized.strategy_balances.len());
            assert!(finalized.min_amount_out_ld <= finalized.amount_ld);
        }
    }
}
