//! Report bodies and their signatures.
//!
//! The on-chain consumer decodes a report as
//! `(SwapPayload payload, bytes extraOptions, uint256 minAmountLD)`, so the
//! body is ABI-encoded as three parameters rather than as one tuple.

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_sol_types::SolValue;
use serde::Serialize;

use super::payload::FinalizedPayload;

/// Unsigned report content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportBody {
    pub payload: FinalizedPayload,
    pub extra_options: Bytes,
    pub min_amount_ld: U256,
}

impl ReportBody {
    #[must_use]
    pub fn new(payload: FinalizedPayload, extra_options: Bytes, min_amount_ld: U256) -> Self {
        Self {
            payload,
            extra_options,
            min_amount_ld,
        }
    }

    /// `abi.encode(payload, extraOptions, minAmountLD)`.
    #[must_use]
    pub fn encode(&self) -> Bytes {
        (
            self.payload.to_abi(),
            self.extra_options.clone(),
            self.min_amount_ld,
        )
            .abi_encode_params()
            .into()
    }

    /// Keccak-256 of the encoded body; this is what gets signed.
    #[must_use]
    pub fn digest(&self) -> B256 {
        keccak256(self.encode())
    }
}

/// A report body with an ECDSA signature over its digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedReport {
    pub encoded: Bytes,
    pub digest: B256,
    /// 65-byte `r || s || v` signature.
    pub signature: Bytes,
    pub signer: Address,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payload::{AbiSwapPayload, SwapPayload};

    fn body() -> ReportBody {
        let payload = SwapPayload {
            maker: Address::repeat_byte(0xaa),
            token_in: Address::repeat_byte(0x01),
            token_out: Address::repeat_byte(0x02),
            recipient: Address::repeat_byte(0xbb),
            amount_ld: U256::from(9_994),
            min_amount_out_ld: U256::from(9_944),
            maker_traits: U256::ZERO,
            program: Bytes::from_static(&[0x11, 0x00]),
            taker_traits_and_data: Bytes::new(),
            strategy_salt: B256::repeat_byte(0x01),
            strategy_tokens: vec![Address::repeat_byte(0x01), Address::repeat_byte(0x02)],
            strategy_balances: vec![U256::from(9_994), U256::ZERO],
            metadata: Bytes::new(),
        };
        ReportBody::new(
            FinalizedPayload::freeze(payload),
            Bytes::from_static(&[0x00, 0x03]),
            U256::from(9_944),
        )
    }

    #[test]
    fn body_is_encoded_as_three_parameters() {
        let encoded = body().encode();
        // Heads: payload offset, options offset, minAmountLD inline.
        assert_eq!(&encoded[..32], U256::from(0x60).to_be_bytes::<32>().as_slice());
        assert_eq!(&encoded[64..96], U256::from(9_944).to_be_bytes::<32>().as_slice());
    }

    #[test]
    fn body_decodes_back() {
        let body = body();
        let (payload, options, min) =
            <(AbiSwapPayload, Bytes, U256)>::abi_decode_params(&body.encode()).unwrap();
        assert_eq!(payload, body.payload.to_abi());
        assert_eq!(options, body.extra_options);
        assert_eq!(min, body.min_amount_ld);
    }

    #[test]
    fn digest_tracks_content() {
        let a = body();
        let mut b = body();
        b.min_amount_ld = U256::from(1);
        assert_eq!(a.digest(), body().digest());
        assert_ne!(a.digest(), b.digest());
    }
}
