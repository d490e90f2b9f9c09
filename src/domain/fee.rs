//! Messaging fee quotes.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use super::amount::{buffered_fee, Bps};

/// Where the fee attached to a submission came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeSource {
    /// Quoted by the messaging layer and buffered.
    Quoted,
    /// Supplied by the operator; no buffer applied.
    Override,
}

/// Native-currency fee for one cross-chain message.
///
/// Invariant: `buffered_fee >= native_fee`. Construct through
/// [`FeeQuote::quoted`] or [`FeeQuote::overridden`] to keep it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeQuote {
    native_fee: U256,
    buffered_fee: U256,
    margin: Bps,
    source: FeeSource,
}

impl FeeQuote {
    /// Buffer a messaging-layer quote by `margin`.
    #[must_use]
    pub fn quoted(native_fee: U256, margin: Bps) -> Self {
        Self {
            native_fee,
            buffered_fee: buffered_fee(native_fee, margin),
            margin,
            source: FeeSource::Quoted,
        }
    }

    /// Use an operator-supplied fee verbatim.
    #[must_use]
    pub fn overridden(fee: U256) -> Self {
        Self {
            native_fee: fee,
            buffered_fee: fee,
            margin: Bps::ZERO,
            source: FeeSource::Override,
        }
    }

    /// Raw quote (or the override value).
    #[must_use]
    pub const fn native_fee(&self) -> U256 {
        self.native_fee
    }

    /// Value to attach to the submission.
    #[must_use]
    pub const fn buffered_fee(&self) -> U256 {
        self.buffered_fee
    }

    #[must_use]
    pub const fn margin(&self) -> Bps {
        self.margin
    }

    #[must_use]
    pub const fn source(&self) -> FeeSource {
        self.source
    }
}

/// Bridge-layer receipt for a quoted transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OftReceipt {
    /// Amount debited on the source chain.
    pub amount_sent_ld: U256,
    /// Amount credited on the destination chain, net of bridge fees.
    pub amount_received_ld: U256,
}

impl OftReceipt {
    /// Amount the bridge keeps for itself.
    #[must_use]
    pub fn bridge_fee(&self) -> U256 {
        self.amount_sent_ld.saturating_sub(self.amount_received_ld)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_fee_is_buffered() {
        let quote = FeeQuote::quoted(U256::from(100), Bps::new(2_000));
        assert_eq!(quote.native_fee(), U256::from(100));
        assert_eq!(quote.buffered_fee(), U256::from(120));
        assert_eq!(quote.source(), FeeSource::Quoted);
    }

    #[test]
    fn override_is_not_buffered() {
        let quote = FeeQuote::overridden(U256::from(5_000));
        assert_eq!(quote.buffered_fee(), U256::from(5_000));
        assert_eq!(quote.margin(), Bps::ZERO);
        assert_eq!(quote.source(), FeeSource::Override);
    }

    #[test]
    fn receipt_bridge_fee_is_difference() {
        let receipt = OftReceipt {
            amount_sent_ld: U256::from(10_000),
            amount_received_ld: U256::from(9_994),
        };
        assert_eq!(receipt.bridge_fee(), U256::from(6));
    }
}
