//! Basis-point arithmetic on 256-bit amounts.
//!
//! Everything here is integer math. The results are compared against
//! on-chain integer checks, so floating point must never enter the path.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// Basis points denominator (100% = 10 000 bps).
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Default fee buffer on top of a messaging quote (20%).
pub const DEFAULT_FEE_BUFFER_BPS: u32 = 2_000;

/// Default slippage tolerance applied to bridged amounts (0.5%).
pub const DEFAULT_SLIPPAGE_BPS: u32 = 50;

/// A ratio expressed in basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bps(u32);

impl Bps {
    /// Zero basis points.
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// True for ratios that stay within 100%.
    #[must_use]
    pub const fn is_fraction(self) -> bool {
        self.0 as u64 <= BPS_DENOMINATOR
    }
}

impl std::fmt::Display for Bps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} bps", self.0)
    }
}

/// `floor(amount * bps / 10000)` without intermediate overflow.
///
/// Splits `amount` into `q * 10000 + r` so the product never exceeds
/// `U256::MAX` unless the result itself would.
#[must_use]
pub fn mul_bps_floor(amount: U256, bps: Bps) -> U256 {
    let denom = U256::from(BPS_DENOMINATOR);
    let factor = U256::from(bps.get());
    let (q, r) = amount.div_rem(denom);
    q.saturating_mul(factor)
        .saturating_add(r * factor / denom)
}

/// `ceil(amount * bps / 10000)` without intermediate overflow.
#[must_use]
pub fn mul_bps_ceil(amount: U256, bps: Bps) -> U256 {
    let denom = U256::from(BPS_DENOMINATOR);
    let factor = U256::from(bps.get());
    let (q, r) = amount.div_rem(denom);
    let partial = r * factor;
    let (tail, rem) = partial.div_rem(denom);
    let tail = if rem.is_zero() { tail } else { tail + U256::from(1) };
    q.saturating_mul(factor).saturating_add(tail)
}

/// Inflate a native fee by `margin`.
///
/// The margin term is rounded up, so the result is never below `fee` and is
/// strictly above it whenever both `fee` and `margin` are non-zero.
#[must_use]
pub fn buffered_fee(fee: U256, margin: Bps) -> U256 {
    let buffered = fee.saturating_add(mul_bps_ceil(fee, margin));
    buffered.max(fee)
}

/// Minimum acceptable output after applying `slippage` to `amount`.
///
/// Rounds down, matching the integer comparison performed on-chain.
#[must_use]
pub fn min_amount_after_slippage(amount: U256, slippage: Bps) -> U256 {
    let keep = Bps::new(BPS_DENOMINATOR as u32 - slippage.get().min(BPS_DENOMINATOR as u32));
    mul_bps_floor(amount, keep)
}
