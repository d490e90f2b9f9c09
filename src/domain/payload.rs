//! Cross-chain swap payload and its ABI encoding.
//!
//! A [`SwapPayload`] is built fresh for every dispatch attempt, finalized
//! once with the amount the bridge will actually deliver, and then frozen
//! inside a [`FinalizedPayload`]. Only the frozen form can be encoded into a
//! report.

use std::collections::HashSet;
use std::ops::Deref;

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::{sol, SolValue};
use serde::{Deserialize, Serialize};

use super::error::DomainError;

sol! {
    /// ABI image of the receiving contract's `SwapPayload` struct.
    ///
    /// Field order is part of the wire format.
    #[derive(Debug, PartialEq, Eq)]
    struct AbiSwapPayload {
        address maker;
        address tokenIn;
        address tokenOut;
        address recipient;
        uint256 amountLD;
        uint256 minAmountOutLD;
        uint256 makerTraits;
        bytes program;
        bytes takerTraitsAndData;
        bytes32 strategySalt;
        address[] strategyTokens;
        uint256[] strategyBalances;
        bytes metadata;
    }

    #[derive(Debug)]
    struct MessagingFee {
        uint256 nativeFee;
        uint256 lzTokenFee;
    }

    /// Source-chain sender that bridges the token and carries the payload as
    /// the compose message.
    #[sol(rpc)]
    contract IOAquaSender {
        function STARGATE_POOL() external view returns (address);
        function DESTINATION_EXECUTOR() external view returns (address);
        function DESTINATION_EID() external view returns (uint32);

        function quoteSendSwap(
            AbiSwapPayload calldata payload,
            bytes calldata extraOptions,
            uint256 minAmountLD
        ) external view returns (MessagingFee memory fee);

        function sendSwap(
            AbiSwapPayload calldata payload,
            bytes calldata extraOptions,
            uint256 minAmountLD
        ) external payable;
    }
}

/// Ordering of the two strategy tokens expected by the destination engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenOrder {
    /// `[token_in, token_out]`: the bridged token comes first.
    #[default]
    BridgedFirst,
    /// `[token_out, token_in]`: the bridged token comes last.
    BridgedLast,
}

impl TokenOrder {
    /// Lay out the parallel token/balance arrays.
    #[must_use]
    pub fn arrange(
        self,
        token_in: Address,
        token_out: Address,
        bridged: U256,
        buffer: U256,
    ) -> (Vec<Address>, Vec<U256>) {
        match self {
            Self::BridgedFirst => (vec![token_in, token_out], vec![bridged, buffer]),
            Self::BridgedLast => (vec![token_out, token_in], vec![buffer, bridged]),
        }
    }
}

/// The unit dispatched cross-chain.
///
/// Token addresses are destination-chain addresses. The source-chain token
/// that is approved and bridged lives in the dispatch context, never here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapPayload {
    pub maker: Address,
    pub token_in: Address,
    pub token_out: Address,
    pub recipient: Address,
    pub amount_ld: U256,
    pub min_amount_out_ld: U256,
    pub maker_traits: U256,
    pub program: Bytes,
    pub taker_traits_and_data: Bytes,
    pub strategy_salt: B256,
    pub strategy_tokens: Vec<Address>,
    pub strategy_balances: Vec<U256>,
    pub metadata: Bytes,
}

/// Reject token/balance arrays that are not parallel.
pub fn check_parallel(tokens: &[Address], balances: &[U256]) -> Result<(), DomainError> {
    if tokens.len() != balances.len() {
        return Err(DomainError::LengthMismatch {
            tokens: tokens.len(),
            balances: balances.len(),
        });
    }
    Ok(())
}

impl SwapPayload {
    /// Check the structural invariants the destination relies on.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::LengthMismatch`] for non-parallel arrays and
    /// [`DomainError::DuplicateToken`] when a token repeats.
    pub fn validate(&self) -> Result<(), DomainError> {
        check_parallel(&self.strategy_tokens, &self.strategy_balances)?;
        let mut seen = HashSet::with_capacity(self.strategy_tokens.len());
        for token in &self.strategy_tokens {
            if !seen.insert(*token) {
                return Err(DomainError::DuplicateToken { token: *token });
            }
        }
        Ok(())
    }

    /// Index of the bridged token (`token_in`) in the strategy arrays.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::BridgedTokenMissing`] if `token_in` has no slot.
    pub fn bridged_index(&self) -> Result<usize, DomainError> {
        self.strategy_tokens
            .iter()
            .position(|token| *token == self.token_in)
            .ok_or(DomainError::BridgedTokenMissing {
                token: self.token_in,
            })
    }

    /// Convert into the ABI struct.
    #[must_use]
    pub fn to_abi(&self) -> AbiSwapPayload {
        AbiSwapPayload {
            maker: self.maker,
            tokenIn: self.token_in,
            tokenOut: self.token_out,
            recipient: self.recipient,
            amountLD: self.amount_ld,
            minAmountOutLD: self.min_amount_out_ld,
            makerTraits: self.maker_traits,
            program: self.program.clone(),
            takerTraitsAndData: self.taker_traits_and_data.clone(),
            strategySalt: self.strategy_salt,
            strategyTokens: self.strategy_tokens.clone(),
            strategyBalances: self.strategy_balances.clone(),
            metadata: self.metadata.clone(),
        }
    }

    /// `abi.encode(payload)`: the compose message carried by the bridge.
    #[must_use]
    pub fn encode(&self) -> Bytes {
        self.to_abi().abi_encode().into()
    }
}

/// A payload whose amounts are final.
///
/// Derefs to [`SwapPayload`] for reading; there is no mutable access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalizedPayload(SwapPayload);

impl FinalizedPayload {
    /// Freeze a payload. Only the payload builder should call this.
    pub(crate) fn freeze(payload: SwapPayload) -> Self {
        Self(payload)
    }

    /// Give up the frozen wrapper, e.g. to persist the payload.
    #[must_use]
    pub fn into_inner(self) -> SwapPayload {
        self.0
    }
}

impl Deref for FinalizedPayload {
    type Target = SwapPayload;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
