//! Strategy dispatch: payload → bridge quote → fee → balance → allowance →
//! sign → submit.
//!
//! Everything up to and including the balance and allowance checks can fail
//! without moving value. Once a transaction is broadcast, failures are terminal and
//! never retried here.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, B256, U256};
use chrono::Utc;
use tracing::{debug, info, warn};

use super::fee::{FeeQuoter, FeeRequest};
use super::payload::{Destination, PayloadBuilder};
use super::retry::RetryPolicy;
use crate::domain::identity::payload_strategy_hash;
use crate::domain::options::compose_options;
use crate::domain::salt::generate_salt;
use crate::domain::{
    Candidate, FeeQuote, FinalizedPayload, OftReceipt, ReportBody, SignedReport, StrategyHash,
};
use crate::error::{ExecutionError, Result, Stage, UpstreamError};
use crate::port::{
    ApprovalPolicy, ApprovalResult, BridgeLayer, BridgeQuoteRequest, ReportSigner, Submission,
    Submitter, TokenAllowance,
};

/// Per-dispatch inputs that are not part of the strategy candidate.
#[derive(Debug, Clone)]
pub struct ChainContext {
    pub destination: Destination,
    /// Source-chain sender contract; the spender of the bridged token.
    pub spender: Address,
    /// Explicit salt. A fresh one is generated when absent.
    pub salt: Option<B256>,
    /// Explicit native fee. Skips quoting and buffering.
    pub fee_override: Option<U256>,
}

/// Dispatcher knobs that stay fixed for the life of the process.
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub compose_gas_limit: u128,
    pub gas_limit: u64,
    pub approval: ApprovalPolicy,
    pub confirmation_timeout: Duration,
    pub dry_run: bool,
}

/// Outcome of one dispatch.
#[derive(Debug, Clone)]
pub struct DispatchResult {
    /// `None` for dry runs.
    pub tx_hash: Option<B256>,
    pub block_number: Option<u64>,
    pub strategy_hash: StrategyHash,
    pub payload: FinalizedPayload,
    pub fee: FeeQuote,
    pub bridge: OftReceipt,
    pub report: SignedReport,
}

impl DispatchResult {
    #[must_use]
    pub fn is_dry_run(&self) -> bool {
        self.tx_hash.is_none()
    }
}

/// Drives a single candidate from skeleton payload to confirmed transaction.
pub struct SwapDispatcher {
    builder: PayloadBuilder,
    bridge: Arc<dyn BridgeLayer>,
    fee: FeeQuoter,
    allowance: Arc<dyn TokenAllowance>,
    signer: Arc<dyn ReportSigner>,
    submitter: Arc<dyn Submitter>,
    retry: RetryPolicy,
    settings: DispatchSettings,
}

impl SwapDispatcher {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        builder: PayloadBuilder,
        bridge: Arc<dyn BridgeLayer>,
        fee: FeeQuoter,
        allowance: Arc<dyn TokenAllowance>,
        signer: Arc<dyn ReportSigner>,
        submitter: Arc<dyn Submitter>,
        retry: RetryPolicy,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            builder,
            bridge,
            fee,
            allowance,
            signer,
            submitter,
            retry,
            settings,
        }
    }

    #[must_use]
    pub fn is_dry_run(&self) -> bool {
        self.settings.dry_run
    }

    /// Dispatch `candidate`.
    ///
    /// # Errors
    ///
    /// - Domain errors for candidates that cannot form a valid payload.
    /// - Upstream errors when a quote or allowance read keeps failing.
    /// - Execution errors for approval, signing or submission failures.
    pub async fn dispatch(&self, candidate: &Candidate, ctx: &ChainContext) -> Result<DispatchResult> {
        let salt = ctx
            .salt
            .unwrap_or_else(|| generate_salt(u64::try_from(Utc::now().timestamp()).unwrap_or(0)));

        let skeleton = self.builder.build(candidate, &ctx.destination, salt)?;
        let requested = skeleton.amount_ld;
        let extra_options = compose_options(self.settings.compose_gas_limit);

        let bridge = self
            .quote_bridge(&BridgeQuoteRequest {
                amount_ld: requested,
                compose_msg: skeleton.encode(),
                extra_options: extra_options.clone(),
            })
            .await?;

        let payload = self
            .builder
            .finalize_amounts(skeleton, bridge.amount_received_ld)?;
        let min_amount_ld = payload.min_amount_out_ld;
        let strategy_hash = payload_strategy_hash(&payload);
        info!(
            asset = %candidate.asset,
            requested = %requested,
            received = %payload.amount_ld,
            min_amount_ld = %min_amount_ld,
            strategy_hash = %strategy_hash,
            "Payload finalized"
        );

        let fee = self
            .fee
            .quote(
                &FeeRequest {
                    payload: &payload,
                    extra_options: &extra_options,
                    min_amount_ld,
                },
                ctx.fee_override,
            )
            .await?;

        if self.settings.dry_run {
            let body = ReportBody::new(payload.clone(), extra_options, min_amount_ld);
            let report = self.sign_body(&body)?;
            info!(
                strategy_hash = %strategy_hash,
                value_wei = %fee.buffered_fee(),
                digest = %report.digest,
                "Dry-run: would submit dispatch"
            );
            return Ok(DispatchResult {
                tx_hash: None,
                block_number: None,
                strategy_hash,
                payload,
                fee,
                bridge,
                report,
            });
        }

        self.ensure_balance(requested).await?;
        self.ensure_allowance(ctx.spender, requested).await?;

        let body = ReportBody::new(payload.clone(), extra_options, min_amount_ld);
        let report = self.sign_body(&body)?;
        let submission = Submission {
            body,
            report: report.clone(),
            value: fee.buffered_fee(),
            gas_limit: self.settings.gas_limit,
        };

        let limit = self.settings.confirmation_timeout;
        let receipt = match tokio::time::timeout(limit, self.submitter.submit(&submission)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(ExecutionError::ConfirmationTimeout {
                    action: "dispatch",
                    secs: limit.as_secs(),
                }
                .into())
            }
        };

        info!(
            tx_hash = %receipt.tx_hash,
            block = ?receipt.block_number,
            gas_used = receipt.gas_used,
            strategy_hash = %strategy_hash,
            "Dispatch confirmed"
        );

        Ok(DispatchResult {
            tx_hash: Some(receipt.tx_hash),
            block_number: receipt.block_number,
            strategy_hash,
            payload,
            fee,
            bridge,
            report,
        })
    }

    async fn quote_bridge(&self, request: &BridgeQuoteRequest) -> Result<OftReceipt> {
        let receipt = self
            .retry
            .run(Stage::BridgeQuote, |_| self.bridge.quote_bridge_amount(request))
            .await?;

        if receipt.amount_received_ld.is_zero() {
            return Err(UpstreamError::BadQuote {
                stage: Stage::BridgeQuote,
                reason: "bridge would deliver nothing".into(),
            }
            .into());
        }
        if receipt.amount_received_ld > request.amount_ld {
            return Err(UpstreamError::BadQuote {
                stage: Stage::BridgeQuote,
                reason: format!(
                    "received {} exceeds sent {}",
                    receipt.amount_received_ld, request.amount_ld
                ),
            }
            .into());
        }

        debug!(
            sent = %receipt.amount_sent_ld,
            received = %receipt.amount_received_ld,
            bridge_fee = %receipt.bridge_fee(),
            "Bridge quoted"
        );
        Ok(receipt)
    }

    async fn ensure_balance(&self, required: U256) -> Result<()> {
        let balance = self
            .retry
            .run(Stage::Balance, |_| self.allowance.balance())
            .await?;
        if balance < required {
            warn!(balance = %balance, required = %required, "Wallet balance too low to bridge");
            return Err(ExecutionError::InsufficientBalance {
                balance: balance.to_string(),
                required: required.to_string(),
            }
            .into());
        }
        debug!(balance = %balance, required = %required, "Balance sufficient");
        Ok(())
    }

    /// Re-read the allowance and raise it if it no longer covers `required`.
    async fn ensure_allowance(&self, spender: Address, required: U256) -> Result<()> {
        let current = self.read_allowance(spender).await?;
        if current >= required {
            debug!(allowance = %current, required = %required, "Allowance sufficient");
            return Ok(());
        }

        let amount = self.settings.approval.amount_for(required);
        info!(
            token = %self.allowance.token(),
            spender = %spender,
            current = %current,
            amount = %amount,
            policy = ?self.settings.approval,
            "Approving bridged token"
        );

        let limit = self.settings.confirmation_timeout;
        let approval = match tokio::time::timeout(limit, self.allowance.approve(spender, amount)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(ExecutionError::ConfirmationTimeout {
                    action: "approval",
                    secs: limit.as_secs(),
                }
                .into())
            }
        };

        match approval {
            ApprovalResult::Approved { tx_hash, amount } => {
                info!(tx_hash = %tx_hash, amount = %amount, "Approval confirmed");
            }
            ApprovalResult::Failed { reason } => {
                return Err(ExecutionError::ApprovalFailed(reason).into());
            }
        }

        let after = self.read_allowance(spender).await?;
        if after < required {
            warn!(allowance = %after, required = %required, "Allowance still short after approval");
            return Err(ExecutionError::AllowanceShort {
                allowance: after.to_string(),
                required: required.to_string(),
            }
            .into());
        }
        Ok(())
    }

    async fn read_allowance(&self, spender: Address) -> Result<U256> {
        self.retry
            .run(Stage::Allowance, |_| self.allowance.allowance(spender))
            .await
    }

    fn sign_body(&self, body: &ReportBody) -> Result<SignedReport> {
        let report = self.signer.sign(body)?;
        debug!(digest = %report.digest, signer = %report.signer, "Report signed");
        Ok(report)
    }
}
