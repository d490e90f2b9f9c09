//! `sendSwap` submission.

use alloy_primitives::{Address, Signature};
use alloy_provider::network::ReceiptResponse;
use async_trait::async_trait;
use tracing::info;

use super::contracts::IOAquaSender;
use super::EvmConnection;
use crate::domain::SignedReport;
use crate::error::{ExecutionError, Result};
use crate::port::{Submission, SubmissionReceipt, Submitter};

/// Broadcasts dispatches through `OAquaSender.sendSwap`.
pub struct OAquaSubmitter {
    conn: EvmConnection,
    sender: Address,
}

impl OAquaSubmitter {
    #[must_use]
    pub fn new(conn: EvmConnection, sender: Address) -> Self {
        Self { conn, sender }
    }
}

/// Check that `report` signs exactly `digest` and recovers to its signer.
pub(crate) fn verify_report(report: &SignedReport, digest: alloy_primitives::B256) -> Result<()> {
    if report.digest != digest {
        return Err(ExecutionError::SigningFailed("report digest does not match body".into()).into());
    }
    let signature = Signature::try_from(&report.signature[..])
        .map_err(|e| ExecutionError::SigningFailed(format!("malformed signature: {e}")))?;
    let recovered = signature
        .recover_address_from_prehash(&report.digest)
        .map_err(|e| ExecutionError::SigningFailed(format!("unrecoverable signature: {e}")))?;
    if recovered != report.signer {
        return Err(ExecutionError::SigningFailed(format!(
            "signature recovers to {recovered}, expected {}",
            report.signer
        ))
        .into());
    }
    Ok(())
}

#[async_trait]
impl Submitter for OAquaSubmitter {
    async fn submit(&self, submission: &Submission) -> Result<SubmissionReceipt> {
        let body = &submission.body;
        verify_report(&submission.report, body.digest())?;

        let provider = self.conn.writer();
        let sender = IOAquaSender::new(self.sender, &provider);

        info!(
            sender = %self.sender,
            value_wei = %submission.value,
            gas_limit = submission.gas_limit,
            digest = %submission.report.digest,
            "Broadcasting sendSwap"
        );

        let pending_tx = sender
            .sendSwap(
                body.payload.to_abi(),
                body.extra_options.clone(),
                body.min_amount_ld,
            )
            .value(submission.value)
            .gas(submission.gas_limit)
            .send()
            .await
            .map_err(|e| ExecutionError::SubmissionFailed(format!("send: {e}")))?;

        let tx_hash = *pending_tx.tx_hash();
        info!(tx_hash = %tx_hash, "sendSwap broadcast, awaiting receipt");

        let receipt = pending_tx
            .get_receipt()
            .await
            .map_err(|e| ExecutionError::SubmissionFailed(format!("receipt for {tx_hash}: {e}")))?;

        if !receipt.status() {
            return Err(ExecutionError::Reverted {
                tx_hash: receipt.transaction_hash.to_string(),
            }
            .into());
        }

        Ok(SubmissionReceipt {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        })
    }
}
