//! Transaction submission port.

use alloy_primitives::{B256, U256};
use async_trait::async_trait;

use crate::domain::{ReportBody, SignedReport};
use crate::error::Result;

/// Everything the submitter needs to broadcast one dispatch.
#[derive(Debug, Clone)]
pub struct Submission {
    pub body: ReportBody,
    pub report: SignedReport,
    /// Native value attached to the transaction.
    pub value: U256,
    pub gas_limit: u64,
}

/// Confirmed on-chain submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub tx_hash: B256,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

/// Broadcasts a signed dispatch and waits for it to be mined.
///
/// Submission moves value. Callers must never retry it.
#[async_trait]
pub trait Submitter: Send + Sync {
    /// # Errors
    ///
    /// Returns [`crate::error::ExecutionError`] for rejected broadcasts and
    /// reverted transactions.
    async fn submit(&self, submission: &Submission) -> Result<SubmissionReceipt>;
}
