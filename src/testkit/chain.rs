//! Scripted chain-facing ports.
//!
//! Each mock pops scripted results first and falls back to a sensible
//! default once the script is exhausted.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{FinalizedPayload, OftReceipt};
use crate::error::Result;
use crate::port::{
    ApprovalResult, BridgeLayer, BridgeQuoteRequest, Submission, SubmissionReceipt, Submitter,
    TokenAllowance,
};

/// Ordered record of port calls shared across mocks.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<&'static str>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, call: &'static str) {
        self.0.lock().push(call);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.0.lock().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.0.lock().iter().filter(|c| **c == call).count()
    }

    /// Index of the first `call`, if it happened.
    pub fn position(&self, call: &str) -> Option<usize> {
        self.0.lock().iter().position(|c| *c == call)
    }
}

// ---------------------------------------------------------------------------
// ScriptedBridge
// ---------------------------------------------------------------------------

/// Bridge layer that delivers `amount - bridge_fee` and charges a fixed
/// native fee unless scripted otherwise.
pub struct ScriptedBridge {
    log: CallLog,
    bridge_fee: U256,
    native_fee: U256,
    bridge_results: Mutex<VecDeque<Result<OftReceipt>>>,
    message_results: Mutex<VecDeque<Result<U256>>>,
    bridge_requests: Mutex<Vec<BridgeQuoteRequest>>,
    message_requests: Mutex<Vec<(FinalizedPayload, Bytes, U256)>>,
}

impl ScriptedBridge {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            bridge_fee: U256::from(6),
            native_fee: U256::from(100),
            bridge_results: Mutex::new(VecDeque::new()),
            message_results: Mutex::new(VecDeque::new()),
            bridge_requests: Mutex::new(Vec::new()),
            message_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_bridge_fee(mut self, fee: U256) -> Self {
        self.bridge_fee = fee;
        self
    }

    pub fn with_native_fee(mut self, fee: U256) -> Self {
        self.native_fee = fee;
        self
    }

    pub fn with_bridge_results(self, results: Vec<Result<OftReceipt>>) -> Self {
        *self.bridge_results.lock() = results.into();
        self
    }

    pub fn with_message_results(self, results: Vec<Result<U256>>) -> Self {
        *self.message_results.lock() = results.into();
        self
    }

    pub fn bridge_requests(&self) -> Vec<BridgeQuoteRequest> {
        self.bridge_requests.lock().clone()
    }

    pub fn message_requests(&self) -> Vec<(FinalizedPayload, Bytes, U256)> {
        self.message_requests.lock().clone()
    }
}

#[async_trait]
impl BridgeLayer for ScriptedBridge {
    async fn quote_bridge_amount(&self, request: &BridgeQuoteRequest) -> Result<OftReceipt> {
        self.log.push("quote_bridge");
        self.bridge_requests.lock().push(request.clone());
        if let Some(result) = self.bridge_results.lock().pop_front() {
            return result;
        }
        Ok(OftReceipt {
            amount_sent_ld: request.amount_ld,
            amount_received_ld: request.amount_ld.saturating_sub(self.bridge_fee),
        })
    }

    async fn quote_message(
        &self,
        payload: &FinalizedPayload,
        extra_options: &Bytes,
        min_amount_ld: U256,
    ) -> Result<U256> {
        self.log.push("quote_message");
        self.message_requests
            .lock()
            .push((payload.clone(), extra_options.clone(), min_amount_ld));
        if let Some(result) = self.message_results.lock().pop_front() {
            return result;
        }
        Ok(self.native_fee)
    }
}

// ---------------------------------------------------------------------------
// ScriptedAllowance
// ---------------------------------------------------------------------------

/// ERC-20 allowance whose approvals take effect immediately unless stuck.
pub struct ScriptedAllowance {
    log: CallLog,
    token: Address,
    current: Mutex<U256>,
    balance: U256,
    stuck: bool,
    failure: Option<String>,
    approvals: Mutex<Vec<(Address, U256)>>,
}

impl ScriptedAllowance {
    pub fn new(log: CallLog, current: U256) -> Self {
        Self {
            log,
            token: Address::repeat_byte(0x22),
            current: Mutex::new(current),
            balance: U256::MAX,
            stuck: false,
            failure: None,
            approvals: Mutex::new(Vec::new()),
        }
    }

    /// Wallet holds `balance` of the token instead of an unlimited amount.
    pub fn with_balance(mut self, balance: U256) -> Self {
        self.balance = balance;
        self
    }

    /// Approvals are mined but the allowance never changes.
    pub fn stuck(mut self) -> Self {
        self.stuck = true;
        self
    }

    /// Approvals report [`ApprovalResult::Failed`].
    pub fn failing(mut self, reason: &str) -> Self {
        self.failure = Some(reason.to_string());
        self
    }

    pub fn current(&self) -> U256 {
        *self.current.lock()
    }

    pub fn approvals(&self) -> Vec<(Address, U256)> {
        self.approvals.lock().clone()
    }
}

#[async_trait]
impl TokenAllowance for ScriptedAllowance {
    async fn allowance(&self, _spender: Address) -> Result<U256> {
        self.log.push("allowance");
        Ok(*self.current.lock())
    }

    async fn balance(&self) -> Result<U256> {
        self.log.push("balance");
        Ok(self.balance)
    }

    async fn approve(&self, spender: Address, amount: U256) -> Result<ApprovalResult> {
        self.log.push("approve");
        self.approvals.lock().push((spender, amount));
        if let Some(ref reason) = self.failure {
            return Ok(ApprovalResult::Failed {
                reason: reason.clone(),
            });
        }
        if !self.stuck {
            *self.current.lock() = amount;
        }
        Ok(ApprovalResult::Approved {
            tx_hash: B256::repeat_byte(0xa1),
            amount,
        })
    }

    fn token(&self) -> Address {
        self.token
    }
}

// ---------------------------------------------------------------------------
// RecordingSubmitter
// ---------------------------------------------------------------------------

/// Submitter that records every submission.
pub struct RecordingSubmitter {
    log: CallLog,
    results: Mutex<VecDeque<Result<SubmissionReceipt>>>,
    delay: Option<Duration>,
    submissions: Mutex<Vec<Submission>>,
    count: AtomicU32,
}

impl RecordingSubmitter {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            results: Mutex::new(VecDeque::new()),
            delay: None,
            submissions: Mutex::new(Vec::new()),
            count: AtomicU32::new(0),
        }
    }

    pub fn with_results(self, results: Vec<Result<SubmissionReceipt>>) -> Self {
        *self.results.lock() = results.into();
        self
    }

    /// Sleep before answering, to exercise confirmation timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn count(&self) -> u32 {
        self.count.load(Ordering::SeqCst)
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().clone()
    }
}

/// Receipt returned once the script is exhausted.
pub fn default_receipt() -> SubmissionReceipt {
    SubmissionReceipt {
        tx_hash: B256::repeat_byte(0xee),
        block_number: Some(1),
        gas_used: 21_000,
    }
}

#[async_trait]
impl Submitter for RecordingSubmitter {
    async fn submit(&self, submission: &Submission) -> Result<SubmissionReceipt> {
        self.log.push("submit");
        self.count.fetch_add(1, Ordering::SeqCst);
        self.submissions.lock().push(submission.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let scripted = self.results.lock().pop_front();
        scripted.unwrap_or_else(|| Ok(default_receipt()))
    }
}
