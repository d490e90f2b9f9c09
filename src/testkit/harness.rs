//! Dispatcher wired to scripted ports.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::U256;
use alloy_signer_local::PrivateKeySigner;

use super::chain::{CallLog, RecordingSubmitter, ScriptedAllowance, ScriptedBridge};
use crate::adapter::outbound::evm::LocalReportSigner;
use crate::application::{DispatchSettings, FeeQuoter, PayloadBuilder, RetryPolicy, SwapDispatcher};
use crate::domain::amount::{DEFAULT_FEE_BUFFER_BPS, DEFAULT_SLIPPAGE_BPS};
use crate::domain::{Bps, TokenOrder};
use crate::port::ApprovalPolicy;

/// Mocks plus the settings used to build a dispatcher from them.
///
/// Mutate the public fields before calling [`dispatcher`](Self::dispatcher).
pub struct DispatchHarness {
    pub log: CallLog,
    pub bridge: Arc<ScriptedBridge>,
    pub allowance: Arc<ScriptedAllowance>,
    pub submitter: Arc<RecordingSubmitter>,
    pub signer: PrivateKeySigner,
    pub settings: DispatchSettings,
    pub fee_buffer: Bps,
    pub retry: RetryPolicy,
}

/// Fast retries for tests.
pub fn test_retry() -> RetryPolicy {
    RetryPolicy::new(3, Duration::from_millis(1), Duration::from_secs(1))
}

pub fn test_settings() -> DispatchSettings {
    DispatchSettings {
        compose_gas_limit: 2_000_000,
        gas_limit: 2_500_000,
        approval: ApprovalPolicy::Exact,
        confirmation_timeout: Duration::from_secs(5),
        dry_run: false,
    }
}

impl DispatchHarness {
    /// Harness whose allowance starts at `allowance`.
    pub fn new(allowance: U256) -> Self {
        let log = CallLog::new();
        Self {
            bridge: Arc::new(ScriptedBridge::new(log.clone())),
            allowance: Arc::new(ScriptedAllowance::new(log.clone(), allowance)),
            submitter: Arc::new(RecordingSubmitter::new(log.clone())),
            log,
            signer: PrivateKeySigner::random(),
            settings: test_settings(),
            fee_buffer: Bps::new(DEFAULT_FEE_BUFFER_BPS),
            retry: test_retry(),
        }
    }

    pub fn with_bridge(mut self, build: impl FnOnce(ScriptedBridge) -> ScriptedBridge) -> Self {
        self.bridge = Arc::new(build(ScriptedBridge::new(self.log.clone())));
        self
    }

    pub fn with_allowance(
        mut self,
        build: impl FnOnce(ScriptedAllowance) -> ScriptedAllowance,
        current: U256,
    ) -> Self {
        self.allowance = Arc::new(build(ScriptedAllowance::new(self.log.clone(), current)));
        self
    }

    pub fn with_submitter(
        mut self,
        build: impl FnOnce(RecordingSubmitter) -> RecordingSubmitter,
    ) -> Self {
        self.submitter = Arc::new(build(RecordingSubmitter::new(self.log.clone())));
        self
    }

    pub fn dispatcher(&self) -> SwapDispatcher {
        let builder = PayloadBuilder::new(
            U256::ZERO,
            Bps::new(DEFAULT_SLIPPAGE_BPS),
            TokenOrder::BridgedFirst,
        );
        let fee = FeeQuoter::new(self.bridge.clone(), self.fee_buffer, self.retry);
        SwapDispatcher::new(
            builder,
            self.bridge.clone(),
            fee,
            self.allowance.clone(),
            Arc::new(LocalReportSigner::new(self.signer.clone())),
            self.submitter.clone(),
            self.retry,
            self.settings.clone(),
        )
    }
}
