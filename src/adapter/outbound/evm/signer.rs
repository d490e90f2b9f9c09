//! Report signing with a local secp256k1 key.

use alloy_primitives::{Address, Bytes};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;

use crate::domain::{ReportBody, SignedReport};
use crate::error::{ExecutionError, Result};
use crate::port::ReportSigner;

/// Signs report digests with the wallet key.
#[derive(Debug, Clone)]
pub struct LocalReportSigner {
    signer: PrivateKeySigner,
}

impl LocalReportSigner {
    #[must_use]
    pub fn new(signer: PrivateKeySigner) -> Self {
        Self { signer }
    }
}

impl ReportSigner for LocalReportSigner {
    fn sign(&self, body: &ReportBody) -> Result<SignedReport> {
        let encoded = body.encode();
        let digest = alloy_primitives::keccak256(&encoded);
        let signature = self
            .signer
            .sign_hash_sync(&digest)
            .map_err(|e| ExecutionError::SigningFailed(e.to_string()))?;

        Ok(SignedReport {
            encoded,
            digest,
            signature: Bytes::from(signature.as_bytes().to_vec()),
            signer: self.signer.address(),
        })
    }

    fn address(&self) -> Address {
        self.signer.address()
    }
}
