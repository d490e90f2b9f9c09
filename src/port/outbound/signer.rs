//! Report signing port.

use alloy_primitives::Address;

use crate::domain::{ReportBody, SignedReport};
use crate::error::Result;

/// Signs report bodies with ECDSA over their Keccak-256 digest.
pub trait ReportSigner: Send + Sync {
    /// # Errors
    ///
    /// Returns [`crate::error::ExecutionError::SigningFailed`] if the key
    /// cannot produce a signature.
    fn sign(&self, body: &ReportBody) -> Result<SignedReport>;

    /// Address recovered from this signer's signatures.
    fn address(&self) -> Address;
}
