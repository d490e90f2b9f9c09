//! EVM adapters for the source chain.
//!
//! Every adapter rebuilds its provider per call from the shared
//! [`EvmConnection`]; read-only calls use a plain provider, writes attach the
//! wallet.

mod allowance;
mod bridge;
pub mod contracts;
mod signer;
mod submitter;

use alloy_primitives::Address;
use alloy_provider::network::EthereumWallet;
use alloy_provider::{Provider, ProviderBuilder};
use alloy_signer_local::PrivateKeySigner;
use url::Url;

use crate::error::{Result, Stage, UpstreamError};

pub use allowance::Erc20Allowance;
pub use bridge::OAquaBridge;
pub use signer::LocalReportSigner;
pub use submitter::OAquaSubmitter;

/// RPC endpoint and wallet shared by the chain adapters.
#[derive(Debug, Clone)]
pub struct EvmConnection {
    rpc_url: Url,
    signer: PrivateKeySigner,
}

impl EvmConnection {
    #[must_use]
    pub fn new(rpc_url: Url, signer: PrivateKeySigner) -> Self {
        Self { rpc_url, signer }
    }

    /// Wallet address that owns the bridged tokens.
    #[must_use]
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    #[must_use]
    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }

    #[must_use]
    pub fn rpc_url(&self) -> &Url {
        &self.rpc_url
    }

    /// Chain id reported by the RPC endpoint.
    ///
    /// # Errors
    ///
    /// [`UpstreamError::Unavailable`] when the endpoint cannot be reached.
    pub async fn chain_id(&self) -> Result<u64> {
        self.reader()
            .get_chain_id()
            .await
            .map_err(|e| {
                UpstreamError::Unavailable {
                    stage: Stage::Chain,
                    reason: e.to_string(),
                }
                .into()
            })
    }

    fn reader(&self) -> impl Provider {
        ProviderBuilder::new().connect_http(self.rpc_url.clone())
    }

    fn writer(&self) -> impl Provider {
        let wallet = EthereumWallet::from(self.signer.clone());
        ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(self.rpc_url.clone())
    }
}
