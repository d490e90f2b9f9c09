//! Dispatch wallet configuration.

use std::fs;

use alloy_signer_local::PrivateKeySigner;
use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Environment variable holding the hex private key.
pub const PRIVATE_KEY_ENV: &str = "WALLET_PRIVATE_KEY";
const KEYSTORE_PASSWORD_ENV: &str = "GHOSTLINE_KEYSTORE_PASSWORD";
const KEYSTORE_PASSWORD_FILE_ENV: &str = "GHOSTLINE_KEYSTORE_PASSWORD_FILE";

/// Wallet that pays bridge fees and signs reports.
///
/// The private key is never read from the config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WalletConfig {
    /// Optional encrypted keystore, used when `WALLET_PRIVATE_KEY` is unset.
    #[serde(default)]
    pub keystore_path: Option<String>,
    #[serde(skip)]
    pub private_key: Option<String>,
}

impl WalletConfig {
    /// Fill `private_key` from the environment or the keystore.
    pub(crate) fn resolve_key(&mut self) -> Result<()> {
        self.private_key = std::env::var(PRIVATE_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty());
        if self.private_key.is_some() {
            return Ok(());
        }
        if let Some(ref path) = self.keystore_path {
            let password = read_keystore_password()?;
            let signer = PrivateKeySigner::decrypt_keystore(path, password).map_err(|e| {
                ConfigError::InvalidValue {
                    field: "wallet.keystore_path",
                    reason: e.to_string(),
                }
            })?;
            self.private_key = Some(format!("{:x}", signer.to_bytes()));
        }
        Ok(())
    }

    /// Build the local signer.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingField`] when no key was resolved, or
    /// [`ConfigError::InvalidValue`] when it is not a valid secp256k1 key.
    pub fn signer(&self) -> Result<PrivateKeySigner> {
        let key = self.private_key.as_deref().ok_or(ConfigError::MissingField {
            field: PRIVATE_KEY_ENV,
        })?;
        let signer = key
            .trim()
            .parse::<PrivateKeySigner>()
            .map_err(|e| ConfigError::InvalidValue {
                field: PRIVATE_KEY_ENV,
                reason: e.to_string(),
            })?;
        Ok(signer)
    }
}

fn read_keystore_password() -> Result<String> {
    if let Ok(password) = std::env::var(KEYSTORE_PASSWORD_ENV) {
        return Ok(password);
    }
    if let Ok(path) = std::env::var(KEYSTORE_PASSWORD_FILE_ENV) {
        let contents = fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let password = contents.trim().to_string();
        if password.is_empty() {
            return Err(ConfigError::MissingField {
                field: KEYSTORE_PASSWORD_FILE_ENV,
            }
            .into());
        }
        return Ok(password);
    }

    Err(ConfigError::MissingField {
        field: KEYSTORE_PASSWORD_ENV,
    }
    .into())
}
