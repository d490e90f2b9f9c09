//! Application configuration loading and validation.
//!
//! [`Config`] aggregates every setting the dispatcher needs. It is loaded
//! from a TOML file; the signing key comes from `WALLET_PRIVATE_KEY` (or an
//! encrypted keystore) and never from the file itself.
//!
//! # Example
//!
//! ```no_run
//! use ghostline::infrastructure::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use alloy_primitives::{Address, Bytes, B256, U256};
use serde::Deserialize;
use url::Url;

use super::logging::LoggingConfig;
use super::wallet::WalletConfig;
use crate::application::{Destination, RetryPolicy};
use crate::domain::amount::{DEFAULT_FEE_BUFFER_BPS, DEFAULT_SLIPPAGE_BPS};
use crate::domain::options::DEFAULT_COMPOSE_GAS_LIMIT;
use crate::domain::salt::parse_salt;
use crate::domain::{BridgeParams, Bps, TokenOrder};
use crate::error::{ConfigError, Result};
use crate::port::ApprovalPolicy;

/// Aggregated feed endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    pub url: String,
    #[serde(default = "default_feed_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_feed_timeout_secs() -> u64 {
    15
}

/// How often `run` evaluates the feed.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_interval_secs() -> u64 {
    300
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

/// Source chain: where the bridged token and the sender contract live.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub chain_id: u64,
    pub rpc_url: String,
    /// OAquaSender contract; also the token spender.
    pub sender_address: Address,
    /// Source-chain address of the bridged token.
    pub token_address: Address,
    /// Stargate pool override. Read from the sender when absent.
    #[serde(default)]
    pub stargate_pool: Option<Address>,
}

/// Destination chain parties.
#[derive(Debug, Clone, Deserialize)]
pub struct DestinationConfig {
    /// Executor that consumes the strategy.
    pub maker: Address,
    /// Destination address of the bridged token.
    pub token_in: Address,
    /// Counter-token for scheduled dispatches.
    #[serde(default)]
    pub token_out: Option<Address>,
    pub recipient: Address,
}

/// Payload, fee and transaction knobs.
///
/// Amounts are decimal or `0x` hex strings in local decimals.
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchConfig {
    #[serde(default = "default_fee_buffer_bps")]
    pub fee_buffer_bps: u32,
    #[serde(default = "default_slippage_bps")]
    pub slippage_bps: u32,
    #[serde(default = "default_compose_gas_limit")]
    pub compose_gas_limit: u64,
    #[serde(default)]
    pub token_order: TokenOrder,
    #[serde(default)]
    pub approval: ApprovalPolicy,
    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,
    #[serde(default = "default_zero")]
    pub maker_traits: String,
    /// Bridge amount for scheduled dispatches. Without it every crisis is
    /// skipped.
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default = "default_zero")]
    pub strategy_buffer: String,
    /// Hex program replacing the default one.
    #[serde(default)]
    pub program: Option<String>,
    /// Hex taker traits and data forwarded to the destination.
    #[serde(default)]
    pub taker_data: Option<String>,
    /// Hex metadata blob forwarded to the destination.
    #[serde(default)]
    pub metadata: Option<String>,
    /// Fixed salt (hex or short label), accepted by `send` only. Generated per
    /// dispatch when absent.
    #[serde(default)]
    pub salt: Option<String>,
    /// Native fee in wei; skips quoting and buffering.
    #[serde(default)]
    pub native_fee_wei: Option<String>,
}

fn default_fee_buffer_bps() -> u32 {
    DEFAULT_FEE_BUFFER_BPS
}

fn default_slippage_bps() -> u32 {
    DEFAULT_SLIPPAGE_BPS
}

fn default_compose_gas_limit() -> u64 {
    u64::try_from(DEFAULT_COMPOSE_GAS_LIMIT).unwrap_or(u64::MAX)
}

fn default_gas_limit() -> u64 {
    2_500_000
}

fn default_zero() -> String {
    "0".into()
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            fee_buffer_bps: default_fee_buffer_bps(),
            slippage_bps: default_slippage_bps(),
            compose_gas_limit: default_compose_gas_limit(),
            token_order: TokenOrder::default(),
            approval: ApprovalPolicy::default(),
            gas_limit: default_gas_limit(),
            maker_traits: default_zero(),
            amount: None,
            strategy_buffer: default_zero(),
            program: None,
            taker_data: None,
            metadata: None,
            salt: None,
            native_fee_wei: None,
        }
    }
}

/// Retry and timeout settings for remote calls.
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_attempts")]
    pub attempts: u32,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_confirmation_timeout_secs")]
    pub confirmation_timeout_secs: u64,
}

fn default_attempts() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    500
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_confirmation_timeout_secs() -> u64 {
    300
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            confirmation_timeout_secs: default_confirmation_timeout_secs(),
        }
    }
}

impl RetryConfig {
    #[must_use]
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.attempts,
            Duration::from_millis(self.initial_backoff_ms),
            Duration::from_secs(self.request_timeout_secs),
        )
    }

    #[must_use]
    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }
}

/// Where the last dispatch record is kept.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data/last_dispatch.json")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Quote and sign, but never approve or submit.
    #[serde(default)]
    pub dry_run: bool,

    #[serde(default)]
    pub logging: LoggingConfig,

    pub feed: FeedConfig,

    #[serde(default)]
    pub schedule: ScheduleConfig,

    pub source: SourceConfig,

    pub destination: DestinationConfig,

    #[serde(default)]
    pub dispatch: DispatchConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub store: StoreConfig,

    /// Private key is loaded from `WALLET_PRIVATE_KEY`.
    #[serde(default)]
    pub wallet: WalletConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed, a keystore cannot be
    /// decrypted, or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.wallet.resolve_key()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or [`parse_toml`](Self::parse_toml) fails.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Check ranges and parse every string-encoded value once.
    ///
    /// # Errors
    ///
    /// The first [`ConfigError`] found.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if !self.logging.is_known_format() {
            return Err(invalid("logging.format", "must be \"pretty\" or \"json\""));
        }

        self.feed_url()?;
        if self.feed.timeout_secs == 0 {
            return Err(invalid("feed.timeout_secs", "must be greater than 0"));
        }
        if self.schedule.interval_secs == 0 {
            return Err(invalid("schedule.interval_secs", "must be greater than 0"));
        }

        self.rpc_url()?;
        non_zero("source.sender_address", self.source.sender_address)?;
        non_zero("source.token_address", self.source.token_address)?;
        non_zero("destination.maker", self.destination.maker)?;
        non_zero("destination.token_in", self.destination.token_in)?;
        non_zero("destination.recipient", self.destination.recipient)?;

        let dispatch = &self.dispatch;
        if !self.slippage().is_fraction() {
            return Err(invalid("dispatch.slippage_bps", "must be between 0 and 10000"));
        }
        if !self.fee_buffer().is_fraction() {
            return Err(invalid("dispatch.fee_buffer_bps", "must be between 0 and 10000"));
        }
        if dispatch.compose_gas_limit == 0 {
            return Err(invalid("dispatch.compose_gas_limit", "must be greater than 0"));
        }
        if dispatch.gas_limit == 0 {
            return Err(invalid("dispatch.gas_limit", "must be greater than 0"));
        }
        self.maker_traits()?;
        self.program()?;
        self.taker_data()?;
        self.metadata()?;
        self.salt()?;
        self.fee_override()?;
        self.bridge_params()?;

        let retry = &self.retry;
        if retry.attempts == 0 {
            return Err(invalid("retry.attempts", "must be greater than 0"));
        }
        if retry.request_timeout_secs == 0 {
            return Err(invalid("retry.request_timeout_secs", "must be greater than 0"));
        }
        if retry.confirmation_timeout_secs == 0 {
            return Err(invalid(
                "retry.confirmation_timeout_secs",
                "must be greater than 0",
            ));
        }

        Ok(())
    }

    /// # Errors
    ///
    /// Missing or unparsable `feed.url`.
    pub fn feed_url(&self) -> Result<Url> {
        parse_url("feed.url", &self.feed.url)
    }

    /// # Errors
    ///
    /// Missing or unparsable `source.rpc_url`.
    pub fn rpc_url(&self) -> Result<Url> {
        parse_url("source.rpc_url", &self.source.rpc_url)
    }

    #[must_use]
    pub fn slippage(&self) -> Bps {
        Bps::new(self.dispatch.slippage_bps)
    }

    #[must_use]
    pub fn fee_buffer(&self) -> Bps {
        Bps::new(self.dispatch.fee_buffer_bps)
    }

    #[must_use]
    pub fn destination(&self) -> Destination {
        Destination {
            maker: self.destination.maker,
            token_in: self.destination.token_in,
            recipient: self.destination.recipient,
        }
    }

    /// # Errors
    ///
    /// `dispatch.maker_traits` is not a number.
    pub fn maker_traits(&self) -> Result<U256> {
        parse_u256("dispatch.maker_traits", &self.dispatch.maker_traits)
    }

    /// # Errors
    ///
    /// `dispatch.program` is not hex.
    pub fn program(&self) -> Result<Option<Bytes>> {
        self.dispatch
            .program
            .as_deref()
            .map(|p| parse_bytes("dispatch.program", p))
            .transpose()
    }

    /// # Errors
    ///
    /// `dispatch.taker_data` is not hex.
    pub fn taker_data(&self) -> Result<Bytes> {
        self.dispatch
            .taker_data
            .as_deref()
            .map_or_else(|| Ok(Bytes::new()), |d| parse_bytes("dispatch.taker_data", d))
    }

    /// # Errors
    ///
    /// `dispatch.metadata` is not hex.
    pub fn metadata(&self) -> Result<Bytes> {
        self.dispatch
            .metadata
            .as_deref()
            .map_or_else(|| Ok(Bytes::new()), |d| parse_bytes("dispatch.metadata", d))
    }

    /// # Errors
    ///
    /// `dispatch.salt` is neither 32-byte hex nor a short label.
    pub fn salt(&self) -> Result<Option<B256>> {
        self.dispatch
            .salt
            .as_deref()
            .map(|s| {
                parse_salt(s).map_err(|e| ConfigError::InvalidValue {
                    field: "dispatch.salt",
                    reason: e.to_string(),
                })
            })
            .transpose()
            .map_err(Into::into)
    }

    /// # Errors
    ///
    /// `dispatch.native_fee_wei` is not a positive number.
    pub fn fee_override(&self) -> Result<Option<U256>> {
        let Some(raw) = self.dispatch.native_fee_wei.as_deref() else {
            return Ok(None);
        };
        let fee = parse_u256("dispatch.native_fee_wei", raw)?;
        if fee.is_zero() {
            return Err(invalid("dispatch.native_fee_wei", "must be greater than 0"));
        }
        Ok(Some(fee))
    }

    /// Bridge parameters for scheduled dispatches, if an amount is configured.
    ///
    /// # Errors
    ///
    /// Unparsable amounts, a zero amount, or an amount without
    /// `destination.token_out`.
    pub fn bridge_params(&self) -> Result<Option<BridgeParams>> {
        let Some(raw) = self.dispatch.amount.as_deref() else {
            return Ok(None);
        };
        let amount = parse_u256("dispatch.amount", raw)?;
        if amount.is_zero() {
            return Err(invalid("dispatch.amount", "must be greater than 0"));
        }
        let token_out = self.destination.token_out.ok_or(ConfigError::MissingField {
            field: "destination.token_out",
        })?;
        non_zero("destination.token_out", token_out)?;
        if token_out == self.destination.token_in {
            return Err(invalid(
                "destination.token_out",
                "must differ from destination.token_in",
            ));
        }
        let strategy_buffer = parse_u256("dispatch.strategy_buffer", &self.dispatch.strategy_buffer)?;

        Ok(Some(BridgeParams {
            amount,
            token_out,
            strategy_buffer,
        }))
    }
}

fn invalid(field: &'static str, reason: &str) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
    .into()
}

fn non_zero(field: &'static str, address: Address) -> Result<()> {
    if address.is_zero() {
        return Err(invalid(field, "must not be the zero address"));
    }
    Ok(())
}

fn parse_url(field: &'static str, raw: &str) -> Result<Url> {
    if raw.trim().is_empty() {
        return Err(ConfigError::MissingField { field }.into());
    }
    Url::parse(raw).map_err(|e| invalid(field, &e.to_string()))
}

/// Decimal or `0x`-prefixed hex.
pub(crate) fn parse_u256(field: &'static str, raw: &str) -> Result<U256> {
    U256::from_str(raw.trim()).map_err(|e| invalid(field, &e.to_string()))
}

pub(crate) fn parse_bytes(field: &'static str, raw: &str) -> Result<Bytes> {
    Bytes::from_str(raw.trim()).map_err(|e| invalid(field, &e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const MINIMAL: &str = r#"
[feed]
url = "http://localhost:3001/api/aggregated-feed"

[source]
chain_id = 42161
rpc_url = "http://localhost:8545"
sender_address = "0x1111111111111111111111111111111111111111"
token_address = "0x2222222222222222222222222222222222222222"

[destination]
maker = "0x3333333333333333333333333333333333333333"
token_in = "0x4444444444444444444444444444444444444444"
token_out = "0x5555555555555555555555555555555555555555"
recipient = "0x6666666666666666666666666666666666666666"
"#;

    fn parse(extra: &str) -> Result<Config> {
        let mut config: Config =
            toml::from_str(&format!("{MINIMAL}\n{extra}")).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn invalid_field(result: Result<Config>) -> &'static str {
        match result {
            Err(Error::Config(ConfigError::InvalidValue { field, .. })) => field,
            Err(Error::Config(ConfigError::MissingField { field })) => field,
            Err(e) => panic!("unexpected error {e}"),
            Ok(_) => panic!("expected validation failure"),
        }
    }

    #[test]
    fn defaults_apply() {
        let config = parse("").unwrap();
        assert!(!config.dry_run);
        assert_eq!(config.dispatch.fee_buffer_bps, 2_000);
        assert_eq!(config.dispatch.slippage_bps, 50);
        assert_eq!(config.dispatch.compose_gas_limit, 2_000_000);
        assert_eq!(config.dispatch.gas_limit, 2_500_000);
        assert_eq!(config.dispatch.approval, ApprovalPolicy::Exact);
        assert_eq!(config.dispatch.token_order, TokenOrder::BridgedFirst);
        assert_eq!(config.schedule.interval_secs, 300);
        assert_eq!(config.retry.attempts, 3);
        assert_eq!(config.store.path, PathBuf::from("data/last_dispatch.json"));
        assert_eq!(config.bridge_params().unwrap(), None);
        assert_eq!(config.fee_override().unwrap(), None);
    }

    #[test]
    fn bridge_params_parse_decimal_and_hex() {
        let config = parse(
            r#"
[dispatch]
amount = "10000"
strategy_buffer = "0x1f4"
"#,
        )
        .unwrap();
        let params = config.bridge_params().unwrap().unwrap();
        assert_eq!(params.amount, U256::from(10_000));
        assert_eq!(params.strategy_buffer, U256::from(500));
    }

    #[test]
    fn enum_settings_use_snake_case() {
        let config = parse(
            r#"
[dispatch]
approval = "unlimited"
token_order = "bridged_last"
"#,
        )
        .unwrap();
        assert_eq!(config.dispatch.approval, ApprovalPolicy::Unlimited);
        assert_eq!(config.dispatch.token_order, TokenOrder::BridgedLast);
    }

    #[test]
    fn rejects_slippage_above_one_hundred_percent() {
        assert_eq!(
            invalid_field(parse("[dispatch]\nslippage_bps = 10001")),
            "dispatch.slippage_bps"
        );
    }

    #[test]
    fn rejects_zero_fee_override() {
        assert_eq!(
            invalid_field(parse("[dispatch]\nnative_fee_wei = \"0\"")),
            "dispatch.native_fee_wei"
        );
    }

    #[test]
    fn rejects_bad_program_hex() {
        assert_eq!(
            invalid_field(parse("[dispatch]\nprogram = \"0xzz\"")),
            "dispatch.program"
        );
    }

    #[test]
    fn rejects_zero_attempts() {
        assert_eq!(
            invalid_field(parse("[retry]\nattempts = 0")),
            "retry.attempts"
        );
    }

    #[test]
    fn rejects_unknown_log_format() {
        assert_eq!(
            invalid_field(parse("[logging]\nformat = \"xml\"")),
            "logging.format"
        );
    }

    #[test]
    fn label_salt_is_accepted() {
        let config = parse("[dispatch]\nsalt = \"ghost-1\"").unwrap();
        assert!(config.salt().unwrap().is_some());
    }
}
