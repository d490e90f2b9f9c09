use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use alloy_primitives::{Address, U256};

use ghostline::error::{ConfigError, Error};
use ghostline::infrastructure::config::Config;

static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

const BASE: &str = r#"
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
recipient = "0x6666666666666666666666666666666666666666"
"#;

fn write_temp_config(contents: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let suffix = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.push(format!("ghostline-config-test-{nanos}-{suffix}.toml"));
    fs::write(&path, contents).expect("write temp config");
    path
}

fn load(contents: &str) -> Result<Config, Error> {
    let path = write_temp_config(contents);
    let result = Config::load(&path);
    let _ = fs::remove_file(&path);
    result
}

#[test]
fn config_loads_with_defaults() {
    let config = load(BASE).expect("valid config");

    assert_eq!(config.source.chain_id, 42161);
    assert_eq!(config.source.sender_address, Address::repeat_byte(0x11));
    assert_eq!(config.dispatch.fee_buffer_bps, 2_000);
    assert_eq!(config.retry.confirmation_timeout_secs, 300);
    assert_eq!(config.logging.format, "pretty");
    assert!(config.bridge_params().unwrap().is_none());
}

#[test]
fn config_with_bridge_amount_arms_the_engine() {
    let toml = format!(
        "{BASE}token_out = \"0x5555555555555555555555555555555555555555\"\n\n[dispatch]\namount = \"1000000\"\n"
    );
    let config = load(&toml).expect("valid config");

    let params = config.bridge_params().unwrap().unwrap();
    assert_eq!(params.amount, U256::from(1_000_000));
    assert_eq!(params.token_out, Address::repeat_byte(0x55));
}

#[test]
fn config_rejects_amount_without_token_out() {
    let toml = format!("{BASE}\n[dispatch]\namount = \"1000000\"\n");

    assert!(
        matches!(
            load(&toml),
            Err(Error::Config(ConfigError::MissingField {
                field: "destination.token_out"
            }))
        ),
        "Expected missing token_out error"
    );
}

#[test]
fn config_rejects_invalid_slippage() {
    let toml = format!("{BASE}\n[dispatch]\nslippage_bps = 20000\n");

    match load(&toml) {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "dispatch.slippage_bps",
            ..
        })) => {}
        Err(err) => panic!("Expected invalid slippage error, got {err}"),
        Ok(config) => panic!(
            "Expected invalid slippage to be rejected, got {}",
            config.dispatch.slippage_bps
        ),
    }
}

#[test]
fn config_rejects_empty_feed_url() {
    let toml = BASE.replace(
        "url = \"http://localhost:3001/api/aggregated-feed\"",
        "url = \"\"",
    );

    assert!(matches!(
        load(&toml),
        Err(Error::Config(ConfigError::MissingField { field: "feed.url" }))
    ));
}

#[test]
fn config_rejects_zero_sender() {
    let toml = BASE.replace(
        "sender_address = \"0x1111111111111111111111111111111111111111\"",
        "sender_address = \"0x0000000000000000000000000000000000000000\"",
    );

    assert!(matches!(
        load(&toml),
        Err(Error::Config(ConfigError::InvalidValue {
            field: "source.sender_address",
            ..
        }))
    ));
}

#[test]
fn config_rejects_zero_interval() {
    let toml = format!("{BASE}\n[schedule]\ninterval_secs = 0\n");

    assert!(matches!(
        load(&toml),
        Err(Error::Config(ConfigError::InvalidValue {
            field: "schedule.interval_secs",
            ..
        }))
    ));
}

#[test]
fn config_rejects_malformed_toml() {
    assert!(matches!(
        load("[feed\nurl = 1"),
        Err(Error::Config(ConfigError::Parse(_)))
    ));
}

#[test]
fn config_reports_missing_file() {
    let result = Config::load("/definitely/not/here/ghostline.toml");
    assert!(matches!(result, Err(Error::Config(ConfigError::ReadFile(_)))));
}

#[test]
fn example_config_is_valid() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config.example.toml");
    let config = Config::load(path).expect("example config loads");

    assert!(config.dry_run);
    assert!(config.bridge_params().unwrap().is_some());
}
