//! Command-line interface definitions.

use std::path::PathBuf;

use alloy_primitives::Address;
use clap::{Parser, Subcommand};

/// Crisis-triggered cross-chain liquidity dispatch
#[derive(Parser, Debug)]
#[command(name = "ghostline")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate the feed on a fixed interval until interrupted
    Run(RunArgs),

    /// Evaluate the feed once and exit
    Once(RunArgs),

    /// Dispatch a single strategy with explicit parameters
    Send(Box<SendArgs>),

    /// Compute a strategy hash offline
    Hash(HashArgs),

    /// Print LayerZero executor options offline
    Options(OptionsArgs),

    /// Show the last persisted dispatch
    Last(ConfigPathArg),
}

fn default_config() -> PathBuf {
    PathBuf::from("config.toml")
}

/// Shared argument for commands that only need a configuration path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file.
    #[arg(short, long, default_value_os_t = default_config())]
    pub config: PathBuf,
}

/// Arguments for `run` and `once`.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to the configuration file.
    #[arg(short, long, default_value_os_t = default_config())]
    pub config: PathBuf,

    /// Quote and sign but never approve or submit.
    #[arg(long)]
    pub dry_run: bool,

    /// Override `schedule.interval_secs`.
    #[arg(long)]
    pub interval_secs: Option<u64>,
}

/// Arguments for `send`.
///
/// Amounts are in local decimals, as decimal or `0x` hex. Unset options fall
/// back to the configuration file.
#[derive(Parser, Debug)]
pub struct SendArgs {
    /// Path to the configuration file.
    #[arg(short, long, default_value_os_t = default_config())]
    pub config: PathBuf,

    /// Amount to bridge.
    #[arg(long)]
    pub amount: String,

    /// Destination counter-token.
    #[arg(long)]
    pub token_out: Address,

    /// Strategy salt: 32-byte hex or a short label. Generated when omitted.
    #[arg(long)]
    pub salt: Option<String>,

    /// Receiver of the swapped token on the destination chain.
    #[arg(long)]
    pub recipient: Option<Address>,

    /// Destination executor.
    #[arg(long)]
    pub maker: Option<Address>,

    /// Destination address of the bridged token.
    #[arg(long)]
    pub token_in: Option<Address>,

    #[arg(long)]
    pub maker_traits: Option<String>,

    /// Strategy program bytes.
    #[arg(long, default_value = "0x1100")]
    pub program: String,

    #[arg(long)]
    pub taker_data: Option<String>,

    #[arg(long)]
    pub metadata: Option<String>,

    /// Balance of the counter-token in the strategy.
    #[arg(long, default_value = "0")]
    pub strategy_buffer: String,

    /// Gas allocated to `lzCompose` on the destination.
    #[arg(long)]
    pub compose_gas_limit: Option<u64>,

    /// Margin on top of the quoted native fee, in basis points.
    #[arg(long)]
    pub fee_buffer_bps: Option<u32>,

    /// Exact native fee in wei; skips quoting.
    #[arg(long)]
    pub native_fee_wei: Option<String>,

    /// Quote and sign but never approve or submit.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for `hash`.
#[derive(Parser, Debug)]
pub struct HashArgs {
    /// Destination executor.
    #[arg(long)]
    pub maker: Address,

    #[arg(long, default_value = "0")]
    pub maker_traits: String,

    #[arg(long, default_value = "0x1100")]
    pub program: String,
}

/// Arguments for `options`.
#[derive(Parser, Debug)]
pub struct OptionsArgs {
    /// Gas allocated to `lzCompose`.
    #[arg(long, default_value_t = 2_000_000)]
    pub gas: u64,
}
