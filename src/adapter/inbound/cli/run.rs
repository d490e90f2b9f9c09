//! Handlers for `run` and `once`.

use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, info_span, warn, Instrument};

use super::command::RunArgs;
use super::output;
use crate::application::{CrisisCycle, CycleOutcome, DispatchResult};
use crate::error::{ConfigError, Result};
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::Config;

fn load(args: &RunArgs) -> Result<Config> {
    let mut config = Config::load(&args.config)?;
    config.dry_run |= args.dry_run;
    if let Some(secs) = args.interval_secs {
        config.schedule.interval_secs = secs;
    }
    config.validate()?;
    if config.dispatch.salt.is_some() {
        return Err(ConfigError::InvalidValue {
            field: "dispatch.salt",
            reason: "a fixed salt is only accepted by `send`".into(),
        }
        .into());
    }
    Ok(config)
}

/// Run one cycle and print what it did.
pub async fn execute_once(args: &RunArgs) -> Result<()> {
    let config = load(args)?;
    config.init_logging();

    let runtime = bootstrap::build_runtime(&config).await?;
    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Wallet", runtime.wallet);
    output::field("Dry run", config.dry_run);

    let outcome = runtime.cycle.run_once().await?;
    print_outcome(&outcome);
    Ok(())
}

/// Run cycles on the configured interval until Ctrl-C.
///
/// A tick that fires while the previous cycle is still running is skipped.
pub async fn execute_run(args: &RunArgs) -> Result<()> {
    let config = load(args)?;
    config.init_logging();

    let runtime = bootstrap::build_runtime(&config).await?;
    let interval = Duration::from_secs(config.schedule.interval_secs);
    info!(
        wallet = %runtime.wallet,
        interval_secs = interval.as_secs(),
        dry_run = config.dry_run,
        "ghostline starting"
    );

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut in_flight: Option<JoinHandle<()>> = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if in_flight.as_ref().is_some_and(|h| !h.is_finished()) {
                    warn!("Previous cycle still running, skipping tick");
                    continue;
                }
                in_flight = Some(spawn_cycle(Arc::clone(&runtime.cycle)));
            }
            _ = signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    if let Some(handle) = in_flight {
        if !handle.is_finished() {
            info!("Waiting for the running cycle to finish");
        }
        if let Err(e) = handle.await {
            error!(error = %e, "Cycle task failed");
        }
    }

    info!("ghostline stopped");
    Ok(())
}

fn spawn_cycle(cycle: Arc<CrisisCycle>) -> JoinHandle<()> {
    let span = info_span!("cycle", run_id = %uuid::Uuid::new_v4());
    tokio::spawn(
        async move {
            match cycle.run_once().await {
                Ok(CycleOutcome::Idle { .. }) => {}
                Ok(CycleOutcome::Skipped { incident, reason }) => {
                    info!(%incident, %reason, "Cycle skipped");
                }
                Ok(CycleOutcome::Dispatched {
                    incident,
                    action,
                    result,
                }) => {
                    info!(
                        %incident,
                        %action,
                        tx_hash = ?result.tx_hash,
                        strategy_hash = %result.strategy_hash,
                        "Cycle dispatched"
                    );
                }
                Err(e) => {
                    error!(error = %e, recoverable = e.is_recoverable(), "Cycle failed");
                }
            }
        }
        .instrument(span),
    )
}

pub(super) fn print_outcome(outcome: &CycleOutcome) {
    match outcome {
        CycleOutcome::Idle { timestamp } => {
            output::success("Market stable, nothing to do");
            output::field("Feed time", output::muted(timestamp));
        }
        CycleOutcome::Skipped { incident, reason } => {
            output::warning(&format!("No dispatchable strategy for {incident}"));
            output::field("Reason", reason);
        }
        CycleOutcome::Dispatched {
            incident,
            action,
            result,
        } => {
            output::section(&format!("{action} ({incident})"));
            print_dispatch(result);
        }
    }
}

pub(super) fn print_dispatch(result: &DispatchResult) {
    match result.tx_hash {
        Some(tx_hash) => {
            output::success("Dispatch confirmed");
            output::field("Tx hash", output::highlight(tx_hash));
            if let Some(block) = result.block_number {
                output::field("Block", block);
            }
        }
        None => output::success("Dry run: signed but not submitted"),
    }
    output::field("Strategy", result.strategy_hash);
    output::field("Sent", result.bridge.amount_sent_ld);
    output::field("Received", result.payload.amount_ld);
    output::field("Min out", result.payload.min_amount_out_ld);
    output::field("Native fee", result.fee.native_fee());
    output::field("Value", result.fee.buffered_fee());
    output::field("Digest", output::muted(result.report.digest));
}
