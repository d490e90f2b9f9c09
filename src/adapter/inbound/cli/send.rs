//! Handler for `send`: one dispatch with operator-supplied parameters.

use chrono::Utc;
use tracing::error;

use super::command::SendArgs;
use super::output;
use super::run::print_dispatch;
use crate::domain::{Candidate, DispatchRecord};
use crate::error::{ConfigError, Result};
use crate::port::DispatchStore;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::Config;

/// Fold the command-line options into `config`.
fn apply(args: &SendArgs, config: &mut Config) {
    let dispatch = &mut config.dispatch;
    dispatch.amount = Some(args.amount.clone());
    dispatch.strategy_buffer = args.strategy_buffer.clone();
    dispatch.program = Some(args.program.clone());
    if let Some(ref salt) = args.salt {
        dispatch.salt = Some(salt.clone());
    }
    if let Some(ref traits) = args.maker_traits {
        dispatch.maker_traits = traits.clone();
    }
    if let Some(ref data) = args.taker_data {
        dispatch.taker_data = Some(data.clone());
    }
    if let Some(ref metadata) = args.metadata {
        dispatch.metadata = Some(metadata.clone());
    }
    if let Some(gas) = args.compose_gas_limit {
        dispatch.compose_gas_limit = gas;
    }
    if let Some(bps) = args.fee_buffer_bps {
        dispatch.fee_buffer_bps = bps;
    }
    if let Some(ref fee) = args.native_fee_wei {
        dispatch.native_fee_wei = Some(fee.clone());
    }

    let destination = &mut config.destination;
    destination.token_out = Some(args.token_out);
    if let Some(maker) = args.maker {
        destination.maker = maker;
    }
    if let Some(token_in) = args.token_in {
        destination.token_in = token_in;
    }
    if let Some(recipient) = args.recipient {
        destination.recipient = recipient;
    }

    config.dry_run |= args.dry_run;
}

pub async fn execute(args: &SendArgs) -> Result<()> {
    let mut config = Config::load(&args.config)?;
    apply(args, &mut config);
    config.validate()?;
    config.init_logging();

    let bridge = config.bridge_params()?.ok_or(ConfigError::MissingField {
        field: "amount",
    })?;
    let program = config.program()?.ok_or(ConfigError::MissingField {
        field: "program",
    })?;
    let candidate = Candidate::manual(program, bridge);

    let conn = bootstrap::connect(&config).await?;
    let dispatcher = bootstrap::build_dispatcher(&config, &conn)?;
    let context = bootstrap::chain_context(&config)?;

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Wallet", conn.address());
    output::field("Maker", context.destination.maker);
    output::field("Recipient", context.destination.recipient);

    let result = dispatcher.dispatch(&candidate, &context).await?;

    let record = DispatchRecord::from_payload(
        &result.payload,
        result.tx_hash,
        result.fee.buffered_fee(),
        "manual".to_string(),
        Utc::now(),
    );
    if let Err(e) = bootstrap::build_store(&config).save(&record).await {
        error!(error = %e, "Failed to persist dispatch record");
        output::warning("Dispatch succeeded but the record was not saved");
    }

    print_dispatch(&result);
    Ok(())
}
