//! Handler for `last`.

use super::command::ConfigPathArg;
use super::output;
use crate::error::Result;
use crate::port::DispatchStore;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::Config;

pub async fn execute(args: &ConfigPathArg) -> Result<()> {
    let config = Config::load(&args.config)?;
    let store = bootstrap::build_store(&config);

    let Some(record) = store.load().await? else {
        output::warning(&format!(
            "No dispatch recorded at {}",
            config.store.path.display()
        ));
        return Ok(());
    };

    output::section(&format!("Last dispatch ({})", record.incident));
    output::field("At", record.dispatched_at.to_rfc3339());
    match record.tx_hash {
        Some(tx_hash) => output::field("Tx hash", output::highlight(tx_hash)),
        None => output::field("Tx hash", output::muted("dry run")),
    }
    output::field("Strategy", record.strategy_hash);
    output::field("Maker", record.maker);
    output::field("Token in", record.token_in);
    output::field("Token out", record.token_out);
    output::field("Amount", record.amount_ld);
    output::field("Value", record.buffered_fee);
    output::field("Salt", output::muted(record.salt));
    Ok(())
}
