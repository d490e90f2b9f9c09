//! Command-line entry points.

pub mod command;
pub mod last;
pub mod offline;
pub mod output;
pub mod run;
pub mod send;

use command::{Cli, ColorChoice, Commands};
use output::OutputConfig;

use crate::error::Result;

/// Dispatch a parsed command line to its handler.
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }
    output::configure(OutputConfig::new(cli.json, cli.quiet));

    match cli.command {
        Commands::Run(args) => run::execute_run(&args).await,
        Commands::Once(args) => run::execute_once(&args).await,
        Commands::Send(args) => send::execute(&args).await,
        Commands::Hash(args) => offline::execute_hash(&args),
        Commands::Options(args) => offline::execute_options(&args),
        Commands::Last(args) => last::execute(&args).await,
    }
}
