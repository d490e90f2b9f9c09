//! Handlers for commands that need neither configuration nor network.

use super::command::{HashArgs, OptionsArgs};
use super::output;
use crate::domain::identity::strategy_hash;
use crate::domain::options::compose_options;
use crate::error::Result;
use crate::infrastructure::config::settings::{parse_bytes, parse_u256};

/// Print the strategy hash for `(maker, maker_traits, program)`.
pub fn execute_hash(args: &HashArgs) -> Result<()> {
    let traits = parse_u256("maker_traits", &args.maker_traits)?;
    let program = parse_bytes("program", &args.program)?;
    output::value("strategy_hash", strategy_hash(args.maker, traits, &program));
    Ok(())
}

/// Print executor options carrying an `lzCompose` gas allocation.
pub fn execute_options(args: &OptionsArgs) -> Result<()> {
    output::value("options", compose_options(u128::from(args.gas)));
    Ok(())
}
