//! Configuration loading and validation.

pub mod logging;
pub mod settings;
pub mod wallet;

pub use settings::Config;
