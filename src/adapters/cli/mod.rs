//! CLI Adapter - argument parsing, prompts and terminal output

pub mod commands;
pub mod render;
pub mod wizard;

pub use commands::{CliApp, Command, ConfigAction, ConfigCmd, KeychainAction, KeychainCmd, TradeCmd};
