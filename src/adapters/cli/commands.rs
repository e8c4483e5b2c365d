//! CLI Command Definitions
//!
//! Argument surface for the soltrade binary.

use clap::{Parser, Subcommand};

/// soltrade - command-line token swaps on Solana
#[derive(Parser, Debug)]
#[command(
    name = "soltrade",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Fast token swaps on Solana with post-submit verification",
    long_about = "soltrade buys and sells SPL tokens against SOL through a hosted swap \
                  routing service, signs locally with a key from the OS keychain, and \
                  verifies every submitted transaction on-chain."
)]
pub struct CliApp {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Buy a token with SOL
    Buy(TradeCmd),

    /// Sell a token back to SOL
    Sell(TradeCmd),

    /// View or change settings
    Config(ConfigCmd),

    /// Manage the wallet private key in the OS keychain
    Keychain(KeychainCmd),

    /// Check the local setup: config, keychain, RPC endpoint
    Doctor,
}

/// Shared arguments for buy and sell
#[derive(Parser, Debug)]
pub struct TradeCmd {
    /// Token mint address (base58)
    pub mint: String,

    /// Amount: a decimal (SOL on buy, tokens on sell), '<percent>%', or
    /// 'auto' (sell only)
    pub amount: String,
}

#[derive(Parser, Debug)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the full config as JSON
    View,

    /// List settings one per line
    List,

    /// Set one setting (validated before saving)
    Set {
        /// Setting name, e.g. slippage or jito.enabled
        key: String,
        /// New value
        value: String,
    },

    /// Open the config file in $EDITOR, then reload it
    Edit,

    /// Interactive setup of the common settings
    Wizard,
}

#[derive(Parser, Debug)]
pub struct KeychainCmd {
    #[command(subcommand)]
    pub action: KeychainAction,
}

#[derive(Subcommand, Debug)]
pub enum KeychainAction {
    /// Store the wallet private key (prompted, hidden input)
    Store,

    /// Verify the stored key decodes and print its public key
    Unlock,

    /// Remove the stored key
    Delete,
}
