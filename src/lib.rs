//! soltrade - Command-Line Token Swaps on Solana
//!
//! Buys and sells SPL tokens against SOL through a hosted swap routing
//! service, signing locally with a wallet key held in the OS keychain and
//! verifying every submitted transaction on-chain.
//!
//! # Modules
//!
//! - `domain`: Trade input parsing, results, status classification
//! - `ports`: Trait abstractions (SwapService, SecretStore, NotificationSink)
//! - `adapters`: External implementations (swap service, keychain, notify, CLI)
//! - `config`: Schema-driven settings with an atomic on-disk store
//! - `application`: Shared swap client, trade pipeline, verification, doctor

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
