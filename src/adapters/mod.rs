//! Adapters: concrete implementations of the outbound ports plus the CLI

pub mod cli;
pub mod keychain;
pub mod notify;
pub mod tracker;
