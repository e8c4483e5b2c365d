//! Adapter for the hosted swap routing service

pub mod client;
pub mod types;

pub use client::{ensure_advanced_tx, keypair_from_secret, TrackerClient};
