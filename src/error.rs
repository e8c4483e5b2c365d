//! Application Error Umbrella
//!
//! One enum over the per-boundary error kinds so the application layer can
//! propagate with `?` regardless of which collaborator failed. Propagation
//! policy lives with the callers: config errors abort strict contexts only,
//! keychain errors abort a trade before any network call, swap errors abort
//! the current trade, notification failures never surface at all.

use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::TradeInputError;
use crate::ports::secrets::KeychainError;
use crate::ports::swap::SwapError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Keychain(#[from] KeychainError),
    #[error(transparent)]
    Swap(#[from] SwapError),
    #[error(transparent)]
    Input(#[from] TradeInputError),
}
