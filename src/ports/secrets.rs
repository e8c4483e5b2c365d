//! Secret Provider Port
//!
//! Narrow contract over secure secret storage. The trade path only ever asks
//! for the wallet secret through this trait, never a specific vault.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeychainError {
    #[error("No private key stored. Run `soltrade keychain store` to save one.")]
    Missing,
    #[error("Failed to access secret storage: {0}")]
    Access(String),
}

/// Get/has/store/delete over one opaque wallet secret
pub trait SecretStore: Send + Sync {
    /// Retrieve the stored secret, trimmed. Errors with `Missing` if absent.
    fn get(&self) -> Result<String, KeychainError>;

    /// Whether a non-empty secret exists
    fn has(&self) -> Result<bool, KeychainError>;

    /// Store (replace) the secret
    fn store(&self, secret: &str) -> Result<(), KeychainError>;

    /// Delete the secret; returns whether an entry existed
    fn delete(&self) -> Result<bool, KeychainError>;
}
