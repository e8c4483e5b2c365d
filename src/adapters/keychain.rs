//! OS Keychain Secret Storage
//!
//! Stores the wallet secret in the platform credential vault (macOS Keychain,
//! Secret Service on Linux) under a fixed service/account pair.

use keyring::Entry;

use crate::ports::secrets::{KeychainError, SecretStore};

const SERVICE: &str = "soltrade";
const ACCOUNT: &str = "wallet-private-key";

/// Secret store backed by the OS credential vault
pub struct OsKeychain;

impl OsKeychain {
    pub fn new() -> Self {
        Self
    }

    fn entry(&self) -> Result<Entry, KeychainError> {
        Entry::new(SERVICE, ACCOUNT).map_err(|e| KeychainError::Access(e.to_string()))
    }
}

impl Default for OsKeychain {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretStore for OsKeychain {
    fn get(&self) -> Result<String, KeychainError> {
        match self.entry()?.get_password() {
            Ok(secret) => {
                let trimmed = secret.trim().to_string();
                if trimmed.is_empty() {
                    Err(KeychainError::Missing)
                } else {
                    Ok(trimmed)
                }
            }
            Err(keyring::Error::NoEntry) => Err(KeychainError::Missing),
            Err(e) => Err(KeychainError::Access(e.to_string())),
        }
    }

    fn has(&self) -> Result<bool, KeychainError> {
        match self.get() {
            Ok(_) => Ok(true),
            Err(KeychainError::Missing) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn store(&self, secret: &str) -> Result<(), KeychainError> {
        self.entry()?
            .set_password(secret.trim())
            .map_err(|e| KeychainError::Access(e.to_string()))
    }

    fn delete(&self) -> Result<bool, KeychainError> {
        match self.entry()?.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(e) => Err(KeychainError::Access(e.to_string())),
        }
    }
}
