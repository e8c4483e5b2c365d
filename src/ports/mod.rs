//! Ports Layer - Trait definitions for external dependencies
//!
//! Following hexagonal architecture, these traits abstract:
//! - The hosted swap routing service (build, submit, status)
//! - Secure secret storage (wallet private key)
//! - Best-effort user notifications

pub mod mocks;
pub mod notify;
pub mod secrets;
pub mod swap;

pub use notify::{Notification, NotificationSink, NotifyError};
pub use secrets::{KeychainError, SecretStore};
pub use swap::{
    DetailsError, FeeMode, OperatorFee, SwapBuild, SwapError, SwapQuote, SwapRequest, SwapService,
};
