//! Domain Layer - Core trade types and status classification
//!
//! Pure types and logic with no external dependencies. All I/O happens
//! through the ports layer.

pub mod status;
pub mod trade;

pub use status::{classify_details, VerificationState};
pub use trade::{
    validate_mint, TradeAmount, TradeInputError, TradeResult, TradeSide, VerificationStatus,
    WRAPPED_SOL_MINT,
};
