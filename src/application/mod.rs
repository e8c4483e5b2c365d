//! Application Layer - Orchestration of trades over the ports
//!
//! Owns the shared swap client, the buy/sell pipeline, post-submit
//! verification, and environment diagnostics. Depends on domain, config and
//! ports only; concrete adapters are injected.

pub mod context;
pub mod doctor;
pub mod trades;
pub mod verify;

pub use context::{SwapContext, SwapFactory};
pub use trades::{TradeExecutor, OPERATOR_FEE_PERCENT, OPERATOR_FEE_WALLET};
pub use verify::Verifier;
