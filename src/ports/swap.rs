//! Swap Service Port
//!
//! Trait abstraction over the hosted swap routing service. The service
//! exposes exactly three operations: build swap instructions for a mint pair,
//! submit a built swap, and fetch the status of a submitted transaction.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::config::PriorityFee;

/// Trade-path failures. Submission and verification both surface as the
/// single "swap failed" category, carrying the underlying cause in the text.
#[derive(Debug, Error)]
pub enum SwapError {
    #[error("Unable to initialize swap client: {0}")]
    Init(String),
    #[error("Failed to build swap: {0}")]
    Build(String),
    #[error("Swap failed: {0}")]
    Submit(String),
    #[error("Swap failed: Transaction failed on-chain: {0}")]
    OnChain(String),
    #[error("Swap service request failed: {0}")]
    Api(String),
}

/// Errors from the transaction-details fetch, pre-classified by transience so
/// the verifier can decide whether an attempt is retryable.
#[derive(Debug, Error)]
pub enum DetailsError {
    /// Timeouts, connection resets, HTTP 408/425/429/5xx, rate-limit phrasing
    #[error("transient fetch error: {0}")]
    Transient(String),
    /// Anything else aborts the verification schedule
    #[error("{0}")]
    Other(String),
}

/// Whether the operator fee is added on top of the input or deducted from the
/// output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeMode {
    Add,
    Deduct,
}

impl FeeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeeMode::Add => "add",
            FeeMode::Deduct => "deduct",
        }
    }
}

/// Fixed-percentage fee routed to the operator wallet, embedded in every
/// build request
#[derive(Debug, Clone)]
pub struct OperatorFee {
    pub wallet: String,
    pub percent: f64,
    pub mode: FeeMode,
}

impl OperatorFee {
    /// Wire form: `<wallet>:<percent>`
    pub fn as_request_param(&self) -> String {
        format!("{}:{}", self.wallet, self.percent)
    }
}

/// Everything the service needs to build one swap
#[derive(Debug, Clone)]
pub struct SwapRequest {
    pub from_mint: String,
    pub to_mint: String,
    /// Decimal amount, `<percent>%`, or `auto` - interpreted by the service
    pub amount: String,
    pub slippage: f64,
    pub payer: String,
    pub priority_fee: PriorityFee,
    /// Used when the priority fee is "auto"
    pub priority_fee_level: String,
    pub tx_version: String,
    pub fee: OperatorFee,
}

/// Quote extracted from a build response. Immutable once returned.
#[derive(Debug, Clone, Default)]
pub struct SwapQuote {
    pub in_amount: f64,
    pub out_amount: f64,
    pub fee: f64,
    pub platform_fee: f64,
    pub price_impact: f64,
    /// The untouched quote payload, for display
    pub raw: Value,
}

/// A built swap: the extracted quote plus the opaque route payload that is
/// passed through unmodified to the submission call
#[derive(Debug, Clone)]
pub struct SwapBuild {
    pub quote: SwapQuote,
    pub raw: Value,
}

/// The three operations the remote swap service must expose
#[async_trait]
pub trait SwapService: Send + Sync {
    /// Payer wallet address (base58)
    fn payer(&self) -> String;

    /// Request swap instructions for a mint pair
    async fn swap_instructions(&self, request: &SwapRequest) -> Result<SwapBuild, SwapError>;

    /// Execute a built swap, returning the transaction signature
    async fn submit(&self, build: &SwapBuild) -> Result<String, SwapError>;

    /// Fetch the status payload for a submitted transaction.
    /// `Ok(None)` means the transaction is not visible yet.
    async fn transaction_details(&self, txid: &str) -> Result<Option<Value>, DetailsError>;
}
