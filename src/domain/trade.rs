//! Trade Input and Result Types
//!
//! Parsing and validation of user-supplied trade parameters (mint address,
//! amount spec) plus the result record returned after a completed swap.

use serde_json::Value;
use thiserror::Error;

/// Wrapped SOL mint address on Solana
pub const WRAPPED_SOL_MINT: &str = "So11111111111111111111111111111111111111112";

/// Errors produced while validating trade input, before any network call
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TradeInputError {
    #[error("Missing mint address. Provide a base58 token mint (32-44 chars).")]
    MissingMint,
    #[error("Invalid mint format. Expected base58 address (32-44 chars).")]
    InvalidMint,
    #[error("Missing amount.")]
    MissingAmount,
    #[error("Invalid amount. Use a positive number, 'auto' during a sell, or '<percent>%'.")]
    InvalidAmount,
    #[error("Buying with 'auto' isn't supported. Use a number or '<percent>%'.")]
    BuyAutoUnsupported,
}

/// Which direction a trade moves value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    /// Spend SOL, receive the target token
    Buy,
    /// Spend the target token, receive SOL
    Sell,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Buy => "buy",
            TradeSide::Sell => "sell",
        }
    }
}

/// Amount specification accepted on the command line.
///
/// A plain decimal spends that exact amount, a percentage spends that share of
/// the wallet balance, and `auto` (sell only) liquidates the entire balance.
#[derive(Debug, Clone, PartialEq)]
pub enum TradeAmount {
    Exact(f64),
    Percent(f64),
    Auto,
}

impl TradeAmount {
    /// Parse a raw amount argument. Whitespace is stripped and matching is
    /// case-insensitive, so `" 25 %"` and `"AUTO"` are accepted.
    pub fn parse(raw: &str) -> Result<Self, TradeInputError> {
        let normalized: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        if normalized.is_empty() {
            return Err(TradeInputError::MissingAmount);
        }
        if normalized == "auto" {
            return Ok(TradeAmount::Auto);
        }
        if let Some(pct) = normalized.strip_suffix('%') {
            let value: f64 = pct.parse().map_err(|_| TradeInputError::InvalidAmount)?;
            if !value.is_finite() || value <= 0.0 || value > 100.0 {
                return Err(TradeInputError::InvalidAmount);
            }
            return Ok(TradeAmount::Percent(value));
        }
        let value: f64 = normalized
            .parse()
            .map_err(|_| TradeInputError::InvalidAmount)?;
        if !value.is_finite() || value <= 0.0 {
            return Err(TradeInputError::InvalidAmount);
        }
        Ok(TradeAmount::Exact(value))
    }

    /// Wire form handed to the swap service (`0.5`, `25%`, `auto`).
    pub fn as_request_param(&self) -> String {
        match self {
            TradeAmount::Exact(v) => format!("{}", v),
            TradeAmount::Percent(v) => format!("{}%", v),
            TradeAmount::Auto => "auto".to_string(),
        }
    }
}

fn is_base58_char(c: char) -> bool {
    c.is_ascii_alphanumeric() && !matches!(c, '0' | 'O' | 'I' | 'l')
}

/// Validate and trim a mint address: base58 alphabet, 32-44 chars.
pub fn validate_mint(raw: &str) -> Result<String, TradeInputError> {
    let mint = raw.trim();
    if mint.is_empty() {
        return Err(TradeInputError::MissingMint);
    }
    if mint.len() < 32 || mint.len() > 44 || !mint.chars().all(is_base58_char) {
        return Err(TradeInputError::InvalidMint);
    }
    Ok(mint.to_string())
}

/// Final verification status reported with a trade result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationStatus {
    /// Submitted, but confirmation could not be proven within the schedule
    Pending,
    /// Confirmed on-chain
    Confirmed,
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerificationStatus::Pending => write!(f, "pending"),
            VerificationStatus::Confirmed => write!(f, "confirmed"),
        }
    }
}

/// Outcome of one buy or sell. Created once per trade, never mutated after.
#[derive(Debug, Clone)]
pub struct TradeResult {
    /// Transaction signature returned by the submission call
    pub txid: String,
    /// Amount received (tokens on buy, SOL on sell), in decimal units
    pub received: f64,
    /// Base fee + platform fee, in SOL
    pub total_fees: f64,
    /// Total fees as a percentage of the input amount
    pub fee_pct: f64,
    /// Price impact percentage reported by the quote
    pub price_impact: f64,
    /// The raw quote payload, passed through for display
    pub quote: Value,
    pub verification: VerificationStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exact_amount() {
        assert_eq!(TradeAmount::parse("0.5").unwrap(), TradeAmount::Exact(0.5));
        assert_eq!(TradeAmount::parse(" 100 ").unwrap(), TradeAmount::Exact(100.0));
    }

    #[test]
    fn test_parse_percent_amount() {
        assert_eq!(TradeAmount::parse("25%").unwrap(), TradeAmount::Percent(25.0));
        assert_eq!(TradeAmount::parse("12.5 %").unwrap(), TradeAmount::Percent(12.5));
    }

    #[test]
    fn test_parse_auto_case_insensitive() {
        assert_eq!(TradeAmount::parse("auto").unwrap(), TradeAmount::Auto);
        assert_eq!(TradeAmount::parse("AUTO").unwrap(), TradeAmount::Auto);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(TradeAmount::parse(""), Err(TradeInputError::MissingAmount));
        assert_eq!(TradeAmount::parse("abc"), Err(TradeInputError::InvalidAmount));
        assert_eq!(TradeAmount::parse("-1"), Err(TradeInputError::InvalidAmount));
        assert_eq!(TradeAmount::parse("0"), Err(TradeInputError::InvalidAmount));
        assert_eq!(TradeAmount::parse("150%"), Err(TradeInputError::InvalidAmount));
        assert_eq!(TradeAmount::parse("-5%"), Err(TradeInputError::InvalidAmount));
    }

    #[test]
    fn test_request_param_round_trip() {
        assert_eq!(TradeAmount::Exact(0.25).as_request_param(), "0.25");
        assert_eq!(TradeAmount::Percent(50.0).as_request_param(), "50%");
        assert_eq!(TradeAmount::Auto.as_request_param(), "auto");
    }

    #[test]
    fn test_validate_mint_accepts_base58() {
        let mint = "6p6xgHyF7AeE6TZkSmFsko444wqoP15icUSqi2jfGiPN";
        assert_eq!(validate_mint(mint).unwrap(), mint);
        assert_eq!(validate_mint(&format!("  {}  ", mint)).unwrap(), mint);
    }

    #[test]
    fn test_validate_mint_rejects_bad_input() {
        assert_eq!(validate_mint(""), Err(TradeInputError::MissingMint));
        assert_eq!(validate_mint("short"), Err(TradeInputError::InvalidMint));
        // '0' and 'l' are outside the base58 alphabet
        assert_eq!(
            validate_mint("0000000000000000000000000000000000"),
            Err(TradeInputError::InvalidMint)
        );
        assert_eq!(
            validate_mint("llllllllllllllllllllllllllllllllll"),
            Err(TradeInputError::InvalidMint)
        );
    }

    #[test]
    fn test_verification_status_display() {
        assert_eq!(VerificationStatus::Pending.to_string(), "pending");
        assert_eq!(VerificationStatus::Confirmed.to_string(), "confirmed");
    }
}
