//! Tracker Wire Types
//!
//! Helpers for picking numbers out of the service's loosely-typed build
//! responses. The service emits equivalent payloads under different field
//! names (`quote` vs `rate`, `outAmount` vs `amountOut`) and numbers may
//! arrive as strings, so extraction accepts every known spelling.

use serde_json::Value;

use crate::ports::swap::SwapQuote;

/// Read a numeric field under any of the given names, accepting both JSON
/// numbers and numeric strings. Missing or malformed fields read as 0.
pub fn number_field(payload: &Value, names: &[&str]) -> f64 {
    for name in names {
        match payload.get(*name) {
            Some(Value::Number(n)) => {
                if let Some(v) = n.as_f64() {
                    return v;
                }
            }
            Some(Value::String(s)) => {
                if let Ok(v) = s.trim().parse::<f64>() {
                    return v;
                }
            }
            _ => {}
        }
    }
    0.0
}

/// Extract the quote from a raw build response. The quote lives under
/// `quote` or, on older deployments, `rate`.
pub fn quote_from_build(raw: &Value) -> SwapQuote {
    let quote = raw
        .get("quote")
        .or_else(|| raw.get("rate"))
        .cloned()
        .unwrap_or(Value::Null);

    SwapQuote {
        in_amount: number_field(&quote, &["amountIn", "inAmount"]),
        out_amount: number_field(&quote, &["outAmount", "amountOut"]),
        fee: number_field(&quote, &["fee"]),
        platform_fee: number_field(&quote, &["platformFeeUI", "platformFee"]),
        price_impact: number_field(&quote, &["priceImpact", "priceImpactPercentage"]),
        raw: quote,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_field_accepts_strings_and_numbers() {
        let payload = json!({"a": "1.5", "b": 2.5, "c": "junk"});
        assert_eq!(number_field(&payload, &["a"]), 1.5);
        assert_eq!(number_field(&payload, &["b"]), 2.5);
        assert_eq!(number_field(&payload, &["c"]), 0.0);
        assert_eq!(number_field(&payload, &["missing", "a"]), 1.5);
    }

    #[test]
    fn test_quote_from_quote_key() {
        let raw = json!({
            "quote": {
                "amountIn": "0.2",
                "outAmount": "12.5",
                "fee": 0.01,
                "platformFeeUI": "0.02",
                "priceImpact": "0.5",
            }
        });
        let quote = quote_from_build(&raw);
        assert_eq!(quote.in_amount, 0.2);
        assert_eq!(quote.out_amount, 12.5);
        assert_eq!(quote.fee, 0.01);
        assert_eq!(quote.platform_fee, 0.02);
        assert_eq!(quote.price_impact, 0.5);
    }

    #[test]
    fn test_quote_from_rate_fallback() {
        let raw = json!({"rate": {"amountOut": 3.0}});
        let quote = quote_from_build(&raw);
        assert_eq!(quote.out_amount, 3.0);
        assert_eq!(quote.fee, 0.0);
    }

    #[test]
    fn test_quote_missing_entirely() {
        let quote = quote_from_build(&json!({}));
        assert_eq!(quote.out_amount, 0.0);
        assert!(quote.raw.is_null());
    }
}
