//! Terminal Output
//!
//! Formatting of trade results, config listings and doctor reports for the
//! console. Nothing here touches the network.

use serde_json::Value;

use crate::application::doctor::{CheckReport, CheckStatus};
use crate::config::ConfigMap;
use crate::domain::{TradeResult, TradeSide};

const EXPLORER_BASE: &str = "https://solscan.io/tx";

pub fn explorer_link(txid: &str) -> String {
    format!("{}/{}", EXPLORER_BASE, txid)
}

/// Print the summary of a completed trade
pub fn trade_result(side: TradeSide, mint: &str, result: &TradeResult, show_quote: bool) {
    let unit = match side {
        TradeSide::Buy => "tokens",
        TradeSide::Sell => "SOL",
    };
    println!("{} {} complete", side.as_str(), mint);
    println!("  received:     {} {}", result.received, unit);
    println!(
        "  fees:         {:.6} SOL ({:.2}%)",
        result.total_fees, result.fee_pct
    );
    println!("  price impact: {:.2}%", result.price_impact);
    println!("  verification: {}", result.verification);
    println!("  txid:         {}", result.txid);
    println!("  explorer:     {}", explorer_link(&result.txid));
    if show_quote {
        println!(
            "  quote:        {}",
            serde_json::to_string_pretty(&result.quote).unwrap_or_else(|_| "{}".to_string())
        );
    }
}

/// Print a failed trade, surfacing the explorer link when the error text
/// carries a transaction signature.
pub fn trade_failure(side: TradeSide, mint: &str, error: &str) {
    eprintln!("{} {} failed: {}", side.as_str(), mint, error);
    if let Some(txid) = extract_txid(error) {
        eprintln!("  explorer: {}", explorer_link(&txid));
    }
}

/// Pull a base58 transaction signature out of free-form error text.
///
/// Signatures are 64 bytes, which encode to 86-88 base58 chars; anything
/// shorter is a wallet or mint address and is skipped.
pub fn extract_txid(text: &str) -> Option<String> {
    let mut run = String::new();
    let mut best: Option<String> = None;
    for c in text.chars().chain(std::iter::once(' ')) {
        if c.is_ascii_alphanumeric() && !matches!(c, '0' | 'O' | 'I' | 'l') {
            run.push(c);
        } else {
            if (86..=88).contains(&run.len()) && best.is_none() {
                best = Some(run.clone());
            }
            run.clear();
        }
    }
    best
}

/// Print the whole config as pretty JSON
pub fn config_view(config: &ConfigMap) {
    println!(
        "{}",
        serde_json::to_string_pretty(&Value::Object(config.clone()))
            .unwrap_or_else(|_| "{}".to_string())
    );
}

/// Print settings one per line, nested keys dotted
pub fn config_list(config: &ConfigMap) {
    for (key, value) in config {
        match value {
            Value::Object(nested) => {
                for (inner, v) in nested {
                    println!("{}.{} = {}", key, inner, v);
                }
            }
            other => println!("{} = {}", key, other),
        }
    }
}

/// Print doctor reports; returns whether every check passed or warned
pub fn doctor_report(reports: &[CheckReport], verbose: bool) -> bool {
    let mut healthy = true;
    for report in reports {
        println!("[{:>4}] {}: {}", report.status.symbol(), report.name, report.detail);
        if report.status == CheckStatus::Fail {
            healthy = false;
        }
        if verbose || report.status != CheckStatus::Pass {
            if let Some(ref hint) = report.hint {
                println!("       {}", hint);
            }
        }
    }
    healthy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_txid_finds_signature_in_error_text() {
        let sig = "5VERv8NMvzbJMEkV8xnrLkEaWRtSz9CosKDYjCJjBRnbJLgp8uirBgmQpjKhoR4tjF3ZpRzrFmBV6UjKdiSZkQUW";
        let text = format!("Swap failed: Transaction failed on-chain: blah (txid {})", sig);
        assert_eq!(extract_txid(&text), Some(sig.to_string()));
    }

    #[test]
    fn test_extract_txid_skips_addresses() {
        // 44-char mint must not be mistaken for a signature
        let text = "no route for 6p6xgHyF7AeE6TZkSmFsko444wqoP15icUSqi2jfGiPN";
        assert_eq!(extract_txid(text), None);
    }

    #[test]
    fn test_extract_txid_none_in_plain_text() {
        assert_eq!(extract_txid("connection refused"), None);
    }

    #[test]
    fn test_explorer_link() {
        assert_eq!(explorer_link("abc"), "https://solscan.io/tx/abc");
    }
}
