//! Transaction Status Classification
//!
//! The remote service reports transaction status in several equivalent shapes
//! depending on which backend answered (`meta.err`, a top-level `err`/`error`,
//! a nested `value.err`, various status field casings). Everything is mapped
//! onto a closed three-state enum at this boundary so the verifier never
//! touches raw payload shape.

use serde_json::Value;

/// Classification of one polled transaction status payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationState {
    /// No interpretable signal yet, keep polling
    Unknown,
    /// Terminal success
    Confirmed,
    /// Terminal on-chain failure with the formatted error payload
    Failed(String),
}

const SUCCESS_VOCAB: &[&str] = &["processed", "confirmed", "finalized", "success", "ok"];
const FAILURE_VOCAB: &[&str] = &["failed", "error", "err"];

/// Classify a raw transaction-details payload.
///
/// Ordering matters: an explicit non-null error field is terminal and wins
/// over any status field; clean metadata with no status field at all still
/// counts as confirmation.
pub fn classify_details(details: Option<&Value>) -> VerificationState {
    let payload = match details {
        Some(v) if !v.is_null() => v,
        _ => return VerificationState::Unknown,
    };

    let error_shapes = [
        payload.pointer("/meta/err"),
        payload.get("err"),
        payload.get("error"),
        payload.pointer("/value/err"),
    ];
    for err in error_shapes.into_iter().flatten() {
        if !err.is_null() {
            return VerificationState::Failed(format_error(err));
        }
    }

    let status_shapes = [
        payload.get("confirmationStatus"),
        payload.get("confirmation_status"),
        payload.get("status"),
        payload.pointer("/meta/status"),
        payload.pointer("/value/confirmationStatus"),
    ];
    for status in status_shapes.into_iter().flatten() {
        match classify_status_field(status) {
            VerificationState::Unknown => {}
            terminal => return terminal,
        }
    }

    // No status field at all, but clean metadata is itself a success signal.
    if payload.get("meta").map(Value::is_object).unwrap_or(false) {
        return VerificationState::Confirmed;
    }

    VerificationState::Unknown
}

fn classify_status_field(status: &Value) -> VerificationState {
    match status {
        Value::String(s) => {
            let lowered = s.to_ascii_lowercase();
            if SUCCESS_VOCAB.contains(&lowered.as_str()) {
                VerificationState::Confirmed
            } else if FAILURE_VOCAB.contains(&lowered.as_str()) {
                VerificationState::Failed(format!("status reported {}", s))
            } else {
                VerificationState::Unknown
            }
        }
        // RPC-native result shape: {"Ok": null} or {"Err": {...}}
        Value::Object(map) => {
            if map.contains_key("Ok") {
                VerificationState::Confirmed
            } else if let Some(err) = map.get("Err") {
                VerificationState::Failed(format_error(err))
            } else {
                VerificationState::Unknown
            }
        }
        _ => VerificationState::Unknown,
    }
}

fn format_error(err: &Value) -> String {
    match err {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
