//! Configuration Schema and Normalizer
//!
//! Every setting is bound to a declared value domain and validated through a
//! single dispatch table. Normalization is a pure function: it back-fills
//! missing keys from defaults, coerces string spellings of booleans and
//! numbers, strips deprecated keys, and passes unknown keys through untouched.
//!
//! Strict mode (interactive edits) raises on the first invalid value; lenient
//! mode (loading from disk) substitutes the default and records a warning.

use serde_json::{json, Map, Value};
use thiserror::Error;

/// Flat JSON object form of the configuration
pub type ConfigMap = Map<String, Value>;

/// Application name, used for the config directory and keychain service
pub const APP_NAME: &str = "soltrade";

/// Canonical casings for the priority fee level enum
pub const PRIORITY_FEE_LEVELS: &[&str] =
    &["min", "low", "medium", "high", "veryHigh", "unsafeMax"];

/// Supported transaction format versions
pub const TX_VERSIONS: &[&str] = &["v0", "legacy"];

/// Keys that older releases wrote and that are now removed unconditionally
const DEPRECATED_KEYS: &[&str] = &["walletSecretKey", "swapAPIKey"];

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for `{key}`: {value} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
    #[error("Config file is not a JSON object")]
    NotAnObject,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One lenient-mode substitution
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub key: String,
    pub message: String,
}

/// Result of normalizing a raw configuration
#[derive(Debug)]
pub struct NormalizeOutcome {
    pub config: ConfigMap,
    /// Whether anything differs from the input, so callers can re-persist
    pub changed: bool,
    pub warnings: Vec<ConfigWarning>,
}

/// Value domain for one canonical key
#[derive(Debug, Clone, Copy)]
enum ValueDomain {
    /// Non-empty string
    Url,
    /// Finite number >= 0
    NonNegativeNumber,
    /// Finite number >= 0 or the literal "auto" (case-insensitive)
    NumberOrAuto,
    /// Closed string set, matched case-insensitively, canonical casing restored
    Enum(&'static [&'static str]),
    Bool,
    /// Nested `{enabled: bool, tip: number >= 0}` object
    Bundler,
}

/// The closed schema: every canonical key bound to its domain
const SCHEMA: &[(&str, ValueDomain)] = &[
    ("rpcUrl", ValueDomain::Url),
    ("slippage", ValueDomain::NonNegativeNumber),
    ("priorityFee", ValueDomain::NumberOrAuto),
    ("priorityFeeLevel", ValueDomain::Enum(PRIORITY_FEE_LEVELS)),
    ("txVersion", ValueDomain::Enum(TX_VERSIONS)),
    ("showQuoteDetails", ValueDomain::Bool),
    ("notificationsEnabled", ValueDomain::Bool),
    ("DEBUG_MODE", ValueDomain::Bool),
    ("jito", ValueDomain::Bundler),
];

/// The canonical default configuration
pub fn default_config() -> ConfigMap {
    let defaults = json!({
        "rpcUrl": "https://rpc.solanatracker.io/public?advancedTx=true",
        "slippage": 10.0,
        "priorityFee": "auto",
        "priorityFeeLevel": "low",
        "txVersion": "v0",
        "showQuoteDetails": false,
        "notificationsEnabled": true,
        "DEBUG_MODE": false,
        "jito": { "enabled": false, "tip": 0.0001 },
    });
    match defaults {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

/// Normalize a raw configuration against the schema.
pub fn normalize(raw: &ConfigMap, strict: bool) -> Result<NormalizeOutcome, ConfigError> {
    let defaults = default_config();
    let mut config = ConfigMap::new();
    let mut warnings = Vec::new();
    let mut changed = false;

    for (key, domain) in SCHEMA {
        match raw.get(*key) {
            None => {
                config.insert(key.to_string(), defaults[*key].clone());
                changed = true;
            }
            Some(value) => match check_value(*domain, value) {
                Ok(canonical) => {
                    if &canonical != value {
                        changed = true;
                    }
                    config.insert(key.to_string(), canonical);
                }
                Err(reason) => {
                    if strict {
                        return Err(ConfigError::InvalidValue {
                            key: key.to_string(),
                            value: value.to_string(),
                            reason,
                        });
                    }
                    warnings.push(ConfigWarning {
                        key: key.to_string(),
                        message: reason,
                    });
                    config.insert(key.to_string(), defaults[*key].clone());
                    changed = true;
                }
            },
        }
    }

    for (key, value) in raw {
        if SCHEMA.iter().any(|(k, _)| k == key) {
            continue;
        }
        if DEPRECATED_KEYS.contains(&key.as_str()) {
            changed = true;
            continue;
        }
        config.insert(key.clone(), value.clone());
    }

    Ok(NormalizeOutcome {
        config,
        changed,
        warnings,
    })
}

/// Normalize a single key/value pair, as used by `config set`.
///
/// Unknown keys are accepted as-is; canonical keys go through their domain
/// rule. Strict mode raises on invalid values.
pub fn normalize_value(key: &str, value: &Value, strict: bool) -> Result<Value, ConfigError> {
    let Some((_, domain)) = SCHEMA.iter().find(|(k, _)| *k == key) else {
        return Ok(value.clone());
    };
    match check_value(*domain, value) {
        Ok(canonical) => Ok(canonical),
        Err(reason) => {
            if strict {
                Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                    reason,
                })
            } else {
                Ok(default_config()[key].clone())
            }
        }
    }
}

/// Coerce a CLI string argument into the JSON value it spells.
///
/// `"true"`/`"false"` become booleans, parseable numbers become numbers,
/// everything else stays a string.
pub fn parse_cli_value(raw: &str) -> Value {
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(num) = raw.parse::<f64>() {
        if num.is_finite() {
            if let Some(n) = serde_json::Number::from_f64(num) {
                return Value::Number(n);
            }
        }
    }
    Value::String(raw.to_string())
}

fn check_value(domain: ValueDomain, value: &Value) -> Result<Value, String> {
    match domain {
        ValueDomain::Url => match value.as_str() {
            Some(s) if !s.trim().is_empty() => Ok(Value::String(s.to_string())),
            Some(_) => Err("must be a non-empty URL string".to_string()),
            None => Err("must be a string".to_string()),
        },
        ValueDomain::NonNegativeNumber => {
            let num = coerce_number(value).ok_or("must be a number")?;
            if num < 0.0 {
                return Err("must be >= 0".to_string());
            }
            Ok(number_value(num))
        }
        ValueDomain::NumberOrAuto => {
            if let Some(s) = value.as_str() {
                if s.trim().eq_ignore_ascii_case("auto") {
                    return Ok(Value::String("auto".to_string()));
                }
            }
            let num = coerce_number(value).ok_or("must be a number >= 0 or \"auto\"")?;
            if num < 0.0 {
                return Err("must be >= 0".to_string());
            }
            Ok(number_value(num))
        }
        ValueDomain::Enum(options) => {
            let raw = value.as_str().ok_or_else(|| enum_reason(options))?;
            options
                .iter()
                .find(|opt| opt.eq_ignore_ascii_case(raw))
                .map(|opt| Value::String(opt.to_string()))
                .ok_or_else(|| enum_reason(options))
        }
        ValueDomain::Bool => coerce_bool(value)
            .map(Value::Bool)
            .ok_or_else(|| "must be true or false".to_string()),
        ValueDomain::Bundler => {
            let obj = value
                .as_object()
                .ok_or("must be an object with enabled/tip fields")?;
            let enabled = coerce_bool(obj.get("enabled").unwrap_or(&Value::Bool(false)))
                .ok_or("enabled must be true or false")?;
            let tip = coerce_number(obj.get("tip").unwrap_or(&json!(0.0)))
                .ok_or("tip must be a number")?;
            if tip < 0.0 {
                return Err("tip must be >= 0".to_string());
            }
            Ok(json!({ "enabled": enabled, "tip": tip }))
        }
    }
}

fn enum_reason(options: &[&str]) -> String {
    format!("must be one of: {}", options.join(", "))
}

fn number_value(num: f64) -> Value {
    serde_json::Number::from_f64(num)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Accept JSON booleans and their string spellings
fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Accept finite JSON numbers and their string spellings
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}
