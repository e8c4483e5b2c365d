//! Configuration Module
//!
//! Schema-driven normalization of the JSON config plus the on-disk store and
//! a typed view consumed by the trade path.

pub mod schema;
pub mod store;

pub use schema::{
    default_config, normalize, normalize_value, parse_cli_value, ConfigError, ConfigMap,
    ConfigWarning, NormalizeOutcome, APP_NAME, PRIORITY_FEE_LEVELS, TX_VERSIONS,
};
pub use store::{config_path, load, save};

use serde_json::Value;

/// Priority fee setting: a fixed SOL amount or service-chosen ("auto")
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriorityFee {
    Auto,
    Sol(f64),
}

/// Bundler (Jito) settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JitoSettings {
    pub enabled: bool,
    pub tip: f64,
}

/// Typed view over a normalized config map.
///
/// Built from maps that already went through `normalize`, so decoding falls
/// back to defaults instead of erroring on shape mismatches.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub rpc_url: String,
    pub slippage: f64,
    pub priority_fee: PriorityFee,
    pub priority_fee_level: String,
    pub tx_version: String,
    pub show_quote_details: bool,
    pub notifications_enabled: bool,
    pub debug_mode: bool,
    pub jito: JitoSettings,
}

impl Config {
    /// Load and normalize the config from disk (lenient).
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self::from_map(&store::load()?))
    }

    pub fn from_map(map: &ConfigMap) -> Self {
        let defaults = default_config();
        let get = |key: &str| map.get(key).unwrap_or(&defaults[key]).clone();

        let priority_fee = match get("priorityFee") {
            Value::Number(n) => PriorityFee::Sol(n.as_f64().unwrap_or(0.0)),
            _ => PriorityFee::Auto,
        };
        let jito_value = get("jito");
        let jito = JitoSettings {
            enabled: jito_value
                .get("enabled")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            tip: jito_value
                .get("tip")
                .and_then(Value::as_f64)
                .unwrap_or(0.0001),
        };

        Self {
            rpc_url: get("rpcUrl").as_str().unwrap_or_default().to_string(),
            slippage: get("slippage").as_f64().unwrap_or(10.0),
            priority_fee,
            priority_fee_level: get("priorityFeeLevel")
                .as_str()
                .unwrap_or("low")
                .to_string(),
            tx_version: get("txVersion").as_str().unwrap_or("v0").to_string(),
            show_quote_details: get("showQuoteDetails").as_bool().unwrap_or(false),
            notifications_enabled: get("notificationsEnabled").as_bool().unwrap_or(true),
            debug_mode: get("DEBUG_MODE").as_bool().unwrap_or(false),
            jito,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_map(&default_config())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_typed_view_of_defaults() {
        let config = Config::default();
        assert_eq!(config.slippage, 10.0);
        assert_eq!(config.priority_fee, PriorityFee::Auto);
        assert_eq!(config.priority_fee_level, "low");
        assert_eq!(config.tx_version, "v0");
        assert!(config.notifications_enabled);
        assert!(!config.jito.enabled);
    }

    #[test]
    fn test_typed_view_numeric_priority_fee() {
        let mut map = default_config();
        map.insert("priorityFee".into(), json!(0.0005));
        let config = Config::from_map(&map);
        assert_eq!(config.priority_fee, PriorityFee::Sol(0.0005));
    }

    #[test]
    fn test_typed_view_tolerates_missing_keys() {
        let config = Config::from_map(&ConfigMap::new());
        assert_eq!(config, Config::default());
    }
}
