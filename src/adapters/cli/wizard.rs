//! Interactive Prompts
//!
//! The config wizard plus the hidden-input secret prompt used by
//! `keychain store`. Everything the wizard writes goes through strict
//! normalization before it touches disk.

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password, Select};
use serde_json::{json, Value};

use crate::config::{
    default_config, normalize, ConfigError, ConfigMap, PRIORITY_FEE_LEVELS, TX_VERSIONS,
};

fn prompt_error(e: dialoguer::Error) -> ConfigError {
    // dialoguer::Error wraps an IO error
    ConfigError::Io(std::io::Error::other(e.to_string()))
}

/// Walk the user through the common settings and return a strict-validated
/// config map ready to save.
pub fn run_wizard(current: &ConfigMap) -> Result<ConfigMap, ConfigError> {
    let theme = ColorfulTheme::default();
    let defaults = default_config();
    let get_str = |key: &str| -> String {
        current
            .get(key)
            .or_else(|| defaults.get(key))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    println!("soltrade setup. Enter accepts the shown default.\n");

    let rpc_url: String = Input::with_theme(&theme)
        .with_prompt("RPC URL")
        .default(get_str("rpcUrl"))
        .interact_text()
        .map_err(prompt_error)?;

    let slippage: f64 = Input::with_theme(&theme)
        .with_prompt("Slippage (%)")
        .default(
            current
                .get("slippage")
                .and_then(Value::as_f64)
                .unwrap_or(10.0),
        )
        .interact_text()
        .map_err(prompt_error)?;

    let fee_modes = &["auto (service picks, tuned by level)", "fixed SOL amount"];
    let fee_mode = Select::with_theme(&theme)
        .with_prompt("Priority fee")
        .items(fee_modes)
        .default(0)
        .interact()
        .map_err(prompt_error)?;

    let (priority_fee, priority_fee_level) = if fee_mode == 0 {
        let level = Select::with_theme(&theme)
            .with_prompt("Priority fee level")
            .items(PRIORITY_FEE_LEVELS)
            .default(
                PRIORITY_FEE_LEVELS
                    .iter()
                    .position(|l| *l == get_str("priorityFeeLevel"))
                    .unwrap_or(1),
            )
            .interact()
            .map_err(prompt_error)?;
        (json!("auto"), PRIORITY_FEE_LEVELS[level].to_string())
    } else {
        let amount: f64 = Input::with_theme(&theme)
            .with_prompt("Priority fee (SOL)")
            .default(0.0001)
            .interact_text()
            .map_err(prompt_error)?;
        (json!(amount), get_str("priorityFeeLevel"))
    };

    let tx_version = Select::with_theme(&theme)
        .with_prompt("Transaction version")
        .items(TX_VERSIONS)
        .default(0)
        .interact()
        .map_err(prompt_error)?;

    let notifications = Confirm::with_theme(&theme)
        .with_prompt("Desktop notifications?")
        .default(
            current
                .get("notificationsEnabled")
                .and_then(Value::as_bool)
                .unwrap_or(true),
        )
        .interact()
        .map_err(prompt_error)?;

    let jito_enabled = Confirm::with_theme(&theme)
        .with_prompt("Submit through Jito?")
        .default(false)
        .interact()
        .map_err(prompt_error)?;
    let jito_tip: f64 = if jito_enabled {
        Input::with_theme(&theme)
            .with_prompt("Jito tip (SOL)")
            .default(0.0001)
            .interact_text()
            .map_err(prompt_error)?
    } else {
        current
            .get("jito")
            .and_then(|j| j.get("tip"))
            .and_then(Value::as_f64)
            .unwrap_or(0.0001)
    };

    let mut draft = current.clone();
    draft.insert("rpcUrl".into(), json!(rpc_url));
    draft.insert("slippage".into(), json!(slippage));
    draft.insert("priorityFee".into(), priority_fee);
    draft.insert("priorityFeeLevel".into(), json!(priority_fee_level));
    draft.insert("txVersion".into(), json!(TX_VERSIONS[tx_version]));
    draft.insert("notificationsEnabled".into(), json!(notifications));
    draft.insert(
        "jito".into(),
        json!({"enabled": jito_enabled, "tip": jito_tip}),
    );

    Ok(normalize(&draft, true)?.config)
}

/// Prompt for the wallet private key without echoing it
pub fn prompt_secret() -> Result<String, ConfigError> {
    Password::with_theme(&ColorfulTheme::default())
        .with_prompt("Wallet private key (base58 or JSON array)")
        .interact()
        .map_err(prompt_error)
}
