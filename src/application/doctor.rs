//! Environment Diagnostics
//!
//! `soltrade doctor` runs five non-destructive checks over the local setup:
//! config loads, wallet key present and decodes, RPC endpoint sane and
//! reachable, swap service answers a minimal quote, and a notification
//! actually delivers. Each check reports pass/warn/skip/fail with a
//! remediation hint where one exists; a failing check never stops the rest,
//! and checks that depend on earlier failures are skipped, not failed.

use std::time::Duration;

use serde_json::json;

use crate::adapters::tracker::keypair_from_secret;
use crate::application::context::SwapContext;
use crate::application::trades::{OPERATOR_FEE_PERCENT, OPERATOR_FEE_WALLET};
use crate::config::{load, Config};
use crate::domain::WRAPPED_SOL_MINT;
use crate::ports::notify::{Notification, NotificationSink};
use crate::ports::secrets::{KeychainError, SecretStore};
use crate::ports::swap::{FeeMode, OperatorFee, SwapRequest};

/// Liquid token the swap dry-run quotes against
const SWAP_CHECK_MINT: &str = "6p6xgHyF7AeE6TZkSmFsko444wqoP15icUSqi2jfGiPN";

/// Smallest amount the routing service will still quote
const MIN_SWAP_SOL: f64 = 0.0001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    /// Not run because a prerequisite was unavailable
    Skip,
    Fail,
}

impl CheckStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            CheckStatus::Pass => "ok",
            CheckStatus::Warn => "warn",
            CheckStatus::Skip => "skip",
            CheckStatus::Fail => "FAIL",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CheckReport {
    pub name: &'static str,
    pub status: CheckStatus,
    pub detail: String,
    pub hint: Option<String>,
}

impl CheckReport {
    fn pass(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            status: CheckStatus::Pass,
            detail: detail.into(),
            hint: None,
        }
    }

    fn warn(name: &'static str, detail: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            name,
            status: CheckStatus::Warn,
            detail: detail.into(),
            hint: Some(hint.into()),
        }
    }

    fn skip(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            status: CheckStatus::Skip,
            detail: detail.into(),
            hint: None,
        }
    }

    fn fail(name: &'static str, detail: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            name,
            status: CheckStatus::Fail,
            detail: detail.into(),
            hint: Some(hint.into()),
        }
    }
}

/// Run all five checks. Always returns a full report list; a failing check
/// never stops the rest.
pub async fn run_checks(
    secrets: &dyn SecretStore,
    context: &SwapContext,
    notifier: &dyn NotificationSink,
) -> Vec<CheckReport> {
    let mut reports = Vec::new();

    let (config, config_ok) = check_config(&mut reports);
    let keychain_ok = check_keychain(secrets, &mut reports);
    check_rpc(&config, &mut reports).await;
    check_swap(context, &config, config_ok, keychain_ok, &mut reports).await;
    check_notifications(notifier, config.notifications_enabled, &mut reports).await;

    reports
}

fn check_config(reports: &mut Vec<CheckReport>) -> (Config, bool) {
    match load() {
        Ok(map) => {
            let config = Config::from_map(&map);
            reports.push(CheckReport::pass(
                "config",
                format!("loaded, rpc {}", config.rpc_url),
            ));
            (config, true)
        }
        Err(e) => {
            reports.push(CheckReport::fail(
                "config",
                e.to_string(),
                "Run `soltrade config wizard` to rebuild the config file.",
            ));
            (Config::default(), false)
        }
    }
}

fn check_keychain(secrets: &dyn SecretStore, reports: &mut Vec<CheckReport>) -> bool {
    match secrets.get() {
        Ok(secret) => match keypair_from_secret(&secret) {
            Ok(keypair) => {
                use solana_sdk::signature::Signer;
                reports.push(CheckReport::pass(
                    "wallet",
                    format!("keypair decodes, pubkey {}", keypair.pubkey()),
                ));
                true
            }
            Err(e) => {
                reports.push(CheckReport::fail(
                    "wallet",
                    e.to_string(),
                    "Stored secret is not a valid key. Run `soltrade keychain store` again.",
                ));
                false
            }
        },
        Err(KeychainError::Missing) => {
            reports.push(CheckReport::warn(
                "wallet",
                "no private key stored",
                "Run `soltrade keychain store` to save one.",
            ));
            false
        }
        Err(e) => {
            reports.push(CheckReport::fail(
                "wallet",
                e.to_string(),
                "Secret storage is unavailable on this system.",
            ));
            false
        }
    }
}

async fn check_rpc(config: &Config, reports: &mut Vec<CheckReport>) {
    if !config.rpc_url.contains("advancedTx") {
        reports.push(CheckReport::warn(
            "rpc-url",
            config.rpc_url.clone(),
            "URL lacks advancedTx=true; it will be added automatically at trade time.",
        ));
    } else {
        reports.push(CheckReport::pass("rpc-url", config.rpc_url.clone()));
    }

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            reports.push(CheckReport::fail(
                "rpc-health",
                e.to_string(),
                "Could not create an HTTP client.",
            ));
            return;
        }
    };

    let body = json!({"jsonrpc": "2.0", "id": 1, "method": "getHealth"});
    match client.post(&config.rpc_url).json(&body).send().await {
        Ok(response) if response.status().is_success() => {
            reports.push(CheckReport::pass("rpc-health", "endpoint responded"));
        }
        Ok(response) => reports.push(CheckReport::warn(
            "rpc-health",
            format!("endpoint answered HTTP {}", response.status()),
            "The RPC endpoint is reachable but unhealthy; trades may fail.",
        )),
        Err(e) => reports.push(CheckReport::fail(
            "rpc-health",
            e.to_string(),
            "Check the rpcUrl setting and your network connection.",
        )),
    }
}

/// Dry-run a minimal quote through the swap service. Skipped when the config
/// or the wallet key is unavailable, since both are needed to build a client.
async fn check_swap(
    context: &SwapContext,
    config: &Config,
    config_ok: bool,
    keychain_ok: bool,
    reports: &mut Vec<CheckReport>,
) {
    if !config_ok {
        reports.push(CheckReport::skip("swap", "config unavailable"));
        return;
    }
    if !keychain_ok {
        reports.push(CheckReport::skip("swap", "no wallet key"));
        return;
    }

    let service = match context.get(config).await {
        Ok(service) => service,
        Err(e) => {
            reports.push(CheckReport::fail(
                "swap",
                e.to_string(),
                "Could not build the swap client; verify the stored key and rpcUrl.",
            ));
            return;
        }
    };

    let request = SwapRequest {
        from_mint: WRAPPED_SOL_MINT.to_string(),
        to_mint: SWAP_CHECK_MINT.to_string(),
        amount: MIN_SWAP_SOL.to_string(),
        slippage: config.slippage,
        payer: service.payer(),
        priority_fee: config.priority_fee,
        priority_fee_level: config.priority_fee_level.clone(),
        tx_version: config.tx_version.clone(),
        fee: OperatorFee {
            wallet: OPERATOR_FEE_WALLET.to_string(),
            percent: OPERATOR_FEE_PERCENT,
            mode: FeeMode::Add,
        },
    };

    match service.swap_instructions(&request).await {
        Ok(build) => {
            if build.raw.get("quote").or_else(|| build.raw.get("rate")).is_some() {
                reports.push(CheckReport::pass("swap", "service returned a quote"));
            } else {
                reports.push(CheckReport::fail(
                    "swap",
                    "response carried no quote",
                    "Rerun `soltrade doctor -v` and verify the swap service account.",
                ));
            }
        }
        Err(e) => reports.push(CheckReport::fail(
            "swap",
            e.to_string(),
            "Rerun `soltrade doctor -v` and verify the swap service account.",
        )),
    }
}

/// Deliver a test notification through the real sink. Skipped when
/// notifications are disabled in config.
async fn check_notifications(
    notifier: &dyn NotificationSink,
    enabled: bool,
    reports: &mut Vec<CheckReport>,
) {
    if !enabled {
        reports.push(CheckReport::skip("notifications", "disabled in config"));
        return;
    }

    let test = Notification::new("soltrade", "Notification test from soltrade doctor.")
        .with_subtitle("Doctor check")
        .with_sound("Ping");
    if notifier.notify(&test).await {
        reports.push(CheckReport::pass("notifications", "notification delivered"));
    } else {
        reports.push(CheckReport::fail(
            "notifications",
            "delivery failed, console fallback used",
            "Enable desktop notifications or set notificationsEnabled to false.",
        ));
    }
}
