//! soltrade - Command-Line Token Swaps on Solana
//!
//! Thin binary entrypoint: parse arguments, set up logging, dispatch to the
//! application layer.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use soltrade::adapters::cli::{
    render, wizard, CliApp, Command, ConfigAction, KeychainAction, TradeCmd,
};
use soltrade::adapters::keychain::OsKeychain;
use soltrade::adapters::notify::DesktopNotifier;
use soltrade::adapters::tracker::keypair_from_secret;
use soltrade::application::{doctor, SwapContext, TradeExecutor};
use soltrade::config::{self, normalize_value, parse_cli_value, Config};
use soltrade::domain::TradeSide;
use soltrade::ports::notify::NotificationSink;
use soltrade::ports::secrets::{SecretStore, KeychainError};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present; settings there override nothing, they only seed
    // the environment (e.g. SOLTRADE_CONFIG_PATH).
    dotenvy::dotenv().ok();

    let app = CliApp::parse();
    init_logging(app.verbose, app.debug)?;

    match app.command {
        Command::Buy(cmd) => trade_command(TradeSide::Buy, cmd).await,
        Command::Sell(cmd) => trade_command(TradeSide::Sell, cmd).await,
        Command::Config(cmd) => config_command(cmd.action),
        Command::Keychain(cmd) => keychain_command(cmd.action),
        Command::Doctor => doctor_command(app.verbose).await,
    }
}

fn init_logging(verbose: bool, debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::new("warn")
    };

    fmt().with_env_filter(filter).init();
    Ok(())
}

async fn trade_command(side: TradeSide, cmd: TradeCmd) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    let secrets: Arc<dyn SecretStore> = Arc::new(OsKeychain::new());
    let notifier: Arc<dyn NotificationSink> = Arc::new(DesktopNotifier::new());
    let context = Arc::new(SwapContext::for_secrets(secrets));
    let executor = TradeExecutor::new(context, notifier);

    let result = match side {
        TradeSide::Buy => executor.buy(&config, &cmd.mint, &cmd.amount).await,
        TradeSide::Sell => executor.sell(&config, &cmd.mint, &cmd.amount).await,
    };

    match result {
        Ok(trade) => {
            render::trade_result(side, &cmd.mint, &trade, config.show_quote_details);
            Ok(())
        }
        Err(e) => {
            render::trade_failure(side, &cmd.mint, &e.to_string());
            std::process::exit(1);
        }
    }
}

fn config_command(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::View => {
            let map = config::load().context("Failed to load configuration")?;
            render::config_view(&map);
        }
        ConfigAction::List => {
            let map = config::load().context("Failed to load configuration")?;
            render::config_list(&map);
        }
        ConfigAction::Set { key, value } => {
            let mut map = config::load().context("Failed to load configuration")?;
            set_config_key(&mut map, &key, &value)?;
            let saved = config::save(&map).context("Failed to save configuration")?;
            println!("{} = {}", key, lookup(&saved, &key));
        }
        ConfigAction::Edit => {
            let path = config::config_path();
            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
            let status = std::process::Command::new(&editor)
                .arg(&path)
                .status()
                .with_context(|| format!("Failed to launch editor `{}`", editor))?;
            if !status.success() {
                bail!("Editor exited with {}", status);
            }
            // Lenient reload repairs whatever the edit broke
            let map = config::load().context("Failed to reload configuration")?;
            render::config_view(&map);
        }
        ConfigAction::Wizard => {
            let current = config::load().unwrap_or_else(|_| config::default_config());
            let updated = wizard::run_wizard(&current)?;
            config::save(&updated).context("Failed to save configuration")?;
            println!("Saved to {}", config::config_path().display());
        }
    }
    Ok(())
}

/// Apply one `config set` argument. Dotted keys address the bundler object
/// (`jito.enabled`, `jito.tip`); everything else is a top-level key,
/// strictly validated.
fn set_config_key(
    map: &mut config::ConfigMap,
    key: &str,
    value: &str,
) -> Result<(), soltrade::config::ConfigError> {
    let parsed = parse_cli_value(value);
    match key.split_once('.') {
        Some((outer, inner)) => {
            let mut nested = map
                .get(outer)
                .and_then(|v| v.as_object().cloned())
                .unwrap_or_default();
            nested.insert(inner.to_string(), parsed);
            let checked =
                normalize_value(outer, &serde_json::Value::Object(nested), true)?;
            map.insert(outer.to_string(), checked);
        }
        None => {
            let checked = normalize_value(key, &parsed, true)?;
            map.insert(key.to_string(), checked);
        }
    }
    Ok(())
}

fn lookup<'a>(map: &'a config::ConfigMap, key: &str) -> &'a serde_json::Value {
    match key.split_once('.') {
        Some((outer, inner)) => map
            .get(outer)
            .and_then(|v| v.get(inner))
            .unwrap_or(&serde_json::Value::Null),
        None => map.get(key).unwrap_or(&serde_json::Value::Null),
    }
}

fn keychain_command(action: KeychainAction) -> Result<()> {
    let keychain = OsKeychain::new();
    match action {
        KeychainAction::Store => {
            let secret = wizard::prompt_secret()?;
            // Fail before storing if the key doesn't decode
            let keypair = keypair_from_secret(&secret)?;
            keychain.store(&secret)?;
            use solana_sdk::signature::Signer;
            println!("Stored key for wallet {}", keypair.pubkey());
        }
        KeychainAction::Unlock => match keychain.get() {
            Ok(secret) => {
                let keypair = keypair_from_secret(&secret)?;
                use solana_sdk::signature::Signer;
                println!("Wallet: {}", keypair.pubkey());
            }
            Err(KeychainError::Missing) => {
                bail!("{}", KeychainError::Missing);
            }
            Err(e) => return Err(e.into()),
        },
        KeychainAction::Delete => {
            if keychain.delete()? {
                println!("Key removed from the keychain.");
            } else {
                println!("No key was stored.");
            }
        }
    }
    Ok(())
}

async fn doctor_command(verbose: bool) -> Result<()> {
    let keychain = OsKeychain::new();
    let context = SwapContext::for_secrets(Arc::new(OsKeychain::new()));
    let notifier = DesktopNotifier::new();
    let reports = doctor::run_checks(&keychain, &context, &notifier).await;
    if !render::doctor_report(&reports, verbose) {
        std::process::exit(1);
    }
    Ok(())
}
