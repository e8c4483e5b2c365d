//! Configuration Store
//!
//! Reads and writes the JSON config file with restrictive permissions and
//! atomic replace-on-write semantics. Loading is lenient: missing files are
//! seeded with defaults, unparseable files are moved aside and rebuilt, and
//! invalid values revert to defaults with a logged warning. Loading never
//! aborts the process.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::warn;

use super::schema::{default_config, normalize, ConfigError, ConfigMap, APP_NAME};

/// Env var pointing directly at the config file
pub const CONFIG_PATH_ENV: &str = "SOLTRADE_CONFIG_PATH";
/// Env var overriding the directory that contains the app config dir
pub const CONFIG_HOME_ENV: &str = "SOLTRADE_CONFIG_HOME";

/// Resolve the config file path.
///
/// `$SOLTRADE_CONFIG_PATH` wins outright; `$SOLTRADE_CONFIG_HOME` replaces the
/// platform config directory; otherwise the platform default is used
/// (`~/Library/Application Support` on macOS, `$XDG_CONFIG_HOME`/`~/.config`
/// elsewhere).
pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }
    let base = std::env::var(CONFIG_HOME_ENV)
        .ok()
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    base.join(APP_NAME).join("config.json")
}

/// Load the config from the resolved path, lenient mode.
pub fn load() -> Result<ConfigMap, ConfigError> {
    load_from(&config_path())
}

/// Load the config from an explicit path, lenient mode.
///
/// Writes defaults when the file is missing, repairs unparseable files, and
/// re-persists whenever normalization changed anything.
pub fn load_from(path: &Path) -> Result<ConfigMap, ConfigError> {
    if !path.exists() {
        let defaults = default_config();
        save_to(path, &defaults)?;
        return Ok(defaults);
    }

    let raw = match read_map(path) {
        Ok(map) => map,
        Err(err) => {
            warn!("config file is unreadable, restoring defaults: {}", err);
            back_up_invalid(path);
            let defaults = default_config();
            save_to(path, &defaults)?;
            return Ok(defaults);
        }
    };

    let outcome = normalize(&raw, false)?;
    for warning in &outcome.warnings {
        warn!(
            "invalid config value for `{}` ({}); using default",
            warning.key, warning.message
        );
    }
    if outcome.changed {
        save_to(path, &outcome.config)?;
    }
    Ok(outcome.config)
}

/// Save the config to the resolved path after lenient re-validation.
pub fn save(config: &ConfigMap) -> Result<ConfigMap, ConfigError> {
    save_normalized(&config_path(), config)
}

/// Save to an explicit path after lenient re-validation, returning what was
/// actually written.
pub fn save_normalized(path: &Path, config: &ConfigMap) -> Result<ConfigMap, ConfigError> {
    let outcome = normalize(config, false)?;
    for warning in &outcome.warnings {
        warn!(
            "correcting invalid config value for `{}` before save ({})",
            warning.key, warning.message
        );
    }
    save_to(path, &outcome.config)?;
    Ok(outcome.config)
}

fn read_map(path: &Path) -> Result<ConfigMap, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&contents)?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ConfigError::NotAnObject),
    }
}

/// Move a corrupt config aside so the user can recover hand edits.
/// Best-effort: a failed backup must not block the rebuild.
fn back_up_invalid(path: &Path) {
    let backup = path.with_file_name(format!(
        "config.json.invalid-{}",
        chrono::Utc::now().timestamp()
    ));
    if let Err(err) = std::fs::rename(path, &backup) {
        warn!("could not back up invalid config file: {}", err);
    }
}

/// Atomic replace-on-write: serialize to a temp file in the same directory,
/// then persist over the target so a mid-write kill never leaves a partial
/// file. Directory is 0700 and the file 0600 on unix.
fn save_to(path: &Path, config: &ConfigMap) -> Result<(), ConfigError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;
    restrict_dir_permissions(dir)?;

    let body = serde_json::to_string_pretty(&Value::Object(config.clone()))?;
    let tmp = NamedTempFile::new_in(dir)?;
    std::fs::write(tmp.path(), body.as_bytes())?;
    tmp.persist(path).map_err(|e| ConfigError::Io(e.error))?;
    restrict_file_permissions(path)?;
    Ok(())
}

#[cfg(unix)]
fn restrict_dir_permissions(dir: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700))?;
    Ok(())
}

#[cfg(unix)]
fn restrict_file_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_dir_permissions(_dir: &Path) -> Result<(), ConfigError> {
    Ok(())
}

#[cfg(not(unix))]
fn restrict_file_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}
