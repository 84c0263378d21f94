/// Configuration system for crashscope.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults**: hardcoded in [`schema::CrashscopeConfig::default()`]
/// 2. **User global config**: `~/.crashscope/config.toml`
/// 3. **Project local config**: `.crashscope.toml` in the current directory
/// 4. **Environment variables**: `CRASHSCOPE_*` overrides (highest precedence)
///
/// Files are merged key by key: a project file that only sets
/// `display.view` keeps the global file's `service.base_url`.
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::CrashscopeConfig;

use crate::app::ViewMode;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars.
pub fn load() -> CrashscopeConfig {
    let mut config = load_layers(&[global_config_path(), project_config_path()]);
    apply_env_overrides(&mut config);
    config
}

/// Merge the given TOML files, in order, over the built-in defaults.
///
/// Missing files are skipped. Malformed files are reported on stderr and
/// otherwise ignored.
pub fn load_layers(paths: &[Option<PathBuf>]) -> CrashscopeConfig {
    let mut merged = toml::Value::Table(toml::Table::new());
    for path in paths.iter().flatten() {
        if let Some(layer) = load_toml_file(path) {
            merge_toml(&mut merged, layer);
        }
    }

    match merged.try_into() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[crashscope] ignoring config files: {e}");
            CrashscopeConfig::default()
        }
    }
}

/// Read a TOML config file as a raw value (if it exists and is valid).
fn load_toml_file(path: &Path) -> Option<toml::Value> {
    let content = fs::read_to_string(path).ok()?;
    let parsed = toml::from_str::<toml::Value>(&content).and_then(|value| {
        // A layer must be loadable on its own before it is merged.
        value.clone().try_into::<CrashscopeConfig>()?;
        Ok(value)
    });
    match parsed {
        Ok(value) => Some(value),
        Err(e) => {
            eprintln!("[crashscope] ignoring malformed config {}: {e}", path.display());
            None
        }
    }
}

/// Merge `layer` into `base`: tables merge recursively, anything else
/// replaces.
fn merge_toml(base: &mut toml::Value, layer: toml::Value) {
    match (base, layer) {
        (toml::Value::Table(base), toml::Value::Table(layer)) => {
            for (key, value) in layer {
                match base.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, layer) => *base = layer,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Directory holding global config and the query log: `~/.crashscope/`.
pub fn data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".crashscope"))
}

fn global_config_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("config.toml"))
}

fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".crashscope.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `CRASHSCOPE_SERVICE_URL`: accident service base URL
/// - `CRASHSCOPE_TIMEOUT_MS`: request timeout
/// - `CRASHSCOPE_VIEW`: default view (`detail`, `analytics`)
/// - `CRASHSCOPE_WEB_ADDR`: dashboard bind address
/// - `CRASHSCOPE_HISTORY`: query log on/off (`1`/`true`/`yes`/`on`)
fn apply_env_overrides(config: &mut CrashscopeConfig) {
    if let Ok(val) = std::env::var("CRASHSCOPE_SERVICE_URL")
        && !val.is_empty()
    {
        config.service.base_url = val;
    }
    if let Ok(val) = std::env::var("CRASHSCOPE_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.service.timeout_ms = ms;
    }
    if let Ok(val) = std::env::var("CRASHSCOPE_VIEW")
        && let Some(view) = parse_view(&val)
    {
        config.display.view = view;
    }
    if let Ok(val) = std::env::var("CRASHSCOPE_WEB_ADDR")
        && !val.is_empty()
    {
        config.web.addr = val;
    }
    if let Ok(val) = std::env::var("CRASHSCOPE_HISTORY") {
        config.history.enabled = is_truthy(&val);
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Parse a view-mode string.
pub fn parse_view(val: &str) -> Option<ViewMode> {
    match val.to_ascii_lowercase().as_str() {
        "detail" | "details" | "cards" => Some(ViewMode::Detail),
        "analytics" | "charts" => Some(ViewMode::Analytics),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.crashscope/config.toml`.
///
/// Returns an error if the file already exists (use `force = true` to
/// overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.crashscope/ directory")?;
    }

    fs::write(&path, CrashscopeConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key in the global config file.
///
/// Supports dotted keys like `service.base_url`. Starts from the existing
/// file, or from serialized defaults when there is none.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let content = if path.exists() {
        fs::read_to_string(&path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&CrashscopeConfig::default())
            .context("failed to serialize default config")?
    };

    let mut root: toml::Value =
        toml::from_str(&content).context("failed to parse config as TOML value")?;
    set_toml_value(&mut root, key, value)?;

    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;
    // Reject values that would make the file unloadable.
    toml::from_str::<CrashscopeConfig>(&output)
        .with_context(|| format!("invalid value for '{key}': {value}"))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
///
/// The new value keeps the type of the existing one.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let Some((section_path, leaf)) = key.rsplit_once('.') else {
        anyhow::bail!("config key must be dotted (section.key): '{key}'");
    };

    let mut current = root;
    for part in section_path.split('.') {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let table = current
        .as_table_mut()
        .with_context(|| format!("expected table at '{section_path}'"))?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::String(_)) => toml::Value::String(raw_value.to_string()),
        Some(_) => anyhow::bail!("unsupported value type for '{key}'"),
        None => anyhow::bail!("config key not found: '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
