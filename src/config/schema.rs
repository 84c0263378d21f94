/// Configuration schema and defaults for crashscope.
///
/// Defines the TOML-serializable configuration structure with sections
/// `[service]`, `[display]`, `[web]`, and `[history]`.
///
/// Every field has a built-in default; users only set what they want to
/// override.
use serde::{Deserialize, Serialize};

use crate::app::ViewMode;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level crashscope configuration.
///
/// Maps directly to `~/.crashscope/config.toml` and `.crashscope.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrashscopeConfig {
    pub service: ServiceConfig,
    pub display: DisplayConfig,
    pub web: WebConfig,
    pub history: HistoryConfig,
}

// ---------------------------------------------------------------------------
// [service]
// ---------------------------------------------------------------------------

/// Where the accident service lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL; searches go to `{base_url}/api/accidents`.
    pub base_url: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_ms: 30_000,
        }
    }
}

// ---------------------------------------------------------------------------
// [display]
// ---------------------------------------------------------------------------

/// Terminal presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// View used when `--view` is not given.
    pub view: ViewMode,
    /// Width in columns of the longest bar in analytics charts.
    pub chart_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            view: ViewMode::default(),
            chart_width: 40,
        }
    }
}

// ---------------------------------------------------------------------------
// [web]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Bind address for `crashscope web`.
    pub addr: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:9747".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [history]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Whether searches are appended to the query log.
    pub enabled: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

// ---------------------------------------------------------------------------
// Annotated default file
// ---------------------------------------------------------------------------

impl CrashscopeConfig {
    /// The annotated default config written by `crashscope config init`.
    pub fn default_toml() -> String {
        r#"# crashscope configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (CRASHSCOPE_*)
#   2. Project config (.crashscope.toml in current directory)
#   3. User global config (~/.crashscope/config.toml)
#   4. Built-in defaults

[service]
base_url = "http://localhost:8000"   # searches POST to {base_url}/api/accidents
timeout_ms = 30000

[display]
view = "detail"       # detail | analytics
chart_width = 40

[web]
addr = "127.0.0.1:9747"

[history]
enabled = true        # append each search to ~/.crashscope/query-log.jsonl
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
