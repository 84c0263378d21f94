//! Configuration loading tests.
//!
//! Environment variables are process-global, so every env-var case lives in
//! one test to keep them from racing each other.
use std::fs;
use std::path::PathBuf;

use crashscope::app::ViewMode;
use crashscope::config::{self, CrashscopeConfig};

fn set_env(key: &str, value: &str) {
    // SAFETY: only this test touches CRASHSCOPE_* variables.
    unsafe { std::env::set_var(key, value) }
}

fn remove_env(key: &str) {
    // SAFETY: only this test touches CRASHSCOPE_* variables.
    unsafe { std::env::remove_var(key) }
}

const VARS: [&str; 5] = [
    "CRASHSCOPE_SERVICE_URL",
    "CRASHSCOPE_TIMEOUT_MS",
    "CRASHSCOPE_VIEW",
    "CRASHSCOPE_WEB_ADDR",
    "CRASHSCOPE_HISTORY",
];

#[test]
fn env_overrides_take_precedence() {
    set_env("CRASHSCOPE_SERVICE_URL", "http://collisions.test:9000");
    set_env("CRASHSCOPE_TIMEOUT_MS", "1500");
    set_env("CRASHSCOPE_VIEW", "analytics");
    set_env("CRASHSCOPE_WEB_ADDR", "0.0.0.0:8080");
    set_env("CRASHSCOPE_HISTORY", "off");

    let loaded = config::load();
    assert_eq!(loaded.service.base_url, "http://collisions.test:9000");
    assert_eq!(loaded.service.timeout_ms, 1500);
    assert_eq!(loaded.display.view, ViewMode::Analytics);
    assert_eq!(loaded.web.addr, "0.0.0.0:8080");
    assert!(!loaded.history.enabled);

    // Unparsable values leave the file/default layer in place.
    set_env("CRASHSCOPE_TIMEOUT_MS", "soon");
    set_env("CRASHSCOPE_VIEW", "sideways");
    set_env("CRASHSCOPE_SERVICE_URL", "");
    set_env("CRASHSCOPE_HISTORY", "yes");
    let loaded = config::load();
    assert_ne!(loaded.service.base_url, "");
    assert_ne!(loaded.service.timeout_ms, 1500);
    assert!(loaded.history.enabled);

    for var in VARS {
        remove_env(var);
    }
}

#[test]
fn defaults_match_documented_values() {
    let defaults = CrashscopeConfig::default();
    assert_eq!(defaults.service.base_url, "http://localhost:8000");
    assert_eq!(defaults.service.timeout_ms, 30_000);
    assert_eq!(defaults.display.view, ViewMode::Detail);
    assert_eq!(defaults.display.chart_width, 40);
    assert_eq!(defaults.web.addr, "127.0.0.1:9747");
    assert!(defaults.history.enabled);
}

#[test]
fn partial_toml_keeps_other_defaults() {
    let parsed: CrashscopeConfig = toml::from_str(
        r#"
[service]
base_url = "http://10.0.0.5:8000"

[display]
view = "analytics"
"#,
    )
    .unwrap();

    assert_eq!(parsed.service.base_url, "http://10.0.0.5:8000");
    assert_eq!(parsed.service.timeout_ms, 30_000);
    assert_eq!(parsed.display.view, ViewMode::Analytics);
    assert_eq!(parsed.display.chart_width, 40);
    assert!(parsed.history.enabled);
}

// ---------------------------------------------------------------------------
// File layers
// ---------------------------------------------------------------------------

/// A fresh directory under the system temp dir.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("crashscope-{}-{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn project_file_only_overrides_its_own_keys() {
    let dir = scratch_dir("layers");
    let global = dir.join("config.toml");
    let project = dir.join(".crashscope.toml");
    fs::write(
        &global,
        "[service]\nbase_url = \"http://collisions.internal:9000\"\n\n[history]\nenabled = false\n",
    )
    .unwrap();
    fs::write(&project, "[display]\nview = \"analytics\"\n").unwrap();

    let loaded = config::load_layers(&[Some(global), Some(project)]);
    assert_eq!(loaded.service.base_url, "http://collisions.internal:9000");
    assert_eq!(loaded.service.timeout_ms, 30_000);
    assert_eq!(loaded.display.view, ViewMode::Analytics);
    assert!(!loaded.history.enabled);

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn malformed_layer_is_skipped() {
    let dir = scratch_dir("malformed");
    let global = dir.join("config.toml");
    let project = dir.join(".crashscope.toml");
    fs::write(&global, "[service]\nbase_url = \"http://10.0.0.5:8000\"\n").unwrap();
    fs::write(&project, "[service]\ntimeout_ms = \"soon\"\n").unwrap();

    let loaded = config::load_layers(&[Some(global), Some(project), None]);
    assert_eq!(loaded.service.base_url, "http://10.0.0.5:8000");
    assert_eq!(loaded.service.timeout_ms, 30_000);

    let _ = fs::remove_dir_all(dir);
}
