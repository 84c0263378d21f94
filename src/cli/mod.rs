//! CLI command implementations.
//!
//! Provides subcommand handlers for:
//! - `crashscope search --make FORD ...`: one search, printed as cards or charts
//! - `crashscope web`: the browser dashboard
//! - `crashscope history --days N`: summary of past searches
//! - `crashscope health`: service reachability, config and log files
//! - `crashscope config show|init|set|reset`: configuration management

use anyhow::Result;
use colored::Colorize;
use serde_json::{Map, Value};

use crate::app::session::Session;
use crate::app::{AppState, Event, ViewMode};
use crate::client::AccidentClient;
use crate::config;
use crate::filter::FilterField;
use crate::history::logger;
use crate::history::reporter::{self, HistorySummary};
use crate::render::{self, OutputFormat};
use crate::web;

// ---------------------------------------------------------------------------
// crashscope search
// ---------------------------------------------------------------------------

/// Parsed `search` flags.
#[derive(Debug, Clone)]
pub struct SearchArgs {
    /// One optional value per field, in [`FilterField::ALL`] order.
    pub filters: [Option<String>; 10],
    /// Overrides `display.view` when set.
    pub view: Option<ViewMode>,
    pub format: OutputFormat,
}

/// Run one search and print it. Returns `false` when the search ended in
/// an error state.
pub fn run_search(args: SearchArgs) -> Result<bool> {
    let config = config::load();
    let view = args.view.unwrap_or(config.display.view);

    let state = initial_state(view, &args.filters);
    let session = Session::new(AccidentClient::from_config(&config.service))
        .with_history(config.history.enabled);
    let state = session.submit(state);

    print!(
        "{}",
        render::render(&state, args.format, config.display.chart_width)?
    );
    if args.format == OutputFormat::Json {
        println!();
    }

    Ok(state.error().is_none())
}

/// Feed the flag values into a fresh state the way form edits would.
fn initial_state(view: ViewMode, filters: &[Option<String>; 10]) -> AppState {
    let mut state = AppState::new(view);
    for (field, value) in FilterField::ALL.into_iter().zip(filters) {
        if let Some(value) = value {
            (state, _) = state.update(Event::FieldChanged {
                field,
                value: value.clone(),
            });
        }
    }
    state
}

// ---------------------------------------------------------------------------
// crashscope web
// ---------------------------------------------------------------------------

/// Serve the dashboard until interrupted.
pub fn run_web(addr: Option<&str>) -> Result<()> {
    let config = config::load();
    let addr = addr.unwrap_or(&config.web.addr).to_string();
    web::serve(&addr, &config)
}

// ---------------------------------------------------------------------------
// crashscope history
// ---------------------------------------------------------------------------

/// Show a summary of logged searches.
pub fn run_history(format: OutputFormat, days: Option<u32>) -> Result<()> {
    let summary = reporter::compute_summary(days);

    if summary.total_queries == 0 {
        println!(
            "{}",
            "No searches logged yet. Run `crashscope search` to start a history.".yellow()
        );
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Csv => print_history_csv(&summary),
        OutputFormat::Table => print_history_table(&summary),
    }

    Ok(())
}

fn print_history_table(summary: &HistorySummary) {
    println!("{}", "crashscope Query History".bold().cyan());
    println!("{}", "=".repeat(60));
    println!();

    println!("  {} {}", "Total searches:".bold(), summary.total_queries);
    println!(
        "  {} {} ({:.0}%)",
        "Succeeded:     ".bold(),
        summary.succeeded,
        summary.success_pct()
    );
    println!("  {} {}", "Failed:        ".bold(), summary.failed);
    println!(
        "  {} {:.0} ms",
        "Avg latency:   ".bold(),
        summary.avg_latency_ms
    );
    println!(
        "  {} {:.1}",
        "Avg results:   ".bold(),
        summary.avg_records
    );
    println!();

    if !summary.field_usage.is_empty() {
        println!("{}", "Filter Usage".bold().cyan());
        for usage in &summary.field_usage {
            println!("  {:<24} {:>6}", field_label(&usage.field), usage.count);
        }
        println!();
    }

    if !summary.error_kinds.is_empty() {
        println!("{}", "Failures".bold().cyan());
        for (kind, count) in &summary.error_kinds {
            println!("  {:<24} {:>6}", kind, count);
        }
        println!();
    }

    println!("{}", "Recent Searches".bold().cyan());
    println!(
        "  {:<20} {:<7} {:>7} {:>9}  Filters",
        "Time", "Outcome", "Results", "Latency"
    );
    println!("  {}", "-".repeat(58));
    for (i, entry) in summary.recent.iter().enumerate() {
        let outcome = if entry.succeeded() {
            "ok".green()
        } else {
            "error".red()
        };
        let line = format!(
            "  {:<20} {:<7} {:>7} {:>7}ms  {}",
            truncate(&entry.timestamp, 19),
            outcome,
            entry.record_count,
            entry.latency_ms,
            truncate(&format_filters(&entry.filters), 40),
        );

        if i % 2 == 0 {
            println!("{}", line);
        } else {
            println!("{}", line.dimmed());
        }
    }
}

fn print_history_csv(summary: &HistorySummary) {
    println!("timestamp,outcome,record_count,latency_ms,error_kind,filters");
    for entry in &summary.recent {
        println!(
            "{},{},{},{},{},\"{}\"",
            entry.timestamp,
            entry.outcome,
            entry.record_count,
            entry.latency_ms,
            entry.error_kind.as_deref().unwrap_or_default(),
            format_filters(&entry.filters).replace('"', "\"\""),
        );
    }
}

// ---------------------------------------------------------------------------
// crashscope health
// ---------------------------------------------------------------------------

/// Check service reachability and local files.
pub fn run_health() -> Result<()> {
    let config = config::load();
    let client = AccidentClient::from_config(&config.service);

    println!("{}", "crashscope Health Check".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();

    // 1. Accident service
    let reachable = client.probe();
    print_health_item(
        "Accident service",
        reachable,
        &if reachable {
            client.endpoint()
        } else {
            format!("{} (unreachable)", client.base_url())
        },
    );

    // 2. Config files
    let global = config::global_config_file();
    let global_exists = global.as_ref().map(|p| p.exists()).unwrap_or(false);
    print_health_item(
        "Global config",
        global_exists,
        &global
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "no home directory".to_string()),
    );
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".crashscope.toml"
        } else {
            "none"
        },
    );

    // 3. Query log
    if config.history.enabled {
        let log_exists = logger::query_log_path()
            .map(|p| p.exists())
            .unwrap_or(false);
        let log_entries = if log_exists {
            logger::read_all_entries().len()
        } else {
            0
        };
        print_health_item(
            "Query log",
            log_exists,
            &if log_exists {
                format!("{} entries", log_entries)
            } else {
                "no log file yet".to_string()
            },
        );
    } else {
        print_health_item("Query log", false, "disabled (history.enabled = false)");
    }

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<25} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// crashscope config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective crashscope Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source("~/.crashscope/config.toml", global_exists);
    print_source(".crashscope.toml", project_exists);
    println!(
        "  {} {}",
        "·".dimmed(),
        "CRASHSCOPE_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(name: &str, exists: bool) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.crashscope/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `key=value` pairs joined by spaces; `(none)` for an unfiltered search.
fn format_filters(filters: &Map<String, Value>) -> String {
    if filters.is_empty() {
        return "(none)".to_string();
    }
    filters
        .iter()
        .map(|(key, value)| match value {
            Value::String(s) => format!("{key}={s}"),
            other => format!("{key}={other}"),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Form label for a logged wire name; unknown names are shown as-is.
fn field_label(wire_name: &str) -> &str {
    wire_name
        .parse::<FilterField>()
        .map(|field| field.label())
        .unwrap_or(wire_name)
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
