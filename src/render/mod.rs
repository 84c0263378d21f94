//! Presentation of a search state.
//!
//! The screen comes from [`AppState::screen`]: error, loading, empty, or
//! results. Results are shown in the current [`ViewMode`]: detail cards
//! ([`cards`]) or analytics charts ([`charts`]). Every renderer returns a
//! `String` so the CLI can print it and tests can inspect it.
//!
//! Besides the colored terminal table there are `json` and `csv` outputs.
//! The JSON shape ([`SearchReport`]) is the same one the web dashboard
//! serves.

pub mod cards;
pub mod charts;

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use crate::aggregate::Aggregates;
use crate::app::{AppState, EMPTY_STATE_MESSAGE, Screen, ViewMode};
use crate::record::AccidentRecord;

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

/// Serializable snapshot of a finished search.
#[derive(Debug, Serialize)]
pub struct SearchReport<'a> {
    pub view: ViewMode,
    pub accidents: &'a [AccidentRecord],
    pub error: Option<&'a str>,
    pub analytics: Option<&'a Aggregates>,
}

impl<'a> SearchReport<'a> {
    pub fn from_state(state: &'a AppState) -> Self {
        Self {
            view: state.view(),
            accidents: state.records(),
            error: state.error(),
            analytics: state.aggregates(),
        }
    }
}

/// Render `state` in the given format.
pub fn render(state: &AppState, format: OutputFormat, chart_width: usize) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&SearchReport::from_state(state))?),
        OutputFormat::Csv => Ok(render_csv(state)),
        OutputFormat::Table => Ok(render_table(state, chart_width)),
    }
}

fn render_table(state: &AppState, chart_width: usize) -> String {
    match state.screen() {
        Screen::Error(message) => format!("{} {}\n", "Error:".red().bold(), message.red()),
        Screen::Loading => format!("{}\n", "Searching...".dimmed()),
        Screen::Empty => format!("{}\n", EMPTY_STATE_MESSAGE.yellow()),
        Screen::Results(records) => match state.view() {
            ViewMode::Detail => cards::render_cards(records),
            ViewMode::Analytics => {
                let mut out = format!(
                    "{}\n\n",
                    format!("Accident Analytics ({} records)", records.len())
                        .bold()
                        .cyan()
                );
                if let Some(aggregates) = state.aggregates() {
                    out.push_str(&charts::render_analytics(aggregates, chart_width));
                }
                out
            }
        },
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

const RECORD_CSV_HEADER: &str = "date,time,vehicle_type,make,model,year,state,occupants,\
driver_sex,license_status,license_jurisdiction,pre_crash,point_of_impact,travel_direction,\
damage_locations,contributing_factors,public_property_damage";

fn render_csv(state: &AppState) -> String {
    if let Some(error) = state.error() {
        return format!("error\n{}\n", csv_field(error));
    }

    match state.view() {
        ViewMode::Detail => {
            let mut out = format!("{RECORD_CSV_HEADER}\n");
            for record in state.records() {
                out.push_str(&record_csv_row(record));
                out.push('\n');
            }
            out
        }
        ViewMode::Analytics => {
            let mut out = String::from("table,label,count,color\n");
            if let Some(aggregates) = state.aggregates() {
                for (name, table) in charts::named_tables(aggregates) {
                    for entry in table.entries() {
                        out.push_str(&format!(
                            "{},{},{},{}\n",
                            name,
                            csv_field(&entry.label),
                            entry.count,
                            entry.color
                        ));
                    }
                }
            }
            out
        }
    }
}

fn record_csv_row(record: &AccidentRecord) -> String {
    let vehicle = record.vehicle.clone().unwrap_or_default();
    let driver = record.driver.clone().unwrap_or_default();
    let crash = record.crash.clone().unwrap_or_default();

    let fields = [
        record.date.as_deref(),
        record.time.as_deref(),
        vehicle.vehicle_type.as_deref(),
        vehicle.make.as_deref(),
        vehicle.model.as_deref(),
        vehicle.year.as_deref(),
        vehicle.state.as_deref(),
        vehicle.occupants.as_deref(),
        driver.sex.as_deref(),
        driver.license_status.as_deref(),
        driver.license_jurisdiction.as_deref(),
        crash.pre_crash.as_deref(),
        crash.point_of_impact.as_deref(),
        crash.travel_direction.as_deref(),
    ];

    let mut row: Vec<String> = fields
        .iter()
        .map(|value| csv_field(value.unwrap_or_default()))
        .collect();
    row.push(csv_field(&record.damage_locations().join("; ")));
    row.push(csv_field(&record.contributing_factors().join("; ")));
    row.push(csv_field(
        record.public_property_damage.as_deref().unwrap_or_default(),
    ));
    row.join(",")
}

/// Quote a CSV field when it contains a delimiter, quote or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
