//! Analytics view: terminal charts drawn from the frequency tables.
//!
//! Vehicle types and license status are share charts (the terminal stand-in
//! for a pie): one stacked strip plus a legend with percentages. Time of day
//! and damage locations are horizontal bar charts. Colors come from the
//! table's palette assignment.
use colored::{ColoredString, Colorize};

use crate::aggregate::{Aggregates, FrequencyTable};

/// How a table is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Share,
    Bar,
}

/// The four widgets in display order: (key, title, kind, table).
pub fn widgets(aggregates: &Aggregates) -> [(&'static str, &'static str, ChartKind, &FrequencyTable); 4] {
    [
        ("vehicle_types", "Vehicle Types", ChartKind::Share, &aggregates.vehicle_types),
        ("time_of_day", "Time of Day", ChartKind::Bar, &aggregates.time_of_day),
        ("license_status", "License Status", ChartKind::Share, &aggregates.license_status),
        ("damage_locations", "Damage Locations", ChartKind::Bar, &aggregates.damage_locations),
    ]
}

/// `(key, table)` pairs for machine-readable output.
pub fn named_tables(aggregates: &Aggregates) -> Vec<(&'static str, &FrequencyTable)> {
    widgets(aggregates)
        .into_iter()
        .map(|(key, _, _, table)| (key, table))
        .collect()
}

/// Render all four widgets.
pub fn render_analytics(aggregates: &Aggregates, width: usize) -> String {
    widgets(aggregates)
        .into_iter()
        .map(|(_, title, kind, table)| render_widget(title, kind, table, width))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_widget(title: &str, kind: ChartKind, table: &FrequencyTable, width: usize) -> String {
    let mut out = format!("{}\n", title.bold().cyan());

    if table.is_empty() {
        out.push_str(&format!("  {}\n", "no data".dimmed()));
        return out;
    }

    match kind {
        ChartKind::Share => out.push_str(&share_chart(table, width)),
        ChartKind::Bar => out.push_str(&bar_chart(table, width)),
    }
    out
}

fn share_chart(table: &FrequencyTable, width: usize) -> String {
    let total = table.total().max(1);
    let label_width = label_width(table);

    let mut strip = String::from("  ");
    for entry in table.entries() {
        let cells = (entry.count * width).div_ceil(total).max(1);
        strip.push_str(&paint(&"█".repeat(cells), entry.color).to_string());
    }
    strip.push('\n');

    let mut out = strip;
    for entry in table.entries() {
        out.push_str(&format!(
            "  {} {:<lw$} {:>6} ({:>5.1}%)\n",
            paint("■", entry.color),
            entry.label,
            entry.count,
            entry.count as f64 * 100.0 / total as f64,
            lw = label_width,
        ));
    }
    out
}

fn bar_chart(table: &FrequencyTable, width: usize) -> String {
    let max = table.max_count().max(1);
    let label_width = label_width(table);

    table
        .entries()
        .into_iter()
        .map(|entry| {
            let cells = (entry.count * width).div_ceil(max).max(1);
            format!(
                "  {:<lw$} {} {}\n",
                entry.label,
                paint(&"█".repeat(cells), entry.color),
                entry.count,
                lw = label_width,
            )
        })
        .collect()
}

fn label_width(table: &FrequencyTable) -> usize {
    table
        .labels()
        .map(|label| label.chars().count())
        .max()
        .unwrap_or(0)
        .min(28)
}

fn paint(text: &str, hex: &str) -> ColoredString {
    match parse_hex(hex) {
        Some((r, g, b)) => text.truecolor(r, g, b),
        None => text.normal(),
    }
}

/// Parse `#RRGGBB`.
pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{PALETTE, aggregate};
    use crate::record::AccidentRecord;
    use serde_json::json;

    #[test]
    fn parse_hex_palette() {
        for color in PALETTE {
            assert!(parse_hex(color).is_some(), "{color}");
        }
        assert_eq!(parse_hex("#FF6384"), Some((0xFF, 0x63, 0x84)));
        assert_eq!(parse_hex("FF6384"), None);
        assert_eq!(parse_hex("#GG0000"), None);
        assert_eq!(parse_hex("#FFF"), None);
    }

    #[test]
    fn empty_table_says_no_data() {
        let out = render_widget("Damage Locations", ChartKind::Bar, &FrequencyTable::new(), 20);
        assert!(out.contains("no data"));
    }

    #[test]
    fn share_chart_shows_percentages() {
        let mut table = FrequencyTable::new();
        for label in ["Sedan", "Sedan", "Sedan", "SUV"] {
            table.increment(label);
        }
        let out = share_chart(&table, 20);
        assert!(out.contains("75.0%"));
        assert!(out.contains("25.0%"));
    }

    #[test]
    fn bar_chart_lists_every_label() {
        let aggregates = aggregate(&[
            AccidentRecord::from_value(json!({ "damage_locations": ["FRONT", "FRONT", "REAR"] })),
        ]);
        let out = bar_chart(&aggregates.damage_locations, 10);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("FRONT"));
        assert!(lines[0].trim_end().ends_with('2'));
        assert!(lines[1].contains("REAR"));
    }

    #[test]
    fn widgets_are_in_fixed_order() {
        let aggregates = Aggregates::default();
        let keys: Vec<&str> = named_tables(&aggregates).into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec!["vehicle_types", "time_of_day", "license_status", "damage_locations"]
        );
    }
}
