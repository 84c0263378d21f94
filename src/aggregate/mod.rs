//! Frequency tables that drive the analytics charts.
//!
//! [`aggregate`] turns a record list into four independent
//! [`FrequencyTable`]s. Tables are always rebuilt from scratch; nothing here
//! updates incrementally. Labels keep first-seen order, and each label's
//! chart color is `PALETTE[i % 6]` for its first-seen index `i`.

use indexmap::IndexMap;
use serde::Serialize;

use crate::record::{AccidentRecord, PLACEHOLDER};

/// Chart colors, cycled in label first-seen order.
pub const PALETTE: [&str; 6] = [
    "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF", "#FF9F40",
];

// ---------------------------------------------------------------------------
// FrequencyTable
// ---------------------------------------------------------------------------

/// Label → count, in first-seen label order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: IndexMap<String, usize>,
}

/// One chart slice or bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableEntry {
    pub label: String,
    pub count: usize,
    pub color: &'static str,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `label`.
    pub fn increment(&mut self, label: &str) {
        match self.counts.get_mut(label) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(label.to_string(), 1);
            }
        }
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.counts.get(label).copied()
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Label → palette color, in first-seen order.
    pub fn colors(&self) -> Vec<(&str, &'static str)> {
        self.labels()
            .enumerate()
            .map(|(i, label)| (label, color_for(i)))
            .collect()
    }

    /// Labels with their counts and colors, in first-seen order.
    pub fn entries(&self) -> Vec<TableEntry> {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, (label, count))| TableEntry {
                label: label.clone(),
                count: *count,
                color: color_for(i),
            })
            .collect()
    }

    /// Largest single count (0 when empty).
    pub fn max_count(&self) -> usize {
        self.counts.values().copied().max().unwrap_or(0)
    }
}

impl Serialize for FrequencyTable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries().serialize(serializer)
    }
}

/// Palette color for the label at first-seen index `index`.
pub fn color_for(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// The four chart tables derived from one record list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aggregates {
    pub vehicle_types: FrequencyTable,
    pub time_of_day: FrequencyTable,
    pub license_status: FrequencyTable,
    pub damage_locations: FrequencyTable,
}

/// Build all four tables from `records`.
pub fn aggregate(records: &[AccidentRecord]) -> Aggregates {
    let mut aggregates = Aggregates::default();

    for record in records {
        aggregates
            .vehicle_types
            .increment(label_or_unknown(record.vehicle_type()));
        aggregates
            .time_of_day
            .increment(&hour_range_label(record.time.as_deref()));
        aggregates
            .license_status
            .increment(label_or_unknown(record.license_status()));
        for location in record.damage_locations() {
            aggregates
                .damage_locations
                .increment(label_or_unknown(Some(location.as_str())));
        }
    }

    aggregates
}

fn label_or_unknown(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => PLACEHOLDER,
    }
}

/// Hour bucket label for a `HH:MM...` time string: `"HH:00 - HH:59"`.
///
/// The hour is the text before the first `:` (the whole string if there is
/// none), `"00"` when that is empty or the time is absent, and a single
/// character is zero-padded. It is not checked for being numeric or in
/// range, so malformed input yields a malformed label.
pub fn hour_range_label(time: Option<&str>) -> String {
    let segment = time
        .and_then(|t| t.split(':').next())
        .unwrap_or_default();
    let hour = match segment.chars().count() {
        0 => "00".to_string(),
        1 => format!("0{segment}"),
        _ => segment.to_string(),
    };
    format!("{hour}:00 - {hour}:59")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> AccidentRecord {
        AccidentRecord::from_value(value)
    }

    #[test]
    fn hour_labels() {
        assert_eq!(hour_range_label(Some("08:15")), "08:00 - 08:59");
        assert_eq!(hour_range_label(Some("23:59:00")), "23:00 - 23:59");
        assert_eq!(hour_range_label(Some("8:05")), "08:00 - 08:59");
        assert_eq!(hour_range_label(Some(":30")), "00:00 - 00:59");
        assert_eq!(hour_range_label(Some("")), "00:00 - 00:59");
        assert_eq!(hour_range_label(None), "00:00 - 00:59");
    }

    #[test]
    fn malformed_hours_are_not_validated() {
        assert_eq!(hour_range_label(Some("ab:cd")), "ab:00 - ab:59");
        assert_eq!(hour_range_label(Some("99:00")), "99:00 - 99:59");
        assert_eq!(hour_range_label(Some("Unknown")), "Unknown:00 - Unknown:59");
    }

    #[test]
    fn single_record_time_table() {
        let aggregates = aggregate(&[record(json!({ "time": "08:15" }))]);
        assert_eq!(aggregates.time_of_day.len(), 1);
        assert_eq!(aggregates.time_of_day.get("08:00 - 08:59"), Some(1));
    }

    #[test]
    fn damage_locations_count_each_entry() {
        let aggregates = aggregate(&[record(json!({
            "damage_locations": ["FRONT", "FRONT", "REAR"]
        }))]);
        let table = &aggregates.damage_locations;
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("FRONT"), Some(2));
        assert_eq!(table.get("REAR"), Some(1));
    }

    #[test]
    fn missing_fields_count_as_unknown() {
        let aggregates = aggregate(&[
            record(json!({})),
            record(json!({ "vehicle": { "type": "" }, "driver": {} })),
            record(json!({ "vehicle": { "type": "SUV" }, "driver": { "license_status": "Licensed" } })),
        ]);
        assert_eq!(aggregates.vehicle_types.get(PLACEHOLDER), Some(2));
        assert_eq!(aggregates.vehicle_types.get("SUV"), Some(1));
        assert_eq!(aggregates.license_status.get(PLACEHOLDER), Some(2));
        assert_eq!(aggregates.license_status.get("Licensed"), Some(1));
        assert!(aggregates.damage_locations.is_empty());
    }

    #[test]
    fn labels_keep_first_seen_order() {
        let aggregates = aggregate(&[
            record(json!({ "vehicle": { "type": "Taxi" } })),
            record(json!({ "vehicle": { "type": "Sedan" } })),
            record(json!({ "vehicle": { "type": "Taxi" } })),
            record(json!({ "vehicle": { "type": "Bus" } })),
        ]);
        let labels: Vec<&str> = aggregates.vehicle_types.labels().collect();
        assert_eq!(labels, vec!["Taxi", "Sedan", "Bus"]);
    }

    #[test]
    fn colors_cycle_through_palette() {
        let mut table = FrequencyTable::new();
        for label in ["a", "b", "c", "d", "e", "f", "g", "h"] {
            table.increment(label);
        }
        let colors = table.colors();
        assert_eq!(colors[0], ("a", PALETTE[0]));
        assert_eq!(colors[5], ("f", PALETTE[5]));
        assert_eq!(colors[6], ("g", PALETTE[0]));
        assert_eq!(colors[7], ("h", PALETTE[1]));
    }

    #[test]
    fn empty_input_gives_empty_tables() {
        let aggregates = aggregate(&[]);
        assert_eq!(aggregates, Aggregates::default());
        assert_eq!(aggregates.vehicle_types.max_count(), 0);
    }

    #[test]
    fn table_serializes_as_entry_list() {
        let mut table = FrequencyTable::new();
        table.increment("REAR");
        table.increment("REAR");
        let value = serde_json::to_value(&table).unwrap();
        assert_eq!(
            value,
            json!([{ "label": "REAR", "count": 2, "color": "#FF6384" }])
        );
    }
}
