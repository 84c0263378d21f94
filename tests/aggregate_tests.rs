//! Aggregation tests over realistic result sets.
//!
//! Checks the table totals against the records they were built from, the
//! first-seen color assignment, and the label rules for missing values.
use crashscope::aggregate::{PALETTE, aggregate, hour_range_label};
use crashscope::client::interpret_response;
use crashscope::record::AccidentRecord;
use serde_json::json;

fn records(value: serde_json::Value) -> Vec<AccidentRecord> {
    let body = json!({ "accidents": value }).to_string();
    interpret_response(200, &body).unwrap()
}

fn mixed_batch() -> Vec<AccidentRecord> {
    records(json!([
        {
            "date": "2024-03-01", "time": "08:15",
            "vehicle": { "type": "Sedan", "make": "FORD" },
            "driver": { "license_status": "Licensed" },
            "damage_locations": ["FRONT", "FRONT", "REAR"]
        },
        {
            "time": "8:40",
            "vehicle": { "type": "SUV" },
            "driver": { "license_status": "" },
            "damage_locations": ["LEFT SIDE"]
        },
        {
            "time": "17:02",
            "vehicle": { "type": "" },
            "damage_locations": []
        },
        {
            "vehicle": { "type": "Sedan" },
            "driver": { "license_status": "Suspended" },
            "damage_locations": ["", "ROOF"]
        },
        "not even an object"
    ]))
}

// ---------------------------------------------------------------------------
// Totals
// ---------------------------------------------------------------------------

#[test]
fn per_record_tables_count_every_record() {
    let batch = mixed_batch();
    let aggregates = aggregate(&batch);

    assert_eq!(aggregates.vehicle_types.total(), batch.len());
    assert_eq!(aggregates.time_of_day.total(), batch.len());
    assert_eq!(aggregates.license_status.total(), batch.len());
}

#[test]
fn damage_total_matches_location_count() {
    let batch = mixed_batch();
    let aggregates = aggregate(&batch);

    let locations: usize = batch.iter().map(|r| r.damage_locations().len()).sum();
    assert_eq!(aggregates.damage_locations.total(), locations);
    assert_eq!(aggregates.damage_locations.get("FRONT"), Some(2));
    assert_eq!(aggregates.damage_locations.get("REAR"), Some(1));
    assert_eq!(aggregates.damage_locations.get("Unknown"), Some(1));
}

#[test]
fn empty_result_gives_empty_tables() {
    let aggregates = aggregate(&records(json!([])));
    assert!(aggregates.vehicle_types.is_empty());
    assert!(aggregates.time_of_day.is_empty());
    assert!(aggregates.license_status.is_empty());
    assert!(aggregates.damage_locations.is_empty());
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

#[test]
fn missing_values_count_as_unknown() {
    let aggregates = aggregate(&mixed_batch());

    assert_eq!(aggregates.vehicle_types.get("Sedan"), Some(2));
    assert_eq!(aggregates.vehicle_types.get("SUV"), Some(1));
    assert_eq!(aggregates.vehicle_types.get("Unknown"), Some(2));

    assert_eq!(aggregates.license_status.get("Licensed"), Some(1));
    assert_eq!(aggregates.license_status.get("Suspended"), Some(1));
    assert_eq!(aggregates.license_status.get("Unknown"), Some(3));
}

#[test]
fn times_bucket_by_hour() {
    let aggregates = aggregate(&mixed_batch());

    assert_eq!(aggregates.time_of_day.get("08:00 - 08:59"), Some(2));
    assert_eq!(aggregates.time_of_day.get("17:00 - 17:59"), Some(1));
    assert_eq!(aggregates.time_of_day.get("00:00 - 00:59"), Some(2));
}

#[test]
fn single_morning_record() {
    let aggregates = aggregate(&records(json!([{ "time": "08:15" }])));
    let entries = aggregates.time_of_day.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].label, "08:00 - 08:59");
    assert_eq!(entries[0].count, 1);
    assert_eq!(hour_range_label(Some("08:15")), entries[0].label);
}

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

#[test]
fn colors_follow_first_seen_order() {
    let aggregates = aggregate(&mixed_batch());
    let colors = aggregates.vehicle_types.colors();

    assert_eq!(colors[0], ("Sedan", PALETTE[0]));
    assert_eq!(colors[1], ("SUV", PALETTE[1]));
    assert_eq!(colors[2], ("Unknown", PALETTE[2]));
}

#[test]
fn colors_cycle_after_six_labels() {
    let many: Vec<serde_json::Value> = (0..8)
        .map(|i| json!({ "vehicle": { "type": format!("type-{i}") } }))
        .collect();
    let aggregates = aggregate(&records(json!(many)));
    let entries = aggregates.vehicle_types.entries();

    assert_eq!(entries.len(), 8);
    assert_eq!(entries[6].color, PALETTE[0]);
    assert_eq!(entries[7].color, PALETTE[1]);
}

#[test]
fn aggregation_is_deterministic() {
    let batch = mixed_batch();
    assert_eq!(aggregate(&batch), aggregate(&batch));
}
