//! Detail view: one card per accident record.
//!
//! Every leaf is shown; missing values print as the placeholder.
use colored::Colorize;

use crate::record::{AccidentRecord, display};

/// Render all records as cards under a results heading.
pub fn render_cards(records: &[AccidentRecord]) -> String {
    let mut out = format!(
        "{}\n{}\n",
        format!("Accident Results ({} found)", records.len())
            .bold()
            .cyan(),
        "=".repeat(60)
    );

    for (i, record) in records.iter().enumerate() {
        out.push('\n');
        out.push_str(&render_card(i + 1, record));
    }

    out
}

/// Render a single record as a card.
pub fn render_card(number: usize, record: &AccidentRecord) -> String {
    let vehicle = record.vehicle.clone().unwrap_or_default();
    let driver = record.driver.clone().unwrap_or_default();
    let crash = record.crash.clone().unwrap_or_default();

    let mut lines = vec![format!(
        "{} {} at {}",
        format!("#{number}").bold(),
        display(record.date.as_deref()),
        display(record.time.as_deref())
    )];

    lines.push(field_line(
        "Vehicle",
        &format!(
            "{} {} {}",
            display(vehicle.year.as_deref()),
            display(vehicle.make.as_deref()),
            display(vehicle.model.as_deref())
        ),
    ));
    lines.push(detail_line(&format!(
        "Type: {} | State: {} | Occupants: {}",
        display(vehicle.vehicle_type.as_deref()),
        display(vehicle.state.as_deref()),
        display(vehicle.occupants.as_deref())
    )));

    lines.push(field_line(
        "Driver",
        &format!(
            "{} | {}",
            display(driver.sex.as_deref()),
            display(driver.license_status.as_deref())
        ),
    ));
    lines.push(detail_line(&format!(
        "License State: {}",
        display(driver.license_jurisdiction.as_deref())
    )));

    lines.push(field_line(
        "Crash",
        &format!(
            "{} | {}",
            display(crash.pre_crash.as_deref()),
            display(crash.travel_direction.as_deref())
        ),
    ));
    lines.push(detail_line(&format!(
        "Impact: {}",
        display(crash.point_of_impact.as_deref())
    )));

    lines.push(list_lines("Damage", record.damage_locations()));
    lines.push(list_lines("Factors", record.contributing_factors()));
    lines.push(field_line(
        "Property",
        display(record.public_property_damage.as_deref()),
    ));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn field_line(name: &str, value: &str) -> String {
    format!("  {} {}", format!("{:<9}", format!("{name}:")).bold(), value)
}

fn detail_line(value: &str) -> String {
    format!("  {:<9} {}", "", value.dimmed())
}

/// A labelled bullet list; an empty list prints the placeholder.
fn list_lines(name: &str, items: &[String]) -> String {
    if items.is_empty() {
        return field_line(name, display(None));
    }

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let bullet = format!("- {}", display(Some(item.as_str())));
            if i == 0 {
                field_line(name, &bullet)
            } else {
                format!("  {:<9} {}", "", bullet)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
