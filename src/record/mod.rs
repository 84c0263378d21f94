//! Accident records as returned by the accident service.
//!
//! Every field is optional. The service normally sends strings, but scalar
//! leaves also accept numbers and booleans (rendered as text), and any other
//! shape, including `null`, is treated as absent. Absence is never an
//! error: it renders as [`PLACEHOLDER`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Text shown for any missing or empty leaf value.
pub const PLACEHOLDER: &str = "Unknown";

/// One collision record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccidentRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub time: Option<String>,
    #[serde(deserialize_with = "lenient_group")]
    pub vehicle: Option<VehicleDetails>,
    #[serde(deserialize_with = "lenient_group")]
    pub driver: Option<DriverDetails>,
    #[serde(deserialize_with = "lenient_group")]
    pub crash: Option<CrashDetails>,
    #[serde(deserialize_with = "lenient_list")]
    pub damage_locations: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_list")]
    pub contributing_factors: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_string")]
    pub public_property_damage: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleDetails {
    #[serde(rename = "type", deserialize_with = "lenient_string")]
    pub vehicle_type: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub make: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub model: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub year: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub state: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub occupants: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverDetails {
    #[serde(deserialize_with = "lenient_string")]
    pub sex: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub license_status: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub license_jurisdiction: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrashDetails {
    #[serde(deserialize_with = "lenient_string")]
    pub pre_crash: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub point_of_impact: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub travel_direction: Option<String>,
}

impl AccidentRecord {
    /// Convert one element of the `accidents` array.
    ///
    /// Elements that are not objects become an all-absent record.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    pub fn vehicle_type(&self) -> Option<&str> {
        self.vehicle.as_ref()?.vehicle_type.as_deref()
    }

    pub fn license_status(&self) -> Option<&str> {
        self.driver.as_ref()?.license_status.as_deref()
    }

    /// Damage locations, empty when absent.
    pub fn damage_locations(&self) -> &[String] {
        self.damage_locations.as_deref().unwrap_or_default()
    }

    /// Contributing factors, empty when absent.
    pub fn contributing_factors(&self) -> &[String] {
        self.contributing_factors.as_deref().unwrap_or_default()
    }
}

/// Return the value, or [`PLACEHOLDER`] when it is absent or empty.
pub fn display(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => PLACEHOLDER,
    }
}

// ---------------------------------------------------------------------------
// Lenient deserialization helpers
// ---------------------------------------------------------------------------

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .map(|item| scalar_text(item).unwrap_or_default())
                .collect(),
        )),
        _ => Ok(None),
    }
}

fn lenient_group<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => Ok(serde_json::from_value(value).ok()),
        _ => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
