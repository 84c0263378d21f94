//! Filter criteria for accident searches.
//!
//! A [`FilterCriteria`] holds one string value per [`FilterField`]. Values
//! start out empty and are only changed through [`FilterCriteria::set`],
//! which applies the per-field input normalization (make and model are
//! upper-cased to match the service's matching conventions).
//!
//! Empty values are never sent: [`FilterCriteria::payload`] builds the JSON
//! request body from the non-empty fields only. Dates are forwarded as-is;
//! range ordering and format are the service's concern.

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// One of the ten searchable fields, in canonical (form) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    VehicleType,
    VehicleMake,
    VehicleModel,
    VehicleYear,
    DriverSex,
    DriverLicenseStatus,
    StateRegistration,
    TravelDirection,
    DateFrom,
    DateTo,
}

impl FilterField {
    /// All fields in canonical order.
    pub const ALL: [FilterField; 10] = [
        Self::VehicleType,
        Self::VehicleMake,
        Self::VehicleModel,
        Self::VehicleYear,
        Self::DriverSex,
        Self::DriverLicenseStatus,
        Self::StateRegistration,
        Self::TravelDirection,
        Self::DateFrom,
        Self::DateTo,
    ];

    /// Field name as used in the JSON request body.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::VehicleType => "vehicle_type",
            Self::VehicleMake => "vehicle_make",
            Self::VehicleModel => "vehicle_model",
            Self::VehicleYear => "vehicle_year",
            Self::DriverSex => "driver_sex",
            Self::DriverLicenseStatus => "driver_license_status",
            Self::StateRegistration => "state_registration",
            Self::TravelDirection => "travel_direction",
            Self::DateFrom => "date_from",
            Self::DateTo => "date_to",
        }
    }

    /// Human-readable label for forms and reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::VehicleType => "Vehicle Type",
            Self::VehicleMake => "Vehicle Make",
            Self::VehicleModel => "Vehicle Model",
            Self::VehicleYear => "Vehicle Year",
            Self::DriverSex => "Driver Sex",
            Self::DriverLicenseStatus => "License Status",
            Self::StateRegistration => "State Registration",
            Self::TravelDirection => "Travel Direction",
            Self::DateFrom => "Date From",
            Self::DateTo => "Date To",
        }
    }

    /// Whether input for this field is upper-cased before it is stored.
    pub fn is_uppercased(self) -> bool {
        matches!(self, Self::VehicleMake | Self::VehicleModel)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for FilterField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match Self::ALL.iter().find(|field| field.wire_name() == s) {
            Some(field) => Ok(*field),
            None => bail!("unknown filter field: {s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Criteria
// ---------------------------------------------------------------------------

/// The user's current filter values. Every field defaults to `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    values: [String; 10],
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update exactly one field, leaving the others untouched.
    pub fn set(&mut self, field: FilterField, value: &str) {
        self.values[field.index()] = if field.is_uppercased() {
            value.to_uppercase()
        } else {
            value.to_string()
        };
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, field: FilterField, value: &str) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: FilterField) -> &str {
        &self.values[field.index()]
    }

    /// Iterate `(field, value)` pairs for the non-empty fields.
    pub fn active(&self) -> impl Iterator<Item = (FilterField, &str)> {
        FilterField::ALL
            .into_iter()
            .map(|field| (field, self.get(field)))
            .filter(|(_, value)| !value.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }

    /// JSON request body: the non-empty fields only, in canonical order.
    pub fn payload(&self) -> Map<String, Value> {
        self.active()
            .map(|(field, value)| (field.wire_name().to_string(), Value::String(value.to_string())))
            .collect()
    }

    /// Build criteria from a JSON object such as the dashboard's form body.
    ///
    /// Keys must be field wire names and values must be strings (`null`
    /// included, it is rejected too). Each value passes through [`set`](Self::set), so normalization still applies.
    pub fn from_json_object(object: &Map<String, Value>) -> Result<Self> {
        let mut criteria = Self::new();
        for (key, value) in object {
            let field: FilterField = key.parse()?;
            match value {
                Value::String(s) => criteria.set(field, s),
                other => bail!("filter field '{key}' must be a string, got {other}"),
            }
        }
        Ok(criteria)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
