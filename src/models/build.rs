// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Build (setup snapshot) model and the setup-field catalog.
//!
//! Saved settings are keyed by the stable `key` of a catalog field, never by
//! its display label, so renaming a label cannot orphan stored values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named snapshot of setup values, keyed by [`SetupField::key`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Build {
    /// Document id, populated on reads.
    #[serde(alias = "_firestore_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
    pub owner_id: String,
    /// RFC3339 UTC.
    pub created_at: String,
}

/// Adjustment category a setup field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetupCategory {
    Kart,
    Tire,
}

impl SetupCategory {
    pub fn title(self) -> &'static str {
        match self {
            SetupCategory::Kart => "Kart Adjustments",
            SetupCategory::Tire => "Tire Adjustments",
        }
    }
}

/// One configurable setup field.
///
/// `key` is the storage identity; `label` and `unit` are presentation only.
#[derive(Debug, Clone, Copy)]
pub struct SetupField {
    pub key: &'static str,
    pub label: &'static str,
    /// Unit suffix appended to the raw value for display, including its own
    /// spacing (`"12" + " PSI"`, `"55" + "% Front"`).
    pub unit: &'static str,
    pub category: SetupCategory,
}

impl SetupField {
    /// Render a raw value with the field's unit suffix.
    pub fn format_value(&self, raw: &str) -> String {
        format!("{}{}", raw, self.unit)
    }
}

/// The full catalog of configurable setup fields.
pub const SETUP_FIELDS: &[SetupField] = &[
    // Kart adjustments
    SetupField { key: "rear_sprocket", label: "Rear Sprocket", unit: "T", category: SetupCategory::Kart },
    SetupField { key: "caster", label: "Caster Angle", unit: "\u{b0}", category: SetupCategory::Kart },
    SetupField { key: "camber", label: "Camber", unit: "\u{b0}", category: SetupCategory::Kart },
    SetupField { key: "ride_height", label: "Ride Height", unit: "mm", category: SetupCategory::Kart },
    SetupField { key: "front_track_width", label: "Front Track Width", unit: "mm", category: SetupCategory::Kart },
    SetupField { key: "seat_position", label: "Seat Position", unit: "mm", category: SetupCategory::Kart },
    SetupField { key: "ballast", label: "Ballast", unit: "kg", category: SetupCategory::Kart },
    SetupField { key: "rev_limit", label: "Rev Limit", unit: " RPM", category: SetupCategory::Kart },
    SetupField { key: "weight_distribution", label: "Weight Distribution", unit: "% Front", category: SetupCategory::Kart },
    // Tire adjustments
    SetupField { key: "pressure_front", label: "Front Tire Pressure", unit: " PSI", category: SetupCategory::Tire },
    SetupField { key: "pressure_rear", label: "Rear Tire Pressure", unit: " PSI", category: SetupCategory::Tire },
    SetupField { key: "stagger", label: "Stagger", unit: "mm", category: SetupCategory::Tire },
    SetupField { key: "compound", label: "Compound", unit: "", category: SetupCategory::Tire },
];

/// Look up a catalog field by its stable key.
pub fn field(key: &str) -> Option<&'static SetupField> {
    SETUP_FIELDS.iter().find(|f| f.key == key)
}

/// All catalog fields in the given category, in catalog order.
pub fn fields_in(category: SetupCategory) -> impl Iterator<Item = &'static SetupField> {
    SETUP_FIELDS.iter().filter(move |f| f.category == category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_unique() {
        for (i, a) in SETUP_FIELDS.iter().enumerate() {
            for b in &SETUP_FIELDS[i + 1..] {
                assert_ne!(a.key, b.key, "duplicate setup key {}", a.key);
            }
        }
    }

    #[test]
    fn test_format_value_units() {
        assert_eq!(field("rear_sprocket").unwrap().format_value("12"), "12T");
        assert_eq!(field("rev_limit").unwrap().format_value("14500"), "14500 RPM");
        assert_eq!(field("pressure_front").unwrap().format_value("11.5"), "11.5 PSI");
        assert_eq!(field("weight_distribution").unwrap().format_value("43"), "43% Front");
        assert_eq!(field("compound").unwrap().format_value("MG Yellow"), "MG Yellow");
    }

    #[test]
    fn test_every_category_has_fields() {
        assert!(fields_in(SetupCategory::Kart).count() > 0);
        assert!(fields_in(SetupCategory::Tire).count() > 0);
    }
}
