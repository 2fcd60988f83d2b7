// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Tire set, tire and maintenance-event models.

use serde::{Deserialize, Serialize};

/// A purchased group of tires sharing brand and model.
///
/// `quantity` is the declared capacity of the set; the number of [`Tire`]
/// records attached to the set never intentionally exceeds it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TireSet {
    /// Document id, populated on reads.
    #[serde(alias = "_firestore_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub set_name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    /// Declared capacity, 1..=4.
    pub quantity: u32,
    pub owner_id: String,
    /// RFC3339 UTC.
    pub created_at: String,
}

/// A single tire within a set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tire {
    /// Document id, populated on reads.
    #[serde(alias = "_firestore_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub tire_name: String,
    pub set_id: String,
    pub owner_id: String,
    /// RFC3339 UTC.
    pub created_at: String,
}

/// A chemical-application event recorded against a tire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TireEvent {
    /// Document id, populated on reads.
    #[serde(alias = "_firestore_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub tire_id: String,
    #[serde(default)]
    pub outer_chemical: String,
    #[serde(default)]
    pub outer_amount: String,
    #[serde(default)]
    pub inner_chemical: String,
    #[serde(default)]
    pub inner_amount: String,
    #[serde(default)]
    pub description: String,
    pub owner_id: String,
    /// RFC3339 UTC.
    pub created_at: String,
}
