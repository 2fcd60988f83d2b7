// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Track and race-day models.

use serde::{Deserialize, Serialize};

/// A karting track the owner visits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Document id, populated on reads.
    #[serde(alias = "_firestore_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub notes: String,
    /// Owning identity uid.
    pub owner_id: String,
    /// RFC3339 UTC.
    pub created_at: String,
}

/// One recorded race day at a track.
///
/// Condition and weather fields are free-form and optional; absent fields
/// default to the empty string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Day {
    /// Document id, populated on reads.
    #[serde(alias = "_firestore_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub track_id: String,
    #[serde(default)]
    pub race_name: String,
    pub owner_id: String,
    /// RFC3339 UTC.
    pub created_at: String,

    // Track conditions
    #[serde(default)]
    pub surface_condition: String,
    #[serde(default)]
    pub moisture_content: String,
    #[serde(default)]
    pub grip_level: String,
    #[serde(default)]
    pub groove_position: String,
    #[serde(default)]
    pub surface_texture: String,

    // Weather conditions
    #[serde(default)]
    pub air_temperature: String,
    #[serde(default)]
    pub surface_temperature: String,
    #[serde(default)]
    pub humidity: String,
    #[serde(default)]
    pub time_of_day: String,
    #[serde(default)]
    pub wind_conditions: String,

    /// Championship points earned; 0 when the day was not a points race.
    #[serde(default)]
    pub points_earned: u32,
}
