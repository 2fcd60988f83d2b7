// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.
//!
//! All stored timestamps are RFC3339 UTC with a `Z` suffix, so lexicographic
//! order on the stored strings matches chronological order.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current time, formatted for storage.
pub fn now_rfc3339() -> String {
    format_utc_rfc3339(Utc::now())
}

/// Parse a `YYYY-MM-DDTHH:MM` date/time entry (the shape of the original
/// datetime input) into a storable RFC3339 string. Returns `None` when the
/// entry does not parse.
pub fn parse_datetime_input(raw: &str) -> Option<String> {
    let naive = NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%dT%H:%M").ok()?;
    Some(format_utc_rfc3339(Utc.from_utc_datetime(&naive)))
}
