// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plain-text rendering of list and detail panels.
//!
//! Pure string builders; the shell prints whatever they return. Every list
//! render replaces the whole panel, and empty results render an explicit
//! empty-state line.

use crate::models::build::{fields_in, SetupCategory};
use crate::models::{Build, Day, Tire, TireEvent, TireSet, Track, UserProfile};
use crate::services::build::SetupSurface;
use crate::services::track::Standings;

/// Render a stored RFC3339 timestamp for display.
fn display_time(ts: &str) -> String {
    ts.trim_end_matches('Z').replace('T', " ")
}

pub fn render_track_list(tracks: &[Track]) -> String {
    if tracks.is_empty() {
        return "No tracks added yet.".to_string();
    }

    let mut out = String::new();
    for (i, track) in tracks.iter().enumerate() {
        out.push_str(&format!("[{}] {}\n", i + 1, track.name));
        if !track.location.is_empty() {
            out.push_str(&format!("    Location: {}\n", track.location));
        }
        out.push_str(&format!("    Saved: {}\n", display_time(&track.created_at)));
    }
    out
}

/// One-line condition summary for a day card.
fn day_conditions(day: &Day) -> String {
    let mut conditions = Vec::new();
    if !day.surface_condition.is_empty() {
        conditions.push(format!("Surface: {}", day.surface_condition));
    }
    if !day.grip_level.is_empty() {
        conditions.push(format!("Grip: {}", day.grip_level));
    }
    if !day.time_of_day.is_empty() {
        conditions.push(format!("Time: {}", day.time_of_day));
    }
    conditions.join(" \u{2022} ")
}

pub fn render_day_list(days: &[Day]) -> String {
    if days.is_empty() {
        return "No days recorded yet.".to_string();
    }

    let mut out = String::new();
    for (i, day) in days.iter().enumerate() {
        let race_name = if day.race_name.is_empty() {
            "Day Entry"
        } else {
            day.race_name.as_str()
        };
        out.push_str(&format!("[{}] {}\n", i + 1, race_name));
        out.push_str(&format!("    {}\n", display_time(&day.created_at)));
        let conditions = day_conditions(day);
        if !conditions.is_empty() {
            out.push_str(&format!("    {}\n", conditions));
        }
    }
    out
}

/// Full view of one day entry; empty fields are skipped.
pub fn render_day_details(day: &Day) -> String {
    let mut out = String::new();
    if !day.race_name.is_empty() {
        out.push_str(&format!("{}\n", day.race_name));
    }
    out.push_str(&format!("Recorded: {}\n", display_time(&day.created_at)));

    out.push_str("\nTrack Conditions\n");
    for (label, value) in [
        ("Surface Condition", &day.surface_condition),
        ("Moisture Content", &day.moisture_content),
        ("Grip Level", &day.grip_level),
        ("Groove Position", &day.groove_position),
        ("Surface Texture", &day.surface_texture),
    ] {
        if !value.is_empty() {
            out.push_str(&format!("  {}: {}\n", label, value));
        }
    }

    out.push_str("\nWeather Conditions\n");
    for (label, value) in [
        ("Air Temperature", &day.air_temperature),
        ("Surface Temperature", &day.surface_temperature),
        ("Humidity", &day.humidity),
        ("Time of Day", &day.time_of_day),
        ("Wind Conditions", &day.wind_conditions),
    ] {
        if !value.is_empty() {
            out.push_str(&format!("  {}: {}\n", label, value));
        }
    }

    if day.points_earned > 0 {
        out.push_str(&format!("\nPoints earned: {}\n", day.points_earned));
    }
    out
}

pub fn render_standings(standings: &Standings) -> String {
    if standings.days.is_empty() {
        return "No points earned at this track yet.".to_string();
    }

    let mut out = String::new();
    for day in &standings.days {
        let race_name = if day.race_name.is_empty() {
            "Day Entry"
        } else {
            day.race_name.as_str()
        };
        out.push_str(&format!(
            "{:>4}  {}  ({})\n",
            day.points_earned,
            race_name,
            display_time(&day.created_at)
        ));
    }
    out.push_str(&format!("Total points: {}\n", standings.total));
    out
}

pub fn render_set_list(sets: &[TireSet]) -> String {
    if sets.is_empty() {
        return "No tire sets added yet.".to_string();
    }

    let mut out = String::new();
    for (i, set) in sets.iter().enumerate() {
        out.push_str(&format!(
            "[{}] {} ({} {}, {} tires)\n",
            i + 1,
            set.set_name,
            set.brand,
            set.model,
            set.quantity
        ));
        out.push_str(&format!("    Saved: {}\n", display_time(&set.created_at)));
    }
    out
}

/// Tire list with each tire's most recent event, when one exists.
pub fn render_tire_list(tires: &[Tire], latest: &[Option<TireEvent>]) -> String {
    if tires.is_empty() {
        return "No tires added to this set yet.".to_string();
    }

    let mut out = String::new();
    for (i, tire) in tires.iter().enumerate() {
        out.push_str(&format!("[{}] {}\n", i + 1, tire.tire_name));
        match latest.get(i).and_then(|e| e.as_ref()) {
            Some(event) => out.push_str(&format!(
                "    Last event: {} ({})\n",
                event_summary(event),
                display_time(&event.created_at)
            )),
            None => out.push_str("    No events recorded.\n"),
        }
    }
    out
}

fn event_summary(event: &TireEvent) -> String {
    if !event.outer_chemical.is_empty() {
        event.outer_chemical.clone()
    } else if !event.inner_chemical.is_empty() {
        event.inner_chemical.clone()
    } else if !event.description.is_empty() {
        event.description.clone()
    } else {
        "Event".to_string()
    }
}

pub fn render_event_list(events: &[TireEvent]) -> String {
    if events.is_empty() {
        return "No events recorded yet.".to_string();
    }

    let mut out = String::new();
    for (i, event) in events.iter().enumerate() {
        out.push_str(&format!(
            "[{}] {}  ({})\n",
            i + 1,
            event_summary(event),
            display_time(&event.created_at)
        ));
    }
    out
}

/// Full view of one tire event; empty fields are skipped.
pub fn render_event_details(event: &TireEvent) -> String {
    let mut out = String::new();
    out.push_str(&format!("Recorded: {}\n", display_time(&event.created_at)));
    for (label, value) in [
        ("Outer Chemical", &event.outer_chemical),
        ("Outer Amount", &event.outer_amount),
        ("Inner Chemical", &event.inner_chemical),
        ("Inner Amount", &event.inner_amount),
        ("Description", &event.description),
    ] {
        if !value.is_empty() {
            out.push_str(&format!("  {}: {}\n", label, value));
        }
    }
    out
}

pub fn render_build_list(builds: &[Build]) -> String {
    if builds.is_empty() {
        return "No saved builds yet. Create and save a build to see it here!".to_string();
    }

    let mut out = String::new();
    for (i, build) in builds.iter().enumerate() {
        out.push_str(&format!("[{}] {}\n", i + 1, build.name));
        out.push_str(&format!("    Saved: {}\n", display_time(&build.created_at)));
        out.push_str(&format!("    {} settings configured\n", build.settings.len()));
    }
    out
}

/// The edit surface for one category: every catalog field with its current
/// value, formatted with the field's unit.
pub fn render_surface(surface: &SetupSurface) -> String {
    let mut out = format!("{}\n", surface.category().title());
    for (i, field) in fields_in(surface.category()).enumerate() {
        let value = match surface.get(field.key) {
            Some(raw) => field.format_value(raw),
            None => "-".to_string(),
        };
        out.push_str(&format!("[{}] {}: {}\n", i + 1, field.label, value));
    }
    out
}

pub fn render_profile(profile: &UserProfile) -> String {
    let mut out = String::new();
    for (label, value) in [
        ("Display Name", &profile.display_name),
        ("Date of Birth", &profile.dob),
        ("Racing Team", &profile.racing_team),
        ("Kart Number", &profile.kart_number),
        ("Racing Class", &profile.racing_class),
    ] {
        if !value.is_empty() {
            out.push_str(&format!("  {}: {}\n", label, value));
        }
    }
    if profile.profile_picture_data_uri.is_some() {
        out.push_str("  Profile picture: set\n");
    }
    if out.is_empty() {
        out.push_str("  (profile is empty)\n");
    }
    out
}

/// Categories offered on the build category menu, in display order.
pub const BUILD_CATEGORIES: &[SetupCategory] = &[SetupCategory::Kart, SetupCategory::Tire];
