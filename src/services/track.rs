// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Track feature: tracks, race-day records and points standings.
//!
//! The service owns the last-fetched track and day lists. The duplicate-name
//! check runs against that cache, not a fresh query, so a name added from
//! another session after the last reload can slip through; that matches the
//! store's accepted semantics.

use crate::db::{collections, FirestoreDb};
use crate::error::{AppError, Result};
use crate::models::{Day, Track};
use crate::session::Session;
use crate::time_utils::now_rfc3339;
use crate::ui::Dialogs;
use validator::Validate;

/// Add/edit form for a track.
#[derive(Debug, Default, Clone, Validate)]
pub struct TrackForm {
    #[validate(length(min = 1, message = "Please enter a track name."))]
    pub name: String,
    pub location: String,
    pub notes: String,
}

/// The editable field set of a day entry. Absent condition and weather
/// fields stay empty strings.
#[derive(Debug, Default, Clone)]
pub struct DayForm {
    pub race_name: String,
    pub surface_condition: String,
    pub moisture_content: String,
    pub grip_level: String,
    pub groove_position: String,
    pub surface_texture: String,
    pub air_temperature: String,
    pub surface_temperature: String,
    pub humidity: String,
    pub time_of_day: String,
    pub wind_conditions: String,
    pub points_earned: u32,
}

/// Points standings for one track: only days that earned points, most
/// recent first.
#[derive(Debug, Clone)]
pub struct Standings {
    pub total: u32,
    pub days: Vec<Day>,
}

/// Case-insensitive duplicate check against an already-loaded track list.
pub fn has_duplicate_name(tracks: &[Track], candidate: &str) -> bool {
    let candidate = candidate.to_lowercase();
    tracks.iter().any(|t| t.name.to_lowercase() == candidate)
}

/// Sort days most recent first. The store returns results unordered, so
/// ordering is always applied here, never assumed.
pub fn sort_days_newest_first(days: &mut [Day]) {
    days.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Standings over a day list: zero-point days appear in neither the list
/// nor the total.
pub fn compute_standings(mut days: Vec<Day>) -> Standings {
    days.retain(|d| d.points_earned > 0);
    sort_days_newest_first(&mut days);
    let total = days.iter().map(|d| d.points_earned).sum();
    Standings { total, days }
}

/// Parse a points entry; absent or unparsable input counts as 0.
pub fn parse_points(raw: &str) -> u32 {
    raw.trim().parse().unwrap_or(0)
}

fn check(form: &impl Validate) -> Result<()> {
    form.validate()
        .map_err(|e| AppError::Validation(e.to_string()))
}

/// Track feature module.
pub struct TrackService {
    db: FirestoreDb,
    /// Last-fetched track list.
    tracks: Vec<Track>,
    /// Last-fetched day list for the currently open track.
    days: Vec<Day>,
}

impl TrackService {
    pub fn new(db: FirestoreDb) -> Self {
        Self {
            db,
            tracks: Vec::new(),
            days: Vec::new(),
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub fn track(&self, track_id: &str) -> Option<&Track> {
        self.tracks
            .iter()
            .find(|t| t.id.as_deref() == Some(track_id))
    }

    /// Reload the owner's track list from the store.
    pub async fn reload_tracks(&mut self, session: &Session) -> Result<&[Track]> {
        let user = session.require_user()?;
        self.tracks = self.db.tracks_for_owner(&user.uid).await?;
        Ok(&self.tracks)
    }

    /// Add a track. Rejects an empty name and a case-insensitive duplicate
    /// of a name in the cached list, without calling the store.
    pub async fn add_track(&mut self, session: &Session, form: &TrackForm) -> Result<()> {
        let user = session.require_user()?;

        let form = TrackForm {
            name: form.name.trim().to_string(),
            location: form.location.trim().to_string(),
            notes: form.notes.trim().to_string(),
        };
        check(&form)?;

        if has_duplicate_name(&self.tracks, &form.name) {
            return Err(AppError::Validation("Track already exists.".to_string()));
        }

        let track = Track {
            id: None,
            name: form.name,
            location: form.location,
            notes: form.notes,
            owner_id: user.uid.clone(),
            created_at: now_rfc3339(),
        };
        let track_id = self.db.create_track(&track).await?;
        tracing::info!(track_id, "Track created");

        self.reload_tracks(session).await?;
        Ok(())
    }

    /// Save the track-settings panel: name, location and notes.
    pub async fn update_track(
        &mut self,
        session: &Session,
        track_id: &str,
        form: &TrackForm,
    ) -> Result<()> {
        let user = session.require_user()?;
        check(form)?;

        let track = Track {
            id: None,
            name: form.name.trim().to_string(),
            location: form.location.trim().to_string(),
            notes: form.notes.trim().to_string(),
            owner_id: user.uid.clone(),
            created_at: String::new(),
        };
        self.db.update_track(track_id, &track).await?;

        self.reload_tracks(session).await?;
        Ok(())
    }

    /// Delete a track and every day recorded at it.
    ///
    /// Child deletions are issued concurrently without a transaction; a
    /// partial failure leaves orphaned day records behind, which is accepted
    /// behavior. Returns `false` when the user declined the confirmation.
    pub async fn delete_track(
        &mut self,
        session: &Session,
        dialogs: &dyn Dialogs,
        track_id: &str,
    ) -> Result<bool> {
        let user = session.require_user()?;

        if !dialogs.confirm("Delete this track?", "Delete Track", "\u{26a0}") {
            return Ok(false);
        }

        let days = self.db.days_for_track(track_id, &user.uid).await?;
        let day_ids: Vec<String> = days.into_iter().filter_map(|d| d.id).collect();
        let deleted = self
            .db
            .delete_all_best_effort(collections::DAYS, &day_ids)
            .await?;
        if deleted < day_ids.len() {
            tracing::warn!(
                track_id,
                expected = day_ids.len(),
                deleted,
                "Cascade left orphaned day records"
            );
        }

        self.db.delete_track(track_id).await?;
        tracing::info!(track_id, days = deleted, "Track deleted");

        self.reload_tracks(session).await?;
        Ok(true)
    }

    /// Reload the day list for a track, most recent first.
    pub async fn reload_days(&mut self, session: &Session, track_id: &str) -> Result<&[Day]> {
        let user = session.require_user()?;
        let mut days = self.db.days_for_track(track_id, &user.uid).await?;
        sort_days_newest_first(&mut days);
        self.days = days;
        Ok(&self.days)
    }

    /// Record a new day at a track. The race name comes from a prompt;
    /// cancelling the prompt aborts the save with no record created.
    pub async fn add_day(
        &mut self,
        session: &Session,
        dialogs: &dyn Dialogs,
        track_id: &str,
        form: &DayForm,
    ) -> Result<bool> {
        let user = session.require_user()?;

        let Some(race_name) =
            dialogs.prompt_text("Enter the name of this race/session:", "Race Name", "\u{1f3c1}")
        else {
            return Ok(false);
        };

        let day = Day {
            id: None,
            track_id: track_id.to_string(),
            race_name,
            owner_id: user.uid.clone(),
            created_at: now_rfc3339(),
            surface_condition: form.surface_condition.clone(),
            moisture_content: form.moisture_content.clone(),
            grip_level: form.grip_level.clone(),
            groove_position: form.groove_position.clone(),
            surface_texture: form.surface_texture.clone(),
            air_temperature: form.air_temperature.clone(),
            surface_temperature: form.surface_temperature.clone(),
            humidity: form.humidity.clone(),
            time_of_day: form.time_of_day.clone(),
            wind_conditions: form.wind_conditions.clone(),
            points_earned: form.points_earned,
        };
        let day_id = self.db.create_day(&day).await?;
        tracing::info!(day_id, track_id, "Day entry created");

        self.reload_days(session, track_id).await?;
        Ok(true)
    }

    /// Fetch one day for the view/edit panels.
    pub async fn get_day(&self, session: &Session, day_id: &str) -> Result<Option<Day>> {
        session.require_user()?;
        self.db.get_day(day_id).await
    }

    /// Overwrite the editable field set of a day. The stored timestamp is
    /// only touched when the user entered a new date/time.
    pub async fn edit_day(
        &mut self,
        session: &Session,
        day: &Day,
        form: &DayForm,
        new_created_at: Option<String>,
    ) -> Result<()> {
        session.require_user()?;
        let day_id = day
            .id
            .as_deref()
            .ok_or_else(|| AppError::NotFound("Day entry".to_string()))?;

        let updated = Day {
            id: None,
            track_id: day.track_id.clone(),
            race_name: form.race_name.clone(),
            owner_id: day.owner_id.clone(),
            created_at: new_created_at
                .clone()
                .unwrap_or_else(|| day.created_at.clone()),
            surface_condition: form.surface_condition.clone(),
            moisture_content: form.moisture_content.clone(),
            grip_level: form.grip_level.clone(),
            groove_position: form.groove_position.clone(),
            surface_texture: form.surface_texture.clone(),
            air_temperature: form.air_temperature.clone(),
            surface_temperature: form.surface_temperature.clone(),
            humidity: form.humidity.clone(),
            time_of_day: form.time_of_day.clone(),
            wind_conditions: form.wind_conditions.clone(),
            points_earned: form.points_earned,
        };
        self.db
            .update_day(day_id, &updated, new_created_at.is_some())
            .await?;
        tracing::info!(day_id, "Day entry updated");

        self.reload_days(session, &day.track_id).await?;
        Ok(())
    }

    /// Delete one day entry after confirmation.
    pub async fn delete_day(
        &mut self,
        session: &Session,
        dialogs: &dyn Dialogs,
        track_id: &str,
        day_id: &str,
    ) -> Result<bool> {
        session.require_user()?;

        if !dialogs.confirm("Delete this day entry?", "Delete Day", "\u{26a0}") {
            return Ok(false);
        }

        self.db.delete_day(day_id).await?;
        self.reload_days(session, track_id).await?;
        Ok(true)
    }

    /// Points standings for a track.
    pub async fn standings(&self, session: &Session, track_id: &str) -> Result<Standings> {
        let user = session.require_user()?;
        let days = self.db.days_for_track(track_id, &user.uid).await?;
        Ok(compute_standings(days))
    }
}
