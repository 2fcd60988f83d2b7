// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tire feature: sets, individual tires and chemical-application events.
//!
//! A set declares a capacity (`quantity`); adding a tire counts the existing
//! records first and refuses at capacity. The count-then-create sequence is
//! not atomic against another session, which is accepted behavior. The
//! "apply to all tires" event write is a concurrent best-effort fan-out with
//! no rollback.

use crate::db::{collections, FirestoreDb};
use crate::error::{AppError, Result};
use crate::models::{Tire, TireEvent, TireSet};
use crate::session::Session;
use crate::time_utils::now_rfc3339;
use crate::ui::Dialogs;
use validator::Validate;

/// Add form for a tire set.
#[derive(Debug, Default, Clone, Validate)]
pub struct TireSetForm {
    #[validate(length(min = 1, message = "Please enter a set name."))]
    pub set_name: String,
    pub brand: String,
    pub model: String,
    #[validate(range(min = 1, max = 4, message = "Quantity must be between 1 and 4."))]
    pub quantity: u32,
}

/// The editable field set of a tire event.
#[derive(Debug, Default, Clone)]
pub struct TireEventForm {
    pub outer_chemical: String,
    pub outer_amount: String,
    pub inner_chemical: String,
    pub inner_amount: String,
    pub description: String,
}

/// Whether a set holding `existing` tires has reached its declared capacity.
pub fn set_is_full(existing: usize, quantity: u32) -> bool {
    existing >= quantity as usize
}

/// The most recent event of a tire, by stored timestamp.
pub fn latest_event(events: &[TireEvent]) -> Option<&TireEvent> {
    events.iter().max_by(|a, b| a.created_at.cmp(&b.created_at))
}

/// Sort events most recent first.
pub fn sort_events_newest_first(events: &mut [TireEvent]) {
    events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Build the "apply to all" fan-out: one event per tire, all sharing one
/// timestamp and one chemical/description payload.
pub fn build_fanout_events(
    tires: &[Tire],
    form: &TireEventForm,
    owner_id: &str,
    created_at: &str,
) -> Vec<TireEvent> {
    tires
        .iter()
        .filter_map(|tire| tire.id.as_deref())
        .map(|tire_id| TireEvent {
            id: None,
            tire_id: tire_id.to_string(),
            outer_chemical: form.outer_chemical.clone(),
            outer_amount: form.outer_amount.clone(),
            inner_chemical: form.inner_chemical.clone(),
            inner_amount: form.inner_amount.clone(),
            description: form.description.clone(),
            owner_id: owner_id.to_string(),
            created_at: created_at.to_string(),
        })
        .collect()
}

fn check(form: &impl Validate) -> Result<()> {
    form.validate()
        .map_err(|e| AppError::Validation(e.to_string()))
}

/// Tire feature module.
pub struct TireService {
    db: FirestoreDb,
    /// Last-fetched set list.
    sets: Vec<TireSet>,
    /// Last-fetched tire list for the currently open set.
    tires: Vec<Tire>,
    /// Last-fetched event list for the currently open tire.
    events: Vec<TireEvent>,
}

impl TireService {
    pub fn new(db: FirestoreDb) -> Self {
        Self {
            db,
            sets: Vec::new(),
            tires: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn sets(&self) -> &[TireSet] {
        &self.sets
    }

    pub fn tires(&self) -> &[Tire] {
        &self.tires
    }

    pub fn events(&self) -> &[TireEvent] {
        &self.events
    }

    pub fn set(&self, set_id: &str) -> Option<&TireSet> {
        self.sets.iter().find(|s| s.id.as_deref() == Some(set_id))
    }

    pub fn tire(&self, tire_id: &str) -> Option<&Tire> {
        self.tires.iter().find(|t| t.id.as_deref() == Some(tire_id))
    }

    /// Reload the owner's tire-set list from the store.
    pub async fn reload_sets(&mut self, session: &Session) -> Result<&[TireSet]> {
        let user = session.require_user()?;
        self.sets = self.db.tire_sets_for_owner(&user.uid).await?;
        Ok(&self.sets)
    }

    pub async fn add_set(&mut self, session: &Session, form: &TireSetForm) -> Result<()> {
        let user = session.require_user()?;

        let form = TireSetForm {
            set_name: form.set_name.trim().to_string(),
            brand: form.brand.trim().to_string(),
            model: form.model.trim().to_string(),
            quantity: form.quantity,
        };
        check(&form)?;

        let set = TireSet {
            id: None,
            set_name: form.set_name,
            brand: form.brand,
            model: form.model,
            quantity: form.quantity,
            owner_id: user.uid.clone(),
            created_at: now_rfc3339(),
        };
        let set_id = self.db.create_tire_set(&set).await?;
        tracing::info!(set_id, "Tire set created");

        self.reload_sets(session).await?;
        Ok(())
    }

    /// Delete a set, its tires and their events.
    ///
    /// Like the track cascade: children are deleted concurrently without a
    /// transaction, and a partial failure leaves orphans behind.
    pub async fn delete_set(
        &mut self,
        session: &Session,
        dialogs: &dyn Dialogs,
        set_id: &str,
    ) -> Result<bool> {
        let user = session.require_user()?;

        if !dialogs.confirm("Delete this tire set?", "Delete Tire Set", "\u{26a0}") {
            return Ok(false);
        }

        let tires = self.db.tires_for_set(set_id, &user.uid).await?;
        let mut event_ids = Vec::new();
        for tire in &tires {
            if let Some(tire_id) = tire.id.as_deref() {
                let events = self.db.events_for_tire(tire_id, &user.uid).await?;
                event_ids.extend(events.into_iter().filter_map(|e| e.id));
            }
        }
        self.db
            .delete_all_best_effort(collections::TIRE_EVENTS, &event_ids)
            .await?;

        let tire_ids: Vec<String> = tires.into_iter().filter_map(|t| t.id).collect();
        self.db
            .delete_all_best_effort(collections::TIRES, &tire_ids)
            .await?;

        self.db.delete_tire_set(set_id).await?;
        tracing::info!(set_id, tires = tire_ids.len(), "Tire set deleted");

        self.reload_sets(session).await?;
        Ok(true)
    }

    /// Reload the tire list for a set, oldest first.
    pub async fn reload_tires(&mut self, session: &Session, set_id: &str) -> Result<&[Tire]> {
        let user = session.require_user()?;
        let mut tires = self.db.tires_for_set(set_id, &user.uid).await?;
        tires.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        self.tires = tires;
        Ok(&self.tires)
    }

    /// Add a tire to a set, refusing once the set's declared quantity is
    /// reached. The count runs against a fresh query, but nothing serializes
    /// it against a concurrent add from another session.
    pub async fn add_tire(
        &mut self,
        session: &Session,
        set_id: &str,
        tire_name: &str,
    ) -> Result<()> {
        let user = session.require_user()?;

        let tire_name = tire_name.trim();
        if tire_name.is_empty() {
            return Err(AppError::Validation("Please enter a tire name.".to_string()));
        }

        let quantity = self
            .set(set_id)
            .map(|s| s.quantity)
            .ok_or_else(|| AppError::NotFound("Tire set".to_string()))?;

        let existing = self.db.tires_for_set(set_id, &user.uid).await?;
        if set_is_full(existing.len(), quantity) {
            return Err(AppError::Validation(
                "Tire limit reached for this set.".to_string(),
            ));
        }

        let tire = Tire {
            id: None,
            tire_name: tire_name.to_string(),
            set_id: set_id.to_string(),
            owner_id: user.uid.clone(),
            created_at: now_rfc3339(),
        };
        let tire_id = self.db.create_tire(&tire).await?;
        tracing::info!(tire_id, set_id, "Tire created");

        self.reload_tires(session, set_id).await?;
        Ok(())
    }

    /// Delete a tire and its events after confirmation.
    pub async fn delete_tire(
        &mut self,
        session: &Session,
        dialogs: &dyn Dialogs,
        set_id: &str,
        tire_id: &str,
    ) -> Result<bool> {
        let user = session.require_user()?;

        if !dialogs.confirm("Delete this tire?", "Delete Tire", "\u{26a0}") {
            return Ok(false);
        }

        let events = self.db.events_for_tire(tire_id, &user.uid).await?;
        let event_ids: Vec<String> = events.into_iter().filter_map(|e| e.id).collect();
        self.db
            .delete_all_best_effort(collections::TIRE_EVENTS, &event_ids)
            .await?;

        self.db.delete_tire(tire_id).await?;
        self.reload_tires(session, set_id).await?;
        Ok(true)
    }

    /// Reload the event list for a tire, most recent first.
    pub async fn reload_events(&mut self, session: &Session, tire_id: &str) -> Result<&[TireEvent]> {
        let user = session.require_user()?;
        let mut events = self.db.events_for_tire(tire_id, &user.uid).await?;
        sort_events_newest_first(&mut events);
        self.events = events;
        Ok(&self.events)
    }

    /// The most recent event for one tire.
    pub async fn latest_event_for(
        &self,
        session: &Session,
        tire_id: &str,
    ) -> Result<Option<TireEvent>> {
        let user = session.require_user()?;
        let events = self.db.events_for_tire(tire_id, &user.uid).await?;
        Ok(latest_event(&events).cloned())
    }

    /// Record a chemical-application event.
    ///
    /// With `apply_to_all`, one event is created per tire in the set, all
    /// sharing one timestamp and payload, concurrently and best-effort:
    /// partial success is logged but not surfaced distinctly. Returns the
    /// number of events created.
    pub async fn add_event(
        &mut self,
        session: &Session,
        set_id: &str,
        tire_id: &str,
        form: &TireEventForm,
        apply_to_all: bool,
    ) -> Result<usize> {
        let user = session.require_user()?;
        let created_at = now_rfc3339();

        let created = if apply_to_all {
            let tires = self.db.tires_for_set(set_id, &user.uid).await?;
            let events = build_fanout_events(&tires, form, &user.uid, &created_at);
            let created = self.db.create_tire_events(&events).await?;
            if created < events.len() {
                tracing::warn!(
                    set_id,
                    expected = events.len(),
                    created,
                    "Apply-to-all fan-out partially failed"
                );
            }
            created
        } else {
            let event = TireEvent {
                id: None,
                tire_id: tire_id.to_string(),
                outer_chemical: form.outer_chemical.clone(),
                outer_amount: form.outer_amount.clone(),
                inner_chemical: form.inner_chemical.clone(),
                inner_amount: form.inner_amount.clone(),
                description: form.description.clone(),
                owner_id: user.uid.clone(),
                created_at,
            };
            self.db.create_tire_event(&event).await?;
            1
        };

        self.reload_events(session, tire_id).await?;
        Ok(created)
    }

    /// Fetch one event for the view/edit panels.
    pub async fn get_event(&self, session: &Session, event_id: &str) -> Result<Option<TireEvent>> {
        session.require_user()?;
        self.db.get_tire_event(event_id).await
    }

    /// Overwrite the editable field set of an event.
    pub async fn edit_event(
        &mut self,
        session: &Session,
        event: &TireEvent,
        form: &TireEventForm,
    ) -> Result<()> {
        session.require_user()?;
        let event_id = event
            .id
            .as_deref()
            .ok_or_else(|| AppError::NotFound("Tire event".to_string()))?;

        let updated = TireEvent {
            id: None,
            tire_id: event.tire_id.clone(),
            outer_chemical: form.outer_chemical.clone(),
            outer_amount: form.outer_amount.clone(),
            inner_chemical: form.inner_chemical.clone(),
            inner_amount: form.inner_amount.clone(),
            description: form.description.clone(),
            owner_id: event.owner_id.clone(),
            created_at: event.created_at.clone(),
        };
        self.db.update_tire_event(event_id, &updated).await?;

        self.reload_events(session, &event.tire_id).await?;
        Ok(())
    }

    /// Delete one event after confirmation.
    pub async fn delete_event(
        &mut self,
        session: &Session,
        dialogs: &dyn Dialogs,
        tire_id: &str,
        event_id: &str,
    ) -> Result<bool> {
        session.require_user()?;

        if !dialogs.confirm("Delete this event?", "Delete Event", "\u{26a0}") {
            return Ok(false);
        }

        self.db.delete_tire_event(event_id).await?;
        self.reload_events(session, tire_id).await?;
        Ok(true)
    }
}
