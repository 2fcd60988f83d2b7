// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Build feature: named setup snapshots.
//!
//! Settings are stored under the stable keys of the setup-field catalog
//! rather than display labels, so a label rename cannot orphan saved values.
//! Loading a build repopulates the edit surface; the surface's active
//! category determines which of the loaded settings are visible at once.

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::build::{field, SetupCategory};
use crate::models::Build;
use crate::session::Session;
use crate::time_utils::now_rfc3339;
use crate::ui::{prompt_build_name, Dialogs};
use std::collections::BTreeMap;

/// The setup edit surface: current values for catalog fields, plus the
/// active category that scopes what is displayed.
#[derive(Debug, Clone)]
pub struct SetupSurface {
    category: SetupCategory,
    values: BTreeMap<String, String>,
}

impl SetupSurface {
    pub fn new(category: SetupCategory) -> Self {
        Self {
            category,
            values: BTreeMap::new(),
        }
    }

    pub fn category(&self) -> SetupCategory {
        self.category
    }

    /// Switch the active category; entered values are kept.
    pub fn switch_category(&mut self, category: SetupCategory) {
        self.category = category;
    }

    /// Set a field's current value. A blank value clears the field; an
    /// unknown key is rejected.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if field(key).is_none() {
            return Err(AppError::Validation(format!("Unknown setup field: {key}")));
        }
        let value = value.trim();
        if value.is_empty() {
            self.values.remove(key);
        } else {
            self.values.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Snapshot of every value-bearing field, for saving.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.values.clone()
    }
}

/// Build feature module.
pub struct BuildService {
    db: FirestoreDb,
    /// Last-fetched build list.
    builds: Vec<Build>,
}

impl BuildService {
    pub fn new(db: FirestoreDb) -> Self {
        Self {
            db,
            builds: Vec::new(),
        }
    }

    pub fn builds(&self) -> &[Build] {
        &self.builds
    }

    /// Reload the owner's build list from the store.
    pub async fn reload(&mut self, session: &Session) -> Result<&[Build]> {
        let user = session.require_user()?;
        self.builds = self.db.builds_for_owner(&user.uid).await?;
        Ok(&self.builds)
    }

    /// Save the surface as a named build. The name comes from the dedicated
    /// naming dialog; cancelling aborts with nothing saved.
    pub async fn save_build(
        &mut self,
        session: &Session,
        dialogs: &dyn Dialogs,
        surface: &SetupSurface,
    ) -> Result<Option<String>> {
        let user = session.require_user()?;

        let Some(name) = prompt_build_name(dialogs) else {
            return Ok(None);
        };

        let build = Build {
            id: None,
            name,
            settings: surface.snapshot(),
            owner_id: user.uid.clone(),
            created_at: now_rfc3339(),
        };
        let build_id = self.db.create_build(&build).await?;
        tracing::info!(build_id, settings = build.settings.len(), "Build saved");

        self.reload(session).await?;
        Ok(Some(build_id))
    }

    /// Load a saved build into the surface.
    ///
    /// Fetches the owner's builds and searches client-side by id. The
    /// surface is cleared first, then only keys present in the saved map are
    /// written; keys no longer in the catalog are dropped. Returns the
    /// build's name.
    pub async fn load_build(
        &mut self,
        session: &Session,
        build_id: &str,
        surface: &mut SetupSurface,
    ) -> Result<String> {
        self.reload(session).await?;

        let build = self
            .builds
            .iter()
            .find(|b| b.id.as_deref() == Some(build_id))
            .ok_or_else(|| AppError::NotFound("Build".to_string()))?
            .clone();

        surface.clear();
        for (key, value) in &build.settings {
            if field(key).is_some() {
                surface.set(key, value)?;
            } else {
                tracing::debug!(key, "Dropping saved setting with unknown key");
            }
        }

        Ok(build.name)
    }

    /// Delete a build after confirmation.
    pub async fn delete_build(
        &mut self,
        session: &Session,
        dialogs: &dyn Dialogs,
        build_id: &str,
    ) -> Result<bool> {
        session.require_user()?;

        if !dialogs.confirm(
            "Are you sure you want to delete this build?",
            "Delete Build",
            "\u{26a0}",
        ) {
            return Ok(false);
        }

        self.db.delete_build(build_id).await?;
        self.reload(session).await?;
        Ok(true)
    }
}
