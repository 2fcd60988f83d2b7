// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Thin uniform gateway over the store: create, equality-filtered query,
//! field-masked update, delete. The gateway performs no sorting, paging or
//! projection; callers own any ordering of the unordered results. There are
//! no retries and no timeouts here either: a failed call surfaces as
//! [`AppError::Database`] once, and a hung call hangs the caller.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Build, Day, Tire, TireEvent, TireSet, Track, UserProfile};
use firestore::paths;
use futures_util::{stream, StreamExt};
use serde::{Deserialize, Serialize};

const MAX_CONCURRENT_DB_OPS: usize = 50;

/// Generate a fresh document id.
fn new_doc_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // The emulator accepts unauthenticated connections; skip real
        // credentials when the environment variable points at one.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Generic Gateway Helpers ─────────────────────────────────

    /// Create or replace a document under an explicit id.
    async fn upsert_doc<T>(
        &self,
        collection: &'static str,
        doc_id: &str,
        doc: &T,
    ) -> Result<(), AppError>
    where
        T: Serialize + for<'de> Deserialize<'de> + Send + Sync,
    {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collection)
            .document_id(doc_id)
            .object(doc)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Create a document under a freshly generated id, returning the id.
    async fn insert_doc<T>(&self, collection: &'static str, doc: &T) -> Result<String, AppError>
    where
        T: Serialize + for<'de> Deserialize<'de> + Send + Sync,
    {
        let doc_id = new_doc_id();
        self.upsert_doc(collection, &doc_id, doc).await?;
        Ok(doc_id)
    }

    /// Query a collection with ANDed equality filters. The result order is
    /// whatever the store returns.
    async fn query_eq<T>(
        &self,
        collection: &'static str,
        filters: &[(&str, &str)],
    ) -> Result<Vec<T>, AppError>
    where
        T: for<'de> Deserialize<'de> + Send,
    {
        self.get_client()?
            .fluent()
            .select()
            .from(collection)
            .filter(|q| q.for_all(filters.iter().map(|(field, value)| q.field(*field).eq(*value))))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Fetch a single document by id.
    async fn get_doc<T>(&self, collection: &'static str, doc_id: &str) -> Result<Option<T>, AppError>
    where
        T: for<'de> Deserialize<'de> + Send,
    {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collection)
            .obj()
            .one(doc_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a single document by id.
    async fn delete_doc(&self, collection: &'static str, doc_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collection)
            .document_id(doc_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a batch of documents concurrently, best effort.
    ///
    /// Deletions are issued concurrently without a transaction; a failed
    /// deletion is logged and skipped while the rest still run. Returns the
    /// number of documents actually deleted.
    pub async fn delete_all_best_effort(
        &self,
        collection: &'static str,
        doc_ids: &[String],
    ) -> Result<usize, AppError> {
        let client = self.get_client()?;

        let results = stream::iter(doc_ids)
            .map(|doc_id| async move {
                client
                    .fluent()
                    .delete()
                    .from(collection)
                    .document_id(doc_id)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<(), AppError>>>()
            .await;

        let mut deleted = 0;
        for result in results {
            match result {
                Ok(()) => deleted += 1,
                Err(e) => tracing::warn!(error = %e, collection, "Deletion failed during fan-out"),
            }
        }

        Ok(deleted)
    }

    // ─── Track Operations ────────────────────────────────────────

    pub async fn create_track(&self, track: &Track) -> Result<String, AppError> {
        self.insert_doc(collections::TRACKS, track).await
    }

    /// All tracks owned by the given identity.
    pub async fn tracks_for_owner(&self, owner_id: &str) -> Result<Vec<Track>, AppError> {
        self.query_eq(collections::TRACKS, &[("owner_id", owner_id)])
            .await
    }

    /// Merge-update the editable track fields, leaving the rest untouched.
    pub async fn update_track(&self, track_id: &str, track: &Track) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(paths!(Track::{name, location, notes}))
            .in_col(collections::TRACKS)
            .document_id(track_id)
            .object(track)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    pub async fn delete_track(&self, track_id: &str) -> Result<(), AppError> {
        self.delete_doc(collections::TRACKS, track_id).await
    }

    // ─── Day Operations ──────────────────────────────────────────

    pub async fn create_day(&self, day: &Day) -> Result<String, AppError> {
        self.insert_doc(collections::DAYS, day).await
    }

    /// All days recorded at a track by the given identity.
    pub async fn days_for_track(
        &self,
        track_id: &str,
        owner_id: &str,
    ) -> Result<Vec<Day>, AppError> {
        self.query_eq(
            collections::DAYS,
            &[("track_id", track_id), ("owner_id", owner_id)],
        )
        .await
    }

    pub async fn get_day(&self, day_id: &str) -> Result<Option<Day>, AppError> {
        let day: Option<Day> = self.get_doc(collections::DAYS, day_id).await?;
        Ok(day.map(|mut d| {
            d.id.get_or_insert_with(|| day_id.to_string());
            d
        }))
    }

    /// Overwrite the editable field set of a day.
    ///
    /// `update_created_at` is set only when the user changed the date/time
    /// entry; otherwise the stored timestamp is left as it was.
    pub async fn update_day(
        &self,
        day_id: &str,
        day: &Day,
        update_created_at: bool,
    ) -> Result<(), AppError> {
        let update = self.get_client()?.fluent().update();
        let update = if update_created_at {
            update.fields(paths!(Day::{
                race_name,
                surface_condition,
                moisture_content,
                grip_level,
                groove_position,
                surface_texture,
                air_temperature,
                surface_temperature,
                humidity,
                time_of_day,
                wind_conditions,
                points_earned,
                created_at
            }))
        } else {
            update.fields(paths!(Day::{
                race_name,
                surface_condition,
                moisture_content,
                grip_level,
                groove_position,
                surface_texture,
                air_temperature,
                surface_temperature,
                humidity,
                time_of_day,
                wind_conditions,
                points_earned
            }))
        };

        let _: () = update
            .in_col(collections::DAYS)
            .document_id(day_id)
            .object(day)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    pub async fn delete_day(&self, day_id: &str) -> Result<(), AppError> {
        self.delete_doc(collections::DAYS, day_id).await
    }

    // ─── Tire Set Operations ─────────────────────────────────────

    pub async fn create_tire_set(&self, set: &TireSet) -> Result<String, AppError> {
        self.insert_doc(collections::TIRE_SETS, set).await
    }

    pub async fn tire_sets_for_owner(&self, owner_id: &str) -> Result<Vec<TireSet>, AppError> {
        self.query_eq(collections::TIRE_SETS, &[("owner_id", owner_id)])
            .await
    }

    pub async fn delete_tire_set(&self, set_id: &str) -> Result<(), AppError> {
        self.delete_doc(collections::TIRE_SETS, set_id).await
    }

    // ─── Tire Operations ─────────────────────────────────────────

    pub async fn create_tire(&self, tire: &Tire) -> Result<String, AppError> {
        self.insert_doc(collections::TIRES, tire).await
    }

    /// All tires attached to a set by the given identity.
    pub async fn tires_for_set(&self, set_id: &str, owner_id: &str) -> Result<Vec<Tire>, AppError> {
        self.query_eq(
            collections::TIRES,
            &[("set_id", set_id), ("owner_id", owner_id)],
        )
        .await
    }

    pub async fn delete_tire(&self, tire_id: &str) -> Result<(), AppError> {
        self.delete_doc(collections::TIRES, tire_id).await
    }

    // ─── Tire Event Operations ───────────────────────────────────

    pub async fn create_tire_event(&self, event: &TireEvent) -> Result<String, AppError> {
        self.insert_doc(collections::TIRE_EVENTS, event).await
    }

    /// Store a batch of tire events concurrently, best effort.
    ///
    /// Used by the "apply to all tires" mode: one create per tire, no
    /// atomicity, partial success is not distinguished from total success.
    /// Returns the number of events actually created.
    pub async fn create_tire_events(&self, events: &[TireEvent]) -> Result<usize, AppError> {
        let client = self.get_client()?;

        let results = stream::iter(events)
            .map(|event| {
                let doc_id = new_doc_id();
                async move {
                    let _: () = client
                        .fluent()
                        .update()
                        .in_col(collections::TIRE_EVENTS)
                        .document_id(&doc_id)
                        .object(event)
                        .execute()
                        .await
                        .map_err(|e| AppError::Database(e.to_string()))?;
                    Ok::<_, AppError>(())
                }
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<(), AppError>>>()
            .await;

        let mut created = 0;
        for result in results {
            match result {
                Ok(()) => created += 1,
                Err(e) => tracing::warn!(error = %e, "Tire event creation failed during fan-out"),
            }
        }

        Ok(created)
    }

    /// All events recorded against a tire by the given identity.
    pub async fn events_for_tire(
        &self,
        tire_id: &str,
        owner_id: &str,
    ) -> Result<Vec<TireEvent>, AppError> {
        self.query_eq(
            collections::TIRE_EVENTS,
            &[("tire_id", tire_id), ("owner_id", owner_id)],
        )
        .await
    }

    pub async fn get_tire_event(&self, event_id: &str) -> Result<Option<TireEvent>, AppError> {
        let event: Option<TireEvent> = self.get_doc(collections::TIRE_EVENTS, event_id).await?;
        Ok(event.map(|mut e| {
            e.id.get_or_insert_with(|| event_id.to_string());
            e
        }))
    }

    /// Overwrite the editable field set of a tire event.
    pub async fn update_tire_event(
        &self,
        event_id: &str,
        event: &TireEvent,
    ) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(paths!(TireEvent::{
                outer_chemical,
                outer_amount,
                inner_chemical,
                inner_amount,
                description
            }))
            .in_col(collections::TIRE_EVENTS)
            .document_id(event_id)
            .object(event)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    pub async fn delete_tire_event(&self, event_id: &str) -> Result<(), AppError> {
        self.delete_doc(collections::TIRE_EVENTS, event_id).await
    }

    // ─── Build Operations ────────────────────────────────────────

    pub async fn create_build(&self, build: &Build) -> Result<String, AppError> {
        self.insert_doc(collections::BUILDS, build).await
    }

    pub async fn builds_for_owner(&self, owner_id: &str) -> Result<Vec<Build>, AppError> {
        self.query_eq(collections::BUILDS, &[("owner_id", owner_id)])
            .await
    }

    pub async fn delete_build(&self, build_id: &str) -> Result<(), AppError> {
        self.delete_doc(collections::BUILDS, build_id).await
    }

    // ─── Profile Operations ──────────────────────────────────────

    /// Get a profile by uid (addressed directly, never queried).
    pub async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, AppError> {
        self.get_doc(collections::USERS, uid).await
    }

    /// Create or update a profile, keyed by its owner's uid.
    pub async fn set_profile(&self, profile: &UserProfile) -> Result<(), AppError> {
        self.upsert_doc(collections::USERS, &profile.owner_id, profile)
            .await
    }
}
