// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fail-fast ordering tests.
//!
//! The offline mock store errors on every call, so an `Ok` result or any
//! non-`Database` error proves the operation bailed out before reaching the
//! store: identity checks, validation and dialog cancels all come first.

use racer_ready::error::AppError;
use racer_ready::models::build::SetupCategory;
use racer_ready::services::build::SetupSurface;
use racer_ready::services::tire::TireSetForm;
use racer_ready::services::track::{DayForm, TrackForm};
use racer_ready::services::{BuildService, ProfileService, TireService, TrackService};
use racer_ready::session::Session;
use racer_ready::ui::ScriptedDialogs;

mod common;
use common::{signed_in, test_db_offline};

#[tokio::test]
async fn test_signed_out_fails_before_any_store_call() {
    let session = Session::new();

    let mut tracks = TrackService::new(test_db_offline());
    assert!(matches!(
        tracks.reload_tracks(&session).await,
        Err(AppError::NotSignedIn)
    ));
    assert!(matches!(
        tracks.add_track(&session, &TrackForm::default()).await,
        Err(AppError::NotSignedIn)
    ));

    let mut tires = TireService::new(test_db_offline());
    assert!(matches!(
        tires.reload_sets(&session).await,
        Err(AppError::NotSignedIn)
    ));

    let mut builds = BuildService::new(test_db_offline());
    assert!(matches!(
        builds.reload(&session).await,
        Err(AppError::NotSignedIn)
    ));

    let profile = ProfileService::new(test_db_offline());
    assert!(matches!(
        profile.load(&session).await,
        Err(AppError::NotSignedIn)
    ));
}

#[tokio::test]
async fn test_blank_track_name_rejected_before_store() {
    let session = signed_in("guard-user");
    let mut tracks = TrackService::new(test_db_offline());

    let form = TrackForm {
        name: "   ".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        tracks.add_track(&session, &form).await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn test_cancelled_race_name_prompt_aborts_save() {
    let session = signed_in("guard-user");
    let mut tracks = TrackService::new(test_db_offline());

    // The prompt resolves None; no day record is created at all.
    let dialogs = ScriptedDialogs::new().with_prompts([None]);
    let saved = tracks
        .add_day(&session, &dialogs, "track-1", &DayForm::default())
        .await
        .unwrap();
    assert!(!saved);
}

#[tokio::test]
async fn test_declined_confirms_are_noops() {
    let session = signed_in("guard-user");

    let mut tracks = TrackService::new(test_db_offline());
    let dialogs = ScriptedDialogs::new(); // every confirm answers false
    assert!(!tracks
        .delete_track(&session, &dialogs, "track-1")
        .await
        .unwrap());
    assert!(!tracks
        .delete_day(&session, &dialogs, "track-1", "day-1")
        .await
        .unwrap());

    let mut tires = TireService::new(test_db_offline());
    assert!(!tires.delete_set(&session, &dialogs, "set-1").await.unwrap());
    assert!(!tires
        .delete_tire(&session, &dialogs, "set-1", "tire-1")
        .await
        .unwrap());
    assert!(!tires
        .delete_event(&session, &dialogs, "tire-1", "event-1")
        .await
        .unwrap());

    let mut builds = BuildService::new(test_db_offline());
    assert!(!builds
        .delete_build(&session, &dialogs, "build-1")
        .await
        .unwrap());
}

#[tokio::test]
async fn test_cancelled_build_name_aborts_save() {
    let session = signed_in("guard-user");
    let mut builds = BuildService::new(test_db_offline());
    let surface = SetupSurface::new(SetupCategory::Kart);

    let dialogs = ScriptedDialogs::new().with_prompts([None]);
    assert!(builds
        .save_build(&session, &dialogs, &surface)
        .await
        .unwrap()
        .is_none());

    // A blank submission re-prompts (one alert), then the cancel aborts.
    let dialogs = ScriptedDialogs::new().with_prompts([Some("  ".to_string()), None]);
    assert!(builds
        .save_build(&session, &dialogs, &surface)
        .await
        .unwrap()
        .is_none());
    assert_eq!(dialogs.alerts().len(), 1);
}

#[tokio::test]
async fn test_tire_set_validation_before_store() {
    let session = signed_in("guard-user");
    let mut tires = TireService::new(test_db_offline());

    // Quantity outside 1..=4.
    let form = TireSetForm {
        set_name: "Set".to_string(),
        quantity: 5,
        ..Default::default()
    };
    assert!(matches!(
        tires.add_set(&session, &form).await,
        Err(AppError::Validation(_))
    ));

    // Unknown set: resolved against the cached list before any count query.
    assert!(matches!(
        tires.add_tire(&session, "missing-set", "FL").await,
        Err(AppError::NotFound(_))
    ));

    // Blank tire name.
    let err = tires.add_tire(&session, "missing-set", "   ").await;
    assert!(matches!(err, Err(AppError::Validation(_))));
}
