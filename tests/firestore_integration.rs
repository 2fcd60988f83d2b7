// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running; set
//! FIRESTORE_EMULATOR_HOST to enable them. Each test uses a unique owner uid
//! for isolation.

use racer_ready::models::Day;
use racer_ready::services::build::SetupSurface;
use racer_ready::models::build::SetupCategory;
use racer_ready::services::tire::{TireEventForm, TireSetForm};
use racer_ready::services::track::{DayForm, TrackForm};
use racer_ready::services::{BuildService, TireService, TrackService};
use racer_ready::ui::ScriptedDialogs;

mod common;
use common::{signed_in, test_db, unique_uid};

fn track_form(name: &str) -> TrackForm {
    TrackForm {
        name: name.to_string(),
        location: "Testville".to_string(),
        notes: String::new(),
    }
}

fn day_doc(uid: &str, track_id: &str, created_at: &str, points: u32) -> Day {
    Day {
        id: None,
        track_id: track_id.to_string(),
        race_name: format!("Race at {created_at}"),
        owner_id: uid.to_string(),
        created_at: created_at.to_string(),
        surface_condition: String::new(),
        moisture_content: String::new(),
        grip_level: String::new(),
        groove_position: String::new(),
        surface_texture: String::new(),
        air_temperature: String::new(),
        surface_temperature: String::new(),
        humidity: String::new(),
        time_of_day: String::new(),
        wind_conditions: String::new(),
        points_earned: points,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TRACK TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_add_track_and_owner_scoping() {
    require_emulator!();

    let db = test_db().await;
    let u1 = unique_uid("u1");
    let u2 = unique_uid("u2");
    let session1 = signed_in(&u1);
    let session2 = signed_in(&u2);

    let mut tracks1 = TrackService::new(db.clone());
    tracks1.reload_tracks(&session1).await.unwrap();
    tracks1.add_track(&session1, &track_form("Oakhill")).await.unwrap();
    assert_eq!(tracks1.tracks().len(), 1);
    assert_eq!(tracks1.tracks()[0].name, "Oakhill");

    // Case-insensitive duplicate for the same owner is rejected without a
    // create; the list is unchanged.
    let err = tracks1
        .add_track(&session1, &track_form("oakhill"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("already exists"));
    tracks1.reload_tracks(&session1).await.unwrap();
    assert_eq!(tracks1.tracks().len(), 1);

    // The same name is fine for a different owner: scoping is per-owner.
    let mut tracks2 = TrackService::new(db.clone());
    tracks2.reload_tracks(&session2).await.unwrap();
    assert!(tracks2.tracks().is_empty());
    tracks2.add_track(&session2, &track_form("oakhill")).await.unwrap();
    assert_eq!(tracks2.tracks().len(), 1);
}

#[tokio::test]
async fn test_delete_track_cascades_to_days() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid("cascade");
    let session = signed_in(&uid);

    let mut tracks = TrackService::new(db.clone());
    tracks.reload_tracks(&session).await.unwrap();
    tracks.add_track(&session, &track_form("Lakeview")).await.unwrap();
    let track_id = tracks.tracks()[0].id.clone().unwrap();

    for i in 0..3 {
        let day = day_doc(&uid, &track_id, &format!("2025-01-0{}T10:00:00Z", i + 1), 0);
        db.create_day(&day).await.unwrap();
    }
    assert_eq!(db.days_for_track(&track_id, &uid).await.unwrap().len(), 3);

    let dialogs = ScriptedDialogs::new().with_confirms([true]);
    let deleted = tracks
        .delete_track(&session, &dialogs, &track_id)
        .await
        .unwrap();
    assert!(deleted);

    // Every dependent day is gone, and so is the track.
    assert!(db.days_for_track(&track_id, &uid).await.unwrap().is_empty());
    assert!(tracks.tracks().is_empty());
}

#[tokio::test]
async fn test_day_list_sorted_newest_first() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid("sort");
    let session = signed_in(&uid);

    let mut tracks = TrackService::new(db.clone());
    tracks.reload_tracks(&session).await.unwrap();
    tracks.add_track(&session, &track_form("Sorted Speedway")).await.unwrap();
    let track_id = tracks.tracks()[0].id.clone().unwrap();

    for created_at in [
        "2025-02-01T10:00:00Z",
        "2025-03-15T08:00:00Z",
        "2024-12-31T23:59:00Z",
        "2025-03-01T12:00:00Z",
    ] {
        db.create_day(&day_doc(&uid, &track_id, created_at, 0))
            .await
            .unwrap();
    }

    let days = tracks.reload_days(&session, &track_id).await.unwrap();
    assert_eq!(days.len(), 4);
    for pair in days.windows(2) {
        assert!(
            pair[0].created_at >= pair[1].created_at,
            "days not sorted newest first"
        );
    }
    assert_eq!(days[0].created_at, "2025-03-15T08:00:00Z");
}

#[tokio::test]
async fn test_add_day_via_prompt_and_edit() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid("days");
    let session = signed_in(&uid);

    let mut tracks = TrackService::new(db.clone());
    tracks.reload_tracks(&session).await.unwrap();
    tracks.add_track(&session, &track_form("Edit Park")).await.unwrap();
    let track_id = tracks.tracks()[0].id.clone().unwrap();

    let dialogs = ScriptedDialogs::new().with_prompts([Some("Club Round 1".to_string())]);
    let form = DayForm {
        surface_condition: "Dry".to_string(),
        points_earned: 12,
        ..Default::default()
    };
    assert!(tracks
        .add_day(&session, &dialogs, &track_id, &form)
        .await
        .unwrap());

    let days = tracks.days().to_vec();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0].race_name, "Club Round 1");
    assert_eq!(days[0].surface_condition, "Dry");
    assert_eq!(days[0].points_earned, 12);

    // Full overwrite of the editable set; timestamp untouched without a new
    // date/time entry.
    let day = days[0].clone();
    let edited = DayForm {
        race_name: "Club Round 1 (wet)".to_string(),
        surface_condition: "Wet".to_string(),
        points_earned: 0,
        ..Default::default()
    };
    tracks.edit_day(&session, &day, &edited, None).await.unwrap();

    let days = tracks.days().to_vec();
    assert_eq!(days[0].race_name, "Club Round 1 (wet)");
    assert_eq!(days[0].surface_condition, "Wet");
    assert_eq!(days[0].points_earned, 0);
    assert_eq!(days[0].created_at, day.created_at);
}

#[tokio::test]
async fn test_points_standings() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid("points");
    let session = signed_in(&uid);

    let mut tracks = TrackService::new(db.clone());
    tracks.reload_tracks(&session).await.unwrap();
    tracks.add_track(&session, &track_form("Points Raceway")).await.unwrap();
    let track_id = tracks.tracks()[0].id.clone().unwrap();

    db.create_day(&day_doc(&uid, &track_id, "2025-01-01T10:00:00Z", 10))
        .await
        .unwrap();
    db.create_day(&day_doc(&uid, &track_id, "2025-01-02T10:00:00Z", 0))
        .await
        .unwrap();
    db.create_day(&day_doc(&uid, &track_id, "2025-01-03T10:00:00Z", 5))
        .await
        .unwrap();

    let standings = tracks.standings(&session, &track_id).await.unwrap();
    assert_eq!(standings.total, 15);
    assert_eq!(standings.days.len(), 2);
    assert!(standings.days.iter().all(|d| d.points_earned > 0));
}

// ═══════════════════════════════════════════════════════════════════════════
// TIRE TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_tire_limit_enforced_at_quantity() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid("limit");
    let session = signed_in(&uid);

    let mut tires = TireService::new(db.clone());
    tires.reload_sets(&session).await.unwrap();
    tires
        .add_set(
            &session,
            &TireSetForm {
                set_name: "Race Set".to_string(),
                brand: "MG".to_string(),
                model: "Yellow".to_string(),
                quantity: 4,
            },
        )
        .await
        .unwrap();
    let set_id = tires.sets()[0].id.clone().unwrap();

    for name in ["FL", "FR", "RL", "RR"] {
        tires.add_tire(&session, &set_id, name).await.unwrap();
    }
    assert_eq!(tires.tires().len(), 4);

    // At capacity: rejected, and no new tire document appears.
    let err = tires.add_tire(&session, &set_id, "Spare").await.unwrap_err();
    assert!(err.to_string().contains("limit"));
    assert_eq!(db.tires_for_set(&set_id, &uid).await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_apply_to_all_fans_out_one_event_per_tire() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid("fanout");
    let session = signed_in(&uid);

    let mut tires = TireService::new(db.clone());
    tires.reload_sets(&session).await.unwrap();
    tires
        .add_set(
            &session,
            &TireSetForm {
                set_name: "Fanout Set".to_string(),
                brand: "Vega".to_string(),
                model: "Blue".to_string(),
                quantity: 3,
            },
        )
        .await
        .unwrap();
    let set_id = tires.sets()[0].id.clone().unwrap();

    for name in ["A", "B", "C"] {
        tires.add_tire(&session, &set_id, name).await.unwrap();
    }
    let tire_ids: Vec<String> = tires
        .tires()
        .iter()
        .map(|t| t.id.clone().unwrap())
        .collect();

    let form = TireEventForm {
        outer_chemical: "Track Bite".to_string(),
        outer_amount: "1 oz".to_string(),
        ..Default::default()
    };
    let created = tires
        .add_event(&session, &set_id, &tire_ids[0], &form, true)
        .await
        .unwrap();
    assert_eq!(created, 3);

    // Exactly one event per tire, all sharing one timestamp.
    let mut timestamps = Vec::new();
    for tire_id in &tire_ids {
        let events = db.events_for_tire(tire_id, &uid).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].outer_chemical, "Track Bite");
        timestamps.push(events[0].created_at.clone());
    }
    timestamps.dedup();
    assert_eq!(timestamps.len(), 1, "fan-out events share one timestamp");
}

#[tokio::test]
async fn test_latest_event_lookup() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid("latest");
    let session = signed_in(&uid);

    let mut tires = TireService::new(db.clone());
    tires.reload_sets(&session).await.unwrap();
    tires
        .add_set(
            &session,
            &TireSetForm {
                set_name: "Latest Set".to_string(),
                brand: String::new(),
                model: String::new(),
                quantity: 1,
            },
        )
        .await
        .unwrap();
    let set_id = tires.sets()[0].id.clone().unwrap();
    tires.add_tire(&session, &set_id, "Only").await.unwrap();
    let tire_id = tires.tires()[0].id.clone().unwrap();

    assert!(tires
        .latest_event_for(&session, &tire_id)
        .await
        .unwrap()
        .is_none());

    for (chemical, _) in [("First", 0), ("Second", 1)] {
        let form = TireEventForm {
            outer_chemical: chemical.to_string(),
            ..Default::default()
        };
        tires
            .add_event(&session, &set_id, &tire_id, &form, false)
            .await
            .unwrap();
        // Distinct stored timestamps for a deterministic "latest".
        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
    }

    let latest = tires
        .latest_event_for(&session, &tire_id)
        .await
        .unwrap()
        .expect("tire has events");
    assert_eq!(latest.outer_chemical, "Second");
}

// ═══════════════════════════════════════════════════════════════════════════
// BUILD TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_build_save_and_load_round_trip() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid("build");
    let session = signed_in(&uid);

    let mut surface = SetupSurface::new(SetupCategory::Kart);
    surface.set("rear_sprocket", "12").unwrap();
    surface.set("pressure_front", "11.5").unwrap();

    let mut builds = BuildService::new(db.clone());
    let dialogs = ScriptedDialogs::new().with_prompts([Some("Sunday Setup".to_string())]);
    let build_id = builds
        .save_build(&session, &dialogs, &surface)
        .await
        .unwrap()
        .expect("name entered");

    // Load into a fresh surface: cleared first, then saved keys written.
    let mut loaded = SetupSurface::new(SetupCategory::Kart);
    loaded.set("ballast", "5").unwrap();
    let name = builds
        .load_build(&session, &build_id, &mut loaded)
        .await
        .unwrap();
    assert_eq!(name, "Sunday Setup");
    assert_eq!(loaded.get("rear_sprocket"), Some("12"));
    assert_eq!(loaded.get("pressure_front"), Some("11.5"));
    assert_eq!(loaded.get("ballast"), None);

    // Delete and confirm it is gone.
    let dialogs = ScriptedDialogs::new().with_confirms([true]);
    assert!(builds
        .delete_build(&session, &dialogs, &build_id)
        .await
        .unwrap());
    assert!(builds.builds().iter().all(|b| b.id.as_deref() != Some(build_id.as_str())));
}
