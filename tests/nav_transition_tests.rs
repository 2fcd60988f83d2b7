// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exhaustive transition-table checks for the panel state machines: from
//! every panel, exactly the documented actions move the stack and everything
//! else is a no-op.

use racer_ready::nav::{
    NavEffect, TireAction, TireNav, TirePanel, TrackAction, TrackNav, TrackPanel,
};

const ALL_TRACK_ACTIONS: &[TrackAction] = &[
    TrackAction::OpenAdd,
    TrackAction::Submit,
    TrackAction::LoadTrack,
    TrackAction::OpenDayEntry,
    TrackAction::SaveDay,
    TrackAction::OpenSettings,
    TrackAction::OpenStandings,
    TrackAction::ViewDay,
    TrackAction::EditDay,
    TrackAction::SaveEdit,
    TrackAction::Back,
];

/// A nav stack positioned at the given panel by replaying a path from the
/// initial state.
fn track_nav_at(panel: TrackPanel) -> TrackNav {
    let path: &[TrackAction] = match panel {
        TrackPanel::History => &[],
        TrackPanel::AddTrack => &[TrackAction::OpenAdd],
        TrackPanel::Details => &[TrackAction::LoadTrack],
        TrackPanel::DayEntry => &[TrackAction::LoadTrack, TrackAction::OpenDayEntry],
        TrackPanel::TrackSettings => &[TrackAction::LoadTrack, TrackAction::OpenSettings],
        TrackPanel::PointsStandings => &[TrackAction::LoadTrack, TrackAction::OpenStandings],
        TrackPanel::ViewDay => &[TrackAction::LoadTrack, TrackAction::ViewDay],
        TrackPanel::EditDay => &[TrackAction::LoadTrack, TrackAction::EditDay],
    };

    let mut nav = TrackNav::new();
    for action in path {
        nav.dispatch(*action).expect("path action should transition");
    }
    assert_eq!(nav.panel(), panel);
    nav
}

/// The documented outgoing edges of each panel.
fn track_edges_from(panel: TrackPanel) -> Vec<(TrackAction, TrackPanel)> {
    match panel {
        TrackPanel::History => vec![
            (TrackAction::OpenAdd, TrackPanel::AddTrack),
            (TrackAction::LoadTrack, TrackPanel::Details),
        ],
        TrackPanel::AddTrack => vec![
            (TrackAction::Submit, TrackPanel::History),
            (TrackAction::Back, TrackPanel::History),
        ],
        TrackPanel::Details => vec![
            (TrackAction::OpenDayEntry, TrackPanel::DayEntry),
            (TrackAction::OpenSettings, TrackPanel::TrackSettings),
            (TrackAction::OpenStandings, TrackPanel::PointsStandings),
            (TrackAction::ViewDay, TrackPanel::ViewDay),
            (TrackAction::EditDay, TrackPanel::EditDay),
            (TrackAction::Back, TrackPanel::History),
        ],
        TrackPanel::DayEntry => vec![
            (TrackAction::SaveDay, TrackPanel::Details),
            (TrackAction::Back, TrackPanel::Details),
        ],
        TrackPanel::TrackSettings => vec![(TrackAction::Back, TrackPanel::Details)],
        TrackPanel::PointsStandings => vec![(TrackAction::Back, TrackPanel::Details)],
        TrackPanel::ViewDay => vec![(TrackAction::Back, TrackPanel::Details)],
        TrackPanel::EditDay => vec![
            (TrackAction::SaveEdit, TrackPanel::Details),
            (TrackAction::Back, TrackPanel::Details),
        ],
    }
}

#[test]
fn test_track_stack_only_documented_edges_are_reachable() {
    let panels = [
        TrackPanel::History,
        TrackPanel::AddTrack,
        TrackPanel::Details,
        TrackPanel::DayEntry,
        TrackPanel::TrackSettings,
        TrackPanel::PointsStandings,
        TrackPanel::ViewDay,
        TrackPanel::EditDay,
    ];

    for panel in panels {
        let documented = track_edges_from(panel);
        for action in ALL_TRACK_ACTIONS {
            let mut nav = track_nav_at(panel);
            let result = nav.dispatch(*action);
            match documented.iter().find(|(a, _)| a == action) {
                Some((_, expected)) => {
                    let transition = result.expect("documented edge should transition");
                    assert_eq!(transition.from, panel);
                    assert_eq!(transition.to, *expected);
                    assert_eq!(nav.panel(), *expected);
                }
                None => {
                    assert!(result.is_none(), "{:?} from {:?} should be a no-op", action, panel);
                    assert_eq!(nav.panel(), panel, "no-op must not move the stack");
                }
            }
        }
    }
}

#[test]
fn test_entering_history_requests_track_reload() {
    // Every edge into the history panel carries the reload effect.
    let mut nav = track_nav_at(TrackPanel::AddTrack);
    assert_eq!(
        nav.dispatch(TrackAction::Submit).unwrap().effect,
        Some(NavEffect::ReloadTracks)
    );

    let mut nav = track_nav_at(TrackPanel::Details);
    assert_eq!(
        nav.dispatch(TrackAction::Back).unwrap().effect,
        Some(NavEffect::ReloadTracks)
    );

    // Edges that stay below history carry no effect.
    let mut nav = track_nav_at(TrackPanel::DayEntry);
    assert_eq!(nav.dispatch(TrackAction::SaveDay).unwrap().effect, None);
}

#[test]
fn test_tire_stack_root_and_leaf_noops() {
    let mut nav = TireNav::new();

    // From the root, only add and load move.
    assert!(nav.dispatch(TireAction::OpenAddEvent).is_none());
    assert!(nav.dispatch(TireAction::SaveEdit).is_none());
    assert!(nav.dispatch(TireAction::Back).is_none());
    assert_eq!(nav.panel(), TirePanel::History);

    // Drill to the deepest level and back.
    nav.dispatch(TireAction::LoadSet).unwrap();
    nav.dispatch(TireAction::LoadTire).unwrap();
    nav.dispatch(TireAction::ViewEvent).unwrap();

    // A view panel only goes back.
    assert!(nav.dispatch(TireAction::LoadSet).is_none());
    assert!(nav.dispatch(TireAction::OpenAddEvent).is_none());
    assert_eq!(nav.dispatch(TireAction::Back).unwrap().to, TirePanel::TireDetails);

    let history = nav
        .dispatch(TireAction::Back)
        .and_then(|_| nav.dispatch(TireAction::Back))
        .unwrap();
    assert_eq!(history.to, TirePanel::History);
    assert_eq!(history.effect, Some(NavEffect::ReloadTireSets));
}

#[test]
fn test_tire_context_scoping() {
    let mut nav = TireNav::new();
    nav.current_set_id = Some("s1".to_string());
    nav.dispatch(TireAction::LoadSet).unwrap();
    nav.current_tire_id = Some("t1".to_string());
    nav.dispatch(TireAction::LoadTire).unwrap();

    // Leaving tire details keeps the set context but drops the tire.
    nav.dispatch(TireAction::Back).unwrap();
    assert_eq!(nav.current_set_id.as_deref(), Some("s1"));
    assert!(nav.current_tire_id.is_none());

    // Returning to the root drops the set too.
    nav.dispatch(TireAction::Back).unwrap();
    assert!(nav.current_set_id.is_none());
}
