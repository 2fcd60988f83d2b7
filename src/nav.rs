// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Navigation state machines for the panel stacks.
//!
//! Each feature area owns an independent stack of mutually exclusive panels.
//! Transitions and back-edges are encoded as data tables; dispatching an
//! action that has no edge from the active panel is a no-op. A stack also
//! owns its context records (current track / set / tire / entry ids) instead
//! of ambient globals.

/// Side effect requested by entering a panel, performed by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEffect {
    /// Reload the owner's track list from the store.
    ReloadTracks,
    /// Reload the owner's tire-set list from the store.
    ReloadTireSets,
}

/// A performed transition: the newly active panel plus its entry effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<P> {
    pub from: P,
    pub to: P,
    pub effect: Option<NavEffect>,
}

/// Look up the destination of `(from, action)` in an edge table.
fn find_edge<P, A>(edges: &[(P, A, P)], from: P, action: A) -> Option<P>
where
    P: Copy + PartialEq,
    A: Copy + PartialEq,
{
    edges
        .iter()
        .find(|(state, trigger, _)| *state == from && *trigger == action)
        .map(|(_, _, next)| *next)
}

/// Look up the hard-wired parent of a panel in a back-edge table.
fn find_parent<P: Copy + PartialEq>(parents: &[(P, P)], from: P) -> Option<P> {
    parents
        .iter()
        .find(|(state, _)| *state == from)
        .map(|(_, parent)| *parent)
}

// ─── Track Stack ─────────────────────────────────────────────────

/// Panels of the track feature area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackPanel {
    History,
    AddTrack,
    Details,
    DayEntry,
    TrackSettings,
    PointsStandings,
    ViewDay,
    EditDay,
}

/// Actions that can move the track stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackAction {
    OpenAdd,
    /// Successful submit of the add-track form.
    Submit,
    LoadTrack,
    OpenDayEntry,
    /// Successful save of a new day entry.
    SaveDay,
    OpenSettings,
    OpenStandings,
    ViewDay,
    EditDay,
    /// Successful save of an edited day entry.
    SaveEdit,
    Back,
}

const TRACK_EDGES: &[(TrackPanel, TrackAction, TrackPanel)] = &[
    (TrackPanel::History, TrackAction::OpenAdd, TrackPanel::AddTrack),
    (TrackPanel::AddTrack, TrackAction::Submit, TrackPanel::History),
    (TrackPanel::History, TrackAction::LoadTrack, TrackPanel::Details),
    (TrackPanel::Details, TrackAction::OpenDayEntry, TrackPanel::DayEntry),
    (TrackPanel::DayEntry, TrackAction::SaveDay, TrackPanel::Details),
    (TrackPanel::Details, TrackAction::OpenSettings, TrackPanel::TrackSettings),
    (TrackPanel::Details, TrackAction::OpenStandings, TrackPanel::PointsStandings),
    (TrackPanel::Details, TrackAction::ViewDay, TrackPanel::ViewDay),
    (TrackPanel::Details, TrackAction::EditDay, TrackPanel::EditDay),
    (TrackPanel::EditDay, TrackAction::SaveEdit, TrackPanel::Details),
];

/// Back-edges: each panel returns to its hard-wired parent.
const TRACK_PARENTS: &[(TrackPanel, TrackPanel)] = &[
    (TrackPanel::AddTrack, TrackPanel::History),
    (TrackPanel::Details, TrackPanel::History),
    (TrackPanel::DayEntry, TrackPanel::Details),
    (TrackPanel::TrackSettings, TrackPanel::Details),
    (TrackPanel::PointsStandings, TrackPanel::Details),
    (TrackPanel::ViewDay, TrackPanel::Details),
    (TrackPanel::EditDay, TrackPanel::Details),
];

fn track_entry_effect(panel: TrackPanel) -> Option<NavEffect> {
    match panel {
        TrackPanel::History => Some(NavEffect::ReloadTracks),
        _ => None,
    }
}

/// Track-area navigation stack and its context records.
#[derive(Debug)]
pub struct TrackNav {
    panel: TrackPanel,
    /// Track currently open in the details panel.
    pub current_track_id: Option<String>,
    /// Day currently open in the view/edit panels.
    pub current_day_id: Option<String>,
}

impl Default for TrackNav {
    fn default() -> Self {
        Self {
            panel: TrackPanel::History,
            current_track_id: None,
            current_day_id: None,
        }
    }
}

impl TrackNav {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panel(&self) -> TrackPanel {
        self.panel
    }

    /// Apply an action. Returns the transition when one of the documented
    /// edges matched; any other `(panel, action)` pair is a no-op.
    pub fn dispatch(&mut self, action: TrackAction) -> Option<Transition<TrackPanel>> {
        let next = if action == TrackAction::Back {
            find_parent(TRACK_PARENTS, self.panel)?
        } else {
            find_edge(TRACK_EDGES, self.panel, action)?
        };

        let from = self.panel;
        self.panel = next;
        if next == TrackPanel::History {
            self.current_track_id = None;
        }
        if next != TrackPanel::ViewDay && next != TrackPanel::EditDay {
            self.current_day_id = None;
        }

        Some(Transition {
            from,
            to: next,
            effect: track_entry_effect(next),
        })
    }
}

// ─── Tire Stack ──────────────────────────────────────────────────

/// Panels of the tire feature area (one level deeper than the track stack).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TirePanel {
    History,
    AddSet,
    SetDetails,
    TireDetails,
    AddEvent,
    ViewEvent,
    EditEvent,
}

/// Actions that can move the tire stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TireAction {
    OpenAdd,
    /// Successful submit of the add-set form.
    Submit,
    LoadSet,
    LoadTire,
    OpenAddEvent,
    /// Successful save of a new event.
    SaveEvent,
    ViewEvent,
    EditEvent,
    /// Successful save of an edited event.
    SaveEdit,
    Back,
}

const TIRE_EDGES: &[(TirePanel, TireAction, TirePanel)] = &[
    (TirePanel::History, TireAction::OpenAdd, TirePanel::AddSet),
    (TirePanel::AddSet, TireAction::Submit, TirePanel::History),
    (TirePanel::History, TireAction::LoadSet, TirePanel::SetDetails),
    (TirePanel::SetDetails, TireAction::LoadTire, TirePanel::TireDetails),
    (TirePanel::TireDetails, TireAction::OpenAddEvent, TirePanel::AddEvent),
    (TirePanel::AddEvent, TireAction::SaveEvent, TirePanel::TireDetails),
    (TirePanel::TireDetails, TireAction::ViewEvent, TirePanel::ViewEvent),
    (TirePanel::TireDetails, TireAction::EditEvent, TirePanel::EditEvent),
    (TirePanel::EditEvent, TireAction::SaveEdit, TirePanel::TireDetails),
];

const TIRE_PARENTS: &[(TirePanel, TirePanel)] = &[
    (TirePanel::AddSet, TirePanel::History),
    (TirePanel::SetDetails, TirePanel::History),
    (TirePanel::TireDetails, TirePanel::SetDetails),
    (TirePanel::AddEvent, TirePanel::TireDetails),
    (TirePanel::ViewEvent, TirePanel::TireDetails),
    (TirePanel::EditEvent, TirePanel::TireDetails),
];

fn tire_entry_effect(panel: TirePanel) -> Option<NavEffect> {
    match panel {
        TirePanel::History => Some(NavEffect::ReloadTireSets),
        _ => None,
    }
}

/// Tire-area navigation stack and its context records.
#[derive(Debug)]
pub struct TireNav {
    panel: TirePanel,
    pub current_set_id: Option<String>,
    pub current_tire_id: Option<String>,
    pub current_event_id: Option<String>,
}

impl Default for TireNav {
    fn default() -> Self {
        Self {
            panel: TirePanel::History,
            current_set_id: None,
            current_tire_id: None,
            current_event_id: None,
        }
    }
}

impl TireNav {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panel(&self) -> TirePanel {
        self.panel
    }

    /// Apply an action. Undocumented `(panel, action)` pairs are a no-op.
    pub fn dispatch(&mut self, action: TireAction) -> Option<Transition<TirePanel>> {
        let next = if action == TireAction::Back {
            find_parent(TIRE_PARENTS, self.panel)?
        } else {
            find_edge(TIRE_EDGES, self.panel, action)?
        };

        let from = self.panel;
        self.panel = next;
        if next == TirePanel::History {
            self.current_set_id = None;
        }
        if next == TirePanel::History || next == TirePanel::SetDetails {
            self.current_tire_id = None;
        }
        if next != TirePanel::ViewEvent && next != TirePanel::EditEvent {
            self.current_event_id = None;
        }

        Some(Transition {
            from,
            to: next,
            effect: tire_entry_effect(next),
        })
    }
}

// ─── Build Flow ──────────────────────────────────────────────────

/// Panels of the build feature area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPanel {
    /// Load-saved vs create-new choice menu.
    Choice,
    /// Kart vs tire category menu.
    Category,
    /// The setup edit surface.
    Setup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildAction {
    CreateNew,
    PickCategory,
    Back,
}

const BUILD_EDGES: &[(BuildPanel, BuildAction, BuildPanel)] = &[
    (BuildPanel::Choice, BuildAction::CreateNew, BuildPanel::Category),
    (BuildPanel::Category, BuildAction::PickCategory, BuildPanel::Setup),
];

const BUILD_PARENTS: &[(BuildPanel, BuildPanel)] = &[
    (BuildPanel::Category, BuildPanel::Choice),
    (BuildPanel::Setup, BuildPanel::Category),
];

/// Build-area navigation stack.
#[derive(Debug, Default)]
pub struct BuildNav {
    panel: BuildPanel,
}

impl Default for BuildPanel {
    fn default() -> Self {
        BuildPanel::Choice
    }
}

impl BuildNav {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panel(&self) -> BuildPanel {
        self.panel
    }

    /// Switching into the build section resets the flow to the choice menu.
    pub fn reset(&mut self) {
        self.panel = BuildPanel::Choice;
    }

    pub fn dispatch(&mut self, action: BuildAction) -> Option<Transition<BuildPanel>> {
        let next = if action == BuildAction::Back {
            find_parent(BUILD_PARENTS, self.panel)?
        } else {
            find_edge(BUILD_EDGES, self.panel, action)?
        };

        let from = self.panel;
        self.panel = next;
        Some(Transition {
            from,
            to: next,
            effect: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_stack_starts_in_history() {
        assert_eq!(TrackNav::new().panel(), TrackPanel::History);
    }

    #[test]
    fn test_track_documented_edges() {
        let mut nav = TrackNav::new();

        let t = nav.dispatch(TrackAction::OpenAdd).unwrap();
        assert_eq!(t.to, TrackPanel::AddTrack);
        assert_eq!(t.effect, None);

        let t = nav.dispatch(TrackAction::Submit).unwrap();
        assert_eq!(t.to, TrackPanel::History);
        assert_eq!(t.effect, Some(NavEffect::ReloadTracks));

        nav.current_track_id = Some("t1".to_string());
        assert_eq!(nav.dispatch(TrackAction::LoadTrack).unwrap().to, TrackPanel::Details);

        for (action, expected) in [
            (TrackAction::OpenDayEntry, TrackPanel::DayEntry),
            (TrackAction::OpenSettings, TrackPanel::TrackSettings),
            (TrackAction::OpenStandings, TrackPanel::PointsStandings),
            (TrackAction::ViewDay, TrackPanel::ViewDay),
            (TrackAction::EditDay, TrackPanel::EditDay),
        ] {
            assert_eq!(nav.dispatch(action).unwrap().to, expected);
            let back = nav.dispatch(TrackAction::Back).unwrap();
            assert_eq!(back.to, TrackPanel::Details);
        }

        assert_eq!(nav.dispatch(TrackAction::OpenDayEntry).unwrap().to, TrackPanel::DayEntry);
        assert_eq!(nav.dispatch(TrackAction::SaveDay).unwrap().to, TrackPanel::Details);
    }

    #[test]
    fn test_track_undocumented_edges_are_noops() {
        let mut nav = TrackNav::new();

        // No day entry reachable from history.
        assert!(nav.dispatch(TrackAction::OpenDayEntry).is_none());
        assert_eq!(nav.panel(), TrackPanel::History);

        // No back edge out of the root panel.
        assert!(nav.dispatch(TrackAction::Back).is_none());

        nav.dispatch(TrackAction::OpenAdd).unwrap();
        assert!(nav.dispatch(TrackAction::OpenStandings).is_none());
        assert_eq!(nav.panel(), TrackPanel::AddTrack);
    }

    #[test]
    fn test_back_returns_to_history_and_clears_context() {
        let mut nav = TrackNav::new();
        nav.current_track_id = Some("t1".to_string());
        nav.dispatch(TrackAction::LoadTrack).unwrap();

        let t = nav.dispatch(TrackAction::Back).unwrap();
        assert_eq!(t.to, TrackPanel::History);
        assert_eq!(t.effect, Some(NavEffect::ReloadTracks));
        assert!(nav.current_track_id.is_none());
    }

    #[test]
    fn test_day_context_cleared_on_leaving_view() {
        let mut nav = TrackNav::new();
        nav.current_track_id = Some("t1".to_string());
        nav.dispatch(TrackAction::LoadTrack).unwrap();
        nav.current_day_id = Some("d1".to_string());
        nav.dispatch(TrackAction::ViewDay).unwrap();
        assert_eq!(nav.current_day_id.as_deref(), Some("d1"));

        nav.dispatch(TrackAction::Back).unwrap();
        assert!(nav.current_day_id.is_none());
        // The selected track is still open.
        assert_eq!(nav.current_track_id.as_deref(), Some("t1"));
    }

    #[test]
    fn test_tire_stack_mirrors_track_one_level_deeper() {
        let mut nav = TireNav::new();
        assert_eq!(nav.panel(), TirePanel::History);

        nav.dispatch(TireAction::LoadSet).unwrap();
        assert_eq!(nav.panel(), TirePanel::SetDetails);
        nav.dispatch(TireAction::LoadTire).unwrap();
        assert_eq!(nav.panel(), TirePanel::TireDetails);
        nav.dispatch(TireAction::OpenAddEvent).unwrap();
        assert_eq!(nav.panel(), TirePanel::AddEvent);
        nav.dispatch(TireAction::SaveEvent).unwrap();
        assert_eq!(nav.panel(), TirePanel::TireDetails);

        // Walk the back-edges all the way up.
        assert_eq!(nav.dispatch(TireAction::Back).unwrap().to, TirePanel::SetDetails);
        let t = nav.dispatch(TireAction::Back).unwrap();
        assert_eq!(t.to, TirePanel::History);
        assert_eq!(t.effect, Some(NavEffect::ReloadTireSets));
    }

    #[test]
    fn test_tire_undocumented_edges_are_noops() {
        let mut nav = TireNav::new();
        assert!(nav.dispatch(TireAction::LoadTire).is_none());
        assert!(nav.dispatch(TireAction::SaveEvent).is_none());
        assert_eq!(nav.panel(), TirePanel::History);
    }

    #[test]
    fn test_build_flow_and_reset() {
        let mut nav = BuildNav::new();
        assert_eq!(nav.panel(), BuildPanel::Choice);

        nav.dispatch(BuildAction::CreateNew).unwrap();
        nav.dispatch(BuildAction::PickCategory).unwrap();
        assert_eq!(nav.panel(), BuildPanel::Setup);

        assert_eq!(nav.dispatch(BuildAction::Back).unwrap().to, BuildPanel::Category);

        nav.dispatch(BuildAction::PickCategory).unwrap();
        nav.reset();
        assert_eq!(nav.panel(), BuildPanel::Choice);
    }
}
