// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Terminal application shell.
//!
//! One synchronous loop per feature section: render the active panel, read
//! one command, dispatch the matching navigation action and perform its
//! entry effect. Store and identity failures are reported through a single
//! error-to-alert mapping and control returns to the active panel. Because
//! the loop is sequential there are no in-flight renders to guard against.

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::build::SetupCategory;
use crate::models::{Day, TireEvent};
use crate::nav::{
    BuildAction, BuildNav, BuildPanel, NavEffect, TireAction, TireNav, TirePanel, TrackAction,
    TrackNav, TrackPanel,
};
use crate::services::profile::ProfileForm;
use crate::services::tire::{TireEventForm, TireSetForm};
use crate::services::track::{parse_points, DayForm, TrackForm};
use crate::services::{BuildService, IdentityClient, ProfileService, SetupSurface, TireService, TrackService};
use crate::session::Session;
use crate::time_utils::parse_datetime_input;
use crate::ui::render;
use crate::ui::{Dialogs, TerminalDialogs};
use std::io::{self, BufRead, Write};

/// Read one line from stdin; `None` on EOF.
fn read_line() -> Option<String> {
    let mut line = String::new();
    io::stdout().flush().ok();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        Err(_) => None,
    }
}

/// Split a panel command into its verb and an optional 1-based index.
fn split_cmd(line: &str) -> (String, Option<usize>) {
    let mut parts = line.split_whitespace();
    let cmd = parts.next().unwrap_or("").to_lowercase();
    let index = parts.next().and_then(|s| s.parse::<usize>().ok());
    (cmd, index)
}

/// The application: session, navigation stacks and feature modules.
pub struct App {
    session: Session,
    identity: IdentityClient,
    dialogs: TerminalDialogs,
    tracks: TrackService,
    tires: TireService,
    builds: BuildService,
    profile: ProfileService,
    track_nav: TrackNav,
    tire_nav: TireNav,
    build_nav: BuildNav,
    surface: SetupSurface,
}

impl App {
    pub fn new(db: FirestoreDb, identity: IdentityClient) -> Self {
        Self {
            session: Session::new(),
            identity,
            dialogs: TerminalDialogs,
            tracks: TrackService::new(db.clone()),
            tires: TireService::new(db.clone()),
            builds: BuildService::new(db.clone()),
            profile: ProfileService::new(db),
            track_nav: TrackNav::new(),
            tire_nav: TireNav::new(),
            build_nav: BuildNav::new(),
            surface: SetupSurface::new(SetupCategory::Kart),
        }
    }

    /// Sign in, then run the section loop until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        if !self.sign_in_flow().await {
            return Ok(());
        }

        let mut enter_build_at_category = false;
        loop {
            if enter_build_at_category {
                enter_build_at_category = false;
                self.run_build_section(false).await;
                continue;
            }

            println!("\n=== Racer Ready ===");
            println!("[1] Track History  [2] Tire History  [3] Build  [4] Saved Builds  [5] Profile  [q] Quit");
            print!("> ");
            let Some(line) = read_line() else { break };
            match line.trim() {
                "1" => self.run_track_section().await,
                "2" => self.run_tire_section().await,
                "3" => self.run_build_section(true).await,
                "4" => {
                    if self.run_saved_builds_section().await {
                        // A loaded build resumes editing at the category menu.
                        self.build_nav.reset();
                        self.build_nav.dispatch(BuildAction::CreateNew);
                        enter_build_at_category = true;
                    }
                }
                "5" => self.run_profile_section().await,
                "q" | "quit" => break,
                _ => {}
            }
        }

        self.session.sign_out();
        Ok(())
    }

    // ─── Error Reporting ─────────────────────────────────────────

    /// One alert per failure, per the error taxonomy. Store and internal
    /// failures are logged and shown generically; the rest carry their own
    /// message.
    fn report(&self, err: &AppError) {
        match err {
            AppError::NotSignedIn => {
                self.dialogs
                    .alert("Please log in first.", "Not Logged In", "\u{26a0}")
            }
            AppError::Validation(msg) => self.dialogs.alert(msg, "Invalid Input", "\u{26a0}"),
            AppError::NotFound(what) => {
                self.dialogs
                    .alert(&format!("{} not found.", what), "Not Found", "\u{274c}")
            }
            AppError::WrongPassword => {
                self.dialogs
                    .alert("Wrong current password.", "Reauthentication Failed", "\u{26a0}")
            }
            AppError::EmailInUse => {
                self.dialogs
                    .alert("That email is already in use.", "Email In Use", "\u{26a0}")
            }
            AppError::Identity(msg) => self.dialogs.alert(msg, "Account Error", "\u{274c}"),
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                self.dialogs
                    .alert("Something went wrong. Please try again.", "Error", "\u{274c}");
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                self.dialogs
                    .alert("Something went wrong. Please try again.", "Error", "\u{274c}");
            }
        }
    }

    async fn perform_effect(&mut self, effect: Option<NavEffect>) {
        let result = match effect {
            Some(NavEffect::ReloadTracks) => {
                self.tracks.reload_tracks(&self.session).await.map(|_| ())
            }
            Some(NavEffect::ReloadTireSets) => {
                self.tires.reload_sets(&self.session).await.map(|_| ())
            }
            None => return,
        };
        if let Err(e) = result {
            self.report(&e);
        }
    }

    // ─── Sign-In ─────────────────────────────────────────────────

    /// Email/password sign-in or sign-up; `false` when the user bails out.
    async fn sign_in_flow(&mut self) -> bool {
        loop {
            println!("\n[1] Sign in  [2] Create account  [q] Quit");
            print!("> ");
            let Some(choice) = read_line() else { return false };
            let sign_up = match choice.trim() {
                "1" => false,
                "2" => true,
                "q" | "quit" => return false,
                _ => continue,
            };

            let Some(email) = self.dialogs.prompt_text("Email address:", "Sign In", "\u{1f464}")
            else {
                continue;
            };
            let Some(password) = self.dialogs.prompt_text("Password:", "Sign In", "\u{1f511}")
            else {
                continue;
            };

            let result = if sign_up {
                self.identity.sign_up(&email, &password).await
            } else {
                self.identity.sign_in(&email, &password).await
            };

            match result {
                Ok(user) => {
                    println!("Welcome, {}!", user.email);
                    self.session.sign_in(user);
                    return true;
                }
                Err(e) => self.report(&e),
            }
        }
    }

    // ─── Field Entry Helpers ─────────────────────────────────────

    fn read_field(&self, label: &str) -> String {
        print!("{} (enter to skip): ", label);
        read_line().unwrap_or_default().trim().to_string()
    }

    fn read_field_with_default(&self, label: &str, current: &str) -> String {
        print!("{} [{}]: ", label, current);
        let entered = read_line().unwrap_or_default().trim().to_string();
        if entered.is_empty() {
            current.to_string()
        } else {
            entered
        }
    }

    fn read_day_form(&self) -> DayForm {
        println!("Track conditions:");
        let surface_condition = self.read_field("  Surface condition");
        let moisture_content = self.read_field("  Moisture content");
        let grip_level = self.read_field("  Grip level");
        let groove_position = self.read_field("  Groove position");
        let surface_texture = self.read_field("  Surface texture");
        println!("Weather conditions:");
        let air_temperature = self.read_field("  Air temperature");
        let surface_temperature = self.read_field("  Surface temperature");
        let humidity = self.read_field("  Humidity");
        let time_of_day = self.read_field("  Time of day");
        let wind_conditions = self.read_field("  Wind conditions");
        let points_earned = parse_points(&self.read_field("Points earned"));

        DayForm {
            race_name: String::new(),
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
        }
    }

    fn read_day_form_with_defaults(&self, day: &Day) -> DayForm {
        let race_name = self.read_field_with_default("Race name", &day.race_name);
        println!("Track conditions:");
        let surface_condition =
            self.read_field_with_default("  Surface condition", &day.surface_condition);
        let moisture_content =
            self.read_field_with_default("  Moisture content", &day.moisture_content);
        let grip_level = self.read_field_with_default("  Grip level", &day.grip_level);
        let groove_position =
            self.read_field_with_default("  Groove position", &day.groove_position);
        let surface_texture =
            self.read_field_with_default("  Surface texture", &day.surface_texture);
        println!("Weather conditions:");
        let air_temperature =
            self.read_field_with_default("  Air temperature", &day.air_temperature);
        let surface_temperature =
            self.read_field_with_default("  Surface temperature", &day.surface_temperature);
        let humidity = self.read_field_with_default("  Humidity", &day.humidity);
        let time_of_day = self.read_field_with_default("  Time of day", &day.time_of_day);
        let wind_conditions =
            self.read_field_with_default("  Wind conditions", &day.wind_conditions);
        let points_earned = parse_points(&self.read_field_with_default(
            "Points earned",
            &day.points_earned.to_string(),
        ));

        DayForm {
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
        }
    }

    fn read_event_form(&self) -> TireEventForm {
        TireEventForm {
            outer_chemical: self.read_field("Outer chemical"),
            outer_amount: self.read_field("Outer amount"),
            inner_chemical: self.read_field("Inner chemical"),
            inner_amount: self.read_field("Inner amount"),
            description: self.read_field("Description"),
        }
    }

    fn read_event_form_with_defaults(&self, event: &TireEvent) -> TireEventForm {
        TireEventForm {
            outer_chemical: self.read_field_with_default("Outer chemical", &event.outer_chemical),
            outer_amount: self.read_field_with_default("Outer amount", &event.outer_amount),
            inner_chemical: self.read_field_with_default("Inner chemical", &event.inner_chemical),
            inner_amount: self.read_field_with_default("Inner amount", &event.inner_amount),
            description: self.read_field_with_default("Description", &event.description),
        }
    }

    // ─── Track Section ───────────────────────────────────────────

    async fn run_track_section(&mut self) {
        self.track_nav = TrackNav::new();
        self.perform_effect(Some(NavEffect::ReloadTracks)).await;

        loop {
            match self.track_nav.panel() {
                TrackPanel::History => {
                    println!("\n\u{2014} Track History \u{2014}");
                    println!("{}", render::render_track_list(self.tracks.tracks()));
                    println!("[a] add  [l <n>] load  [d <n>] delete  [b] back");
                    print!("> ");
                    let Some(line) = read_line() else { return };
                    let (cmd, index) = split_cmd(&line);
                    match cmd.as_str() {
                        "a" => {
                            self.track_nav.dispatch(TrackAction::OpenAdd);
                        }
                        "l" => {
                            if let Some(track_id) = self.nth_track_id(index) {
                                self.track_nav.current_track_id = Some(track_id.clone());
                                self.track_nav.dispatch(TrackAction::LoadTrack);
                                if let Err(e) =
                                    self.tracks.reload_days(&self.session, &track_id).await
                                {
                                    self.report(&e);
                                }
                            }
                        }
                        "d" => {
                            if let Some(track_id) = self.nth_track_id(index) {
                                if let Err(e) = self
                                    .tracks
                                    .delete_track(&self.session, &self.dialogs, &track_id)
                                    .await
                                {
                                    self.report(&e);
                                }
                            }
                        }
                        "b" => return,
                        _ => {}
                    }
                }
                TrackPanel::AddTrack => {
                    println!("\n\u{2014} Add Track \u{2014}");
                    let form = TrackForm {
                        name: self.read_field("Track name"),
                        location: self.read_field("Location"),
                        notes: self.read_field("Notes"),
                    };
                    match self.tracks.add_track(&self.session, &form).await {
                        Ok(()) => {
                            self.track_nav.dispatch(TrackAction::Submit);
                        }
                        Err(e) => {
                            self.report(&e);
                            self.track_nav.dispatch(TrackAction::Back);
                        }
                    }
                }
                TrackPanel::Details => self.run_track_details().await,
                TrackPanel::DayEntry => {
                    println!("\n\u{2014} Day Entry \u{2014}");
                    let form = self.read_day_form();
                    let Some(track_id) = self.track_nav.current_track_id.clone() else {
                        self.track_nav.dispatch(TrackAction::Back);
                        continue;
                    };
                    match self
                        .tracks
                        .add_day(&self.session, &self.dialogs, &track_id, &form)
                        .await
                    {
                        Ok(true) => {
                            self.dialogs.alert(
                                "Day entry saved successfully!",
                                "Success",
                                "\u{2705}",
                            );
                            self.track_nav.dispatch(TrackAction::SaveDay);
                        }
                        // Race-name prompt cancelled: nothing saved, back to details.
                        Ok(false) => {
                            self.track_nav.dispatch(TrackAction::Back);
                        }
                        Err(e) => {
                            self.report(&e);
                            self.track_nav.dispatch(TrackAction::Back);
                        }
                    }
                }
                TrackPanel::TrackSettings => self.run_track_settings().await,
                TrackPanel::PointsStandings => self.run_points_standings().await,
                TrackPanel::ViewDay => self.run_view_day().await,
                TrackPanel::EditDay => self.run_edit_day().await,
            }
        }
    }

    fn nth_track_id(&self, index: Option<usize>) -> Option<String> {
        let index = index?.checked_sub(1)?;
        self.tracks.tracks().get(index).and_then(|t| t.id.clone())
    }

    fn nth_day_id(&self, index: Option<usize>) -> Option<String> {
        let index = index?.checked_sub(1)?;
        self.tracks.days().get(index).and_then(|d| d.id.clone())
    }

    async fn run_track_details(&mut self) {
        let Some(track_id) = self.track_nav.current_track_id.clone() else {
            self.track_nav.dispatch(TrackAction::Back);
            return;
        };
        let title = self
            .tracks
            .track(&track_id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| "Track".to_string());

        println!("\n\u{2014} {} \u{2014}", title);
        println!("{}", render::render_day_list(self.tracks.days()));
        println!("[n] new day  [v <n>] view  [e <n>] edit  [x <n>] delete  [s] settings  [p] standings  [b] back");
        print!("> ");
        let Some(line) = read_line() else {
            self.track_nav.dispatch(TrackAction::Back);
            return;
        };
        let (cmd, index) = split_cmd(&line);
        match cmd.as_str() {
            "n" => {
                self.track_nav.dispatch(TrackAction::OpenDayEntry);
            }
            "v" => {
                if let Some(day_id) = self.nth_day_id(index) {
                    self.track_nav.current_day_id = Some(day_id);
                    self.track_nav.dispatch(TrackAction::ViewDay);
                }
            }
            "e" => {
                if let Some(day_id) = self.nth_day_id(index) {
                    self.track_nav.current_day_id = Some(day_id);
                    self.track_nav.dispatch(TrackAction::EditDay);
                }
            }
            "x" => {
                if let Some(day_id) = self.nth_day_id(index) {
                    if let Err(e) = self
                        .tracks
                        .delete_day(&self.session, &self.dialogs, &track_id, &day_id)
                        .await
                    {
                        self.report(&e);
                    }
                }
            }
            "s" => {
                self.track_nav.dispatch(TrackAction::OpenSettings);
            }
            "p" => {
                self.track_nav.dispatch(TrackAction::OpenStandings);
            }
            "b" => {
                let transition = self.track_nav.dispatch(TrackAction::Back);
                if let Some(t) = transition {
                    self.perform_effect(t.effect).await;
                }
            }
            _ => {}
        }
    }

    async fn run_track_settings(&mut self) {
        let Some(track_id) = self.track_nav.current_track_id.clone() else {
            self.track_nav.dispatch(TrackAction::Back);
            return;
        };
        let Some(track) = self.tracks.track(&track_id).cloned() else {
            self.track_nav.dispatch(TrackAction::Back);
            return;
        };

        println!("\n\u{2014} Track Settings \u{2014}");
        println!("  Name: {}\n  Location: {}\n  Notes: {}", track.name, track.location, track.notes);
        println!("[e] edit  [b] back");
        print!("> ");
        let Some(line) = read_line() else {
            self.track_nav.dispatch(TrackAction::Back);
            return;
        };
        match split_cmd(&line).0.as_str() {
            "e" => {
                let form = TrackForm {
                    name: self.read_field_with_default("Name", &track.name),
                    location: self.read_field_with_default("Location", &track.location),
                    notes: self.read_field_with_default("Notes", &track.notes),
                };
                match self.tracks.update_track(&self.session, &track_id, &form).await {
                    Ok(()) => self.dialogs.alert("Track updated.", "Success", "\u{2705}"),
                    Err(e) => self.report(&e),
                }
            }
            "b" => {
                self.track_nav.dispatch(TrackAction::Back);
            }
            _ => {}
        }
    }

    async fn run_points_standings(&mut self) {
        let Some(track_id) = self.track_nav.current_track_id.clone() else {
            self.track_nav.dispatch(TrackAction::Back);
            return;
        };

        println!("\n\u{2014} Points Standings \u{2014}");
        match self.tracks.standings(&self.session, &track_id).await {
            Ok(standings) => println!("{}", render::render_standings(&standings)),
            Err(e) => self.report(&e),
        }
        println!("[b] back");
        print!("> ");
        let _ = read_line();
        self.track_nav.dispatch(TrackAction::Back);
    }

    async fn run_view_day(&mut self) {
        let Some(day_id) = self.track_nav.current_day_id.clone() else {
            self.track_nav.dispatch(TrackAction::Back);
            return;
        };

        match self.tracks.get_day(&self.session, &day_id).await {
            Ok(Some(day)) => {
                println!("\n\u{2014} View Day \u{2014}");
                println!("{}", render::render_day_details(&day));
                println!("[b] back");
                print!("> ");
                let _ = read_line();
            }
            // Vanished between list and view: silently return to details.
            Ok(None) => {}
            Err(e) => self.report(&e),
        }
        self.track_nav.dispatch(TrackAction::Back);
    }

    async fn run_edit_day(&mut self) {
        let Some(day_id) = self.track_nav.current_day_id.clone() else {
            self.track_nav.dispatch(TrackAction::Back);
            return;
        };

        let day = match self.tracks.get_day(&self.session, &day_id).await {
            Ok(Some(day)) => day,
            Ok(None) => {
                self.report(&AppError::NotFound("Day entry".to_string()));
                self.track_nav.dispatch(TrackAction::Back);
                return;
            }
            Err(e) => {
                self.report(&e);
                self.track_nav.dispatch(TrackAction::Back);
                return;
            }
        };

        let title = if day.race_name.is_empty() {
            "Day Entry"
        } else {
            day.race_name.as_str()
        };
        println!("\n\u{2014} Edit: {} \u{2014}", title);
        let form = self.read_day_form_with_defaults(&day);

        print!("New date/time as YYYY-MM-DDTHH:MM (enter to keep): ");
        let new_created_at = read_line()
            .unwrap_or_default()
            .trim()
            .to_string();
        let new_created_at = if new_created_at.is_empty() {
            None
        } else {
            match parse_datetime_input(&new_created_at) {
                Some(ts) => Some(ts),
                None => {
                    self.dialogs.alert(
                        "Date/time not recognized; keeping the original.",
                        "Invalid Input",
                        "\u{26a0}",
                    );
                    None
                }
            }
        };

        match self
            .tracks
            .edit_day(&self.session, &day, &form, new_created_at)
            .await
        {
            Ok(()) => {
                self.dialogs
                    .alert("Day updated successfully!", "Success", "\u{2705}");
                self.track_nav.dispatch(TrackAction::SaveEdit);
            }
            Err(e) => {
                self.report(&e);
                self.track_nav.dispatch(TrackAction::Back);
            }
        }
    }

    // ─── Tire Section ────────────────────────────────────────────

    async fn run_tire_section(&mut self) {
        self.tire_nav = TireNav::new();
        self.perform_effect(Some(NavEffect::ReloadTireSets)).await;

        loop {
            match self.tire_nav.panel() {
                TirePanel::History => {
                    println!("\n\u{2014} Tire History \u{2014}");
                    println!("{}", render::render_set_list(self.tires.sets()));
                    println!("[a] add set  [l <n>] load  [d <n>] delete  [b] back");
                    print!("> ");
                    let Some(line) = read_line() else { return };
                    let (cmd, index) = split_cmd(&line);
                    match cmd.as_str() {
                        "a" => {
                            self.tire_nav.dispatch(TireAction::OpenAdd);
                        }
                        "l" => {
                            if let Some(set_id) = self.nth_set_id(index) {
                                self.tire_nav.current_set_id = Some(set_id.clone());
                                self.tire_nav.dispatch(TireAction::LoadSet);
                                if let Err(e) = self.tires.reload_tires(&self.session, &set_id).await
                                {
                                    self.report(&e);
                                }
                            }
                        }
                        "d" => {
                            if let Some(set_id) = self.nth_set_id(index) {
                                if let Err(e) = self
                                    .tires
                                    .delete_set(&self.session, &self.dialogs, &set_id)
                                    .await
                                {
                                    self.report(&e);
                                }
                            }
                        }
                        "b" => return,
                        _ => {}
                    }
                }
                TirePanel::AddSet => {
                    println!("\n\u{2014} Add Tire Set \u{2014}");
                    let form = TireSetForm {
                        set_name: self.read_field("Set name"),
                        brand: self.read_field("Brand"),
                        model: self.read_field("Model"),
                        quantity: self
                            .read_field("Quantity (1-4)")
                            .parse()
                            .unwrap_or(0),
                    };
                    match self.tires.add_set(&self.session, &form).await {
                        Ok(()) => {
                            self.tire_nav.dispatch(TireAction::Submit);
                        }
                        Err(e) => {
                            self.report(&e);
                            self.tire_nav.dispatch(TireAction::Back);
                        }
                    }
                }
                TirePanel::SetDetails => self.run_set_details().await,
                TirePanel::TireDetails => self.run_tire_details().await,
                TirePanel::AddEvent => self.run_add_event().await,
                TirePanel::ViewEvent => self.run_view_event().await,
                TirePanel::EditEvent => self.run_edit_event().await,
            }
        }
    }

    fn nth_set_id(&self, index: Option<usize>) -> Option<String> {
        let index = index?.checked_sub(1)?;
        self.tires.sets().get(index).and_then(|s| s.id.clone())
    }

    fn nth_tire_id(&self, index: Option<usize>) -> Option<String> {
        let index = index?.checked_sub(1)?;
        self.tires.tires().get(index).and_then(|t| t.id.clone())
    }

    fn nth_event_id(&self, index: Option<usize>) -> Option<String> {
        let index = index?.checked_sub(1)?;
        self.tires.events().get(index).and_then(|e| e.id.clone())
    }

    async fn run_set_details(&mut self) {
        let Some(set_id) = self.tire_nav.current_set_id.clone() else {
            self.tire_nav.dispatch(TireAction::Back);
            return;
        };
        let title = self
            .tires
            .set(&set_id)
            .map(|s| s.set_name.clone())
            .unwrap_or_else(|| "Tire Set".to_string());

        // Latest event per tire for the list render.
        let mut latest = Vec::new();
        for tire in self.tires.tires().to_vec() {
            let event = match tire.id.as_deref() {
                Some(tire_id) => self
                    .tires
                    .latest_event_for(&self.session, tire_id)
                    .await
                    .unwrap_or_else(|e| {
                        tracing::warn!(error = %e, "Latest-event lookup failed");
                        None
                    }),
                None => None,
            };
            latest.push(event);
        }

        println!("\n\u{2014} {} \u{2014}", title);
        println!("{}", render::render_tire_list(self.tires.tires(), &latest));
        println!("[t] add tire  [l <n>] load tire  [x <n>] delete tire  [b] back");
        print!("> ");
        let Some(line) = read_line() else {
            self.tire_nav.dispatch(TireAction::Back);
            return;
        };
        let (cmd, index) = split_cmd(&line);
        match cmd.as_str() {
            "t" => {
                if let Some(tire_name) =
                    self.dialogs
                        .prompt_text("Enter a name for this tire:", "Add Tire", "\u{1f3ce}")
                {
                    if let Err(e) = self.tires.add_tire(&self.session, &set_id, &tire_name).await {
                        self.report(&e);
                    }
                }
            }
            "l" => {
                if let Some(tire_id) = self.nth_tire_id(index) {
                    self.tire_nav.current_tire_id = Some(tire_id.clone());
                    self.tire_nav.dispatch(TireAction::LoadTire);
                    if let Err(e) = self.tires.reload_events(&self.session, &tire_id).await {
                        self.report(&e);
                    }
                }
            }
            "x" => {
                if let Some(tire_id) = self.nth_tire_id(index) {
                    if let Err(e) = self
                        .tires
                        .delete_tire(&self.session, &self.dialogs, &set_id, &tire_id)
                        .await
                    {
                        self.report(&e);
                    }
                }
            }
            "b" => {
                let transition = self.tire_nav.dispatch(TireAction::Back);
                if let Some(t) = transition {
                    self.perform_effect(t.effect).await;
                }
            }
            _ => {}
        }
    }

    async fn run_tire_details(&mut self) {
        let Some(tire_id) = self.tire_nav.current_tire_id.clone() else {
            self.tire_nav.dispatch(TireAction::Back);
            return;
        };
        let title = self
            .tires
            .tire(&tire_id)
            .map(|t| t.tire_name.clone())
            .unwrap_or_else(|| "Tire".to_string());

        println!("\n\u{2014} {} \u{2014}", title);
        println!("{}", render::render_event_list(self.tires.events()));
        println!("[n] new event  [v <n>] view  [e <n>] edit  [x <n>] delete  [b] back");
        print!("> ");
        let Some(line) = read_line() else {
            self.tire_nav.dispatch(TireAction::Back);
            return;
        };
        let (cmd, index) = split_cmd(&line);
        match cmd.as_str() {
            "n" => {
                self.tire_nav.dispatch(TireAction::OpenAddEvent);
            }
            "v" => {
                if let Some(event_id) = self.nth_event_id(index) {
                    self.tire_nav.current_event_id = Some(event_id);
                    self.tire_nav.dispatch(TireAction::ViewEvent);
                }
            }
            "e" => {
                if let Some(event_id) = self.nth_event_id(index) {
                    self.tire_nav.current_event_id = Some(event_id);
                    self.tire_nav.dispatch(TireAction::EditEvent);
                }
            }
            "x" => {
                if let Some(event_id) = self.nth_event_id(index) {
                    if let Err(e) = self
                        .tires
                        .delete_event(&self.session, &self.dialogs, &tire_id, &event_id)
                        .await
                    {
                        self.report(&e);
                    }
                }
            }
            "b" => {
                self.tire_nav.dispatch(TireAction::Back);
            }
            _ => {}
        }
    }

    async fn run_add_event(&mut self) {
        let (Some(set_id), Some(tire_id)) = (
            self.tire_nav.current_set_id.clone(),
            self.tire_nav.current_tire_id.clone(),
        ) else {
            self.tire_nav.dispatch(TireAction::Back);
            return;
        };

        println!("\n\u{2014} New Tire Event \u{2014}");
        let form = self.read_event_form();
        let apply_to_all = self.dialogs.confirm(
            "Apply this event to all tires in the set?",
            "Apply To All",
            "\u{2753}",
        );

        match self
            .tires
            .add_event(&self.session, &set_id, &tire_id, &form, apply_to_all)
            .await
        {
            Ok(created) => {
                let message = if created == 1 {
                    "Event saved successfully!".to_string()
                } else {
                    format!("Event saved for {} tires!", created)
                };
                self.dialogs.alert(&message, "Success", "\u{2705}");
                self.tire_nav.dispatch(TireAction::SaveEvent);
            }
            Err(e) => {
                self.report(&e);
                self.tire_nav.dispatch(TireAction::Back);
            }
        }
    }

    async fn run_view_event(&mut self) {
        let Some(event_id) = self.tire_nav.current_event_id.clone() else {
            self.tire_nav.dispatch(TireAction::Back);
            return;
        };

        match self.tires.get_event(&self.session, &event_id).await {
            Ok(Some(event)) => {
                println!("\n\u{2014} View Event \u{2014}");
                println!("{}", render::render_event_details(&event));
                println!("[b] back");
                print!("> ");
                let _ = read_line();
            }
            Ok(None) => {}
            Err(e) => self.report(&e),
        }
        self.tire_nav.dispatch(TireAction::Back);
    }

    async fn run_edit_event(&mut self) {
        let Some(event_id) = self.tire_nav.current_event_id.clone() else {
            self.tire_nav.dispatch(TireAction::Back);
            return;
        };

        let event = match self.tires.get_event(&self.session, &event_id).await {
            Ok(Some(event)) => event,
            Ok(None) => {
                self.report(&AppError::NotFound("Tire event".to_string()));
                self.tire_nav.dispatch(TireAction::Back);
                return;
            }
            Err(e) => {
                self.report(&e);
                self.tire_nav.dispatch(TireAction::Back);
                return;
            }
        };

        println!("\n\u{2014} Edit Event \u{2014}");
        let form = self.read_event_form_with_defaults(&event);

        match self.tires.edit_event(&self.session, &event, &form).await {
            Ok(()) => {
                self.dialogs
                    .alert("Event updated successfully!", "Success", "\u{2705}");
                self.tire_nav.dispatch(TireAction::SaveEdit);
            }
            Err(e) => {
                self.report(&e);
                self.tire_nav.dispatch(TireAction::Back);
            }
        }
    }

    // ─── Build Section ───────────────────────────────────────────

    async fn run_build_section(&mut self, reset: bool) {
        if reset {
            self.build_nav.reset();
        }

        loop {
            match self.build_nav.panel() {
                BuildPanel::Choice => {
                    println!("\n\u{2014} Build \u{2014}");
                    println!("[1] Load saved build  [2] Create new build  [b] back");
                    print!("> ");
                    let Some(line) = read_line() else { return };
                    match split_cmd(&line).0.as_str() {
                        "1" => {
                            if self.run_saved_builds_section().await {
                                self.build_nav.dispatch(BuildAction::CreateNew);
                            }
                        }
                        "2" => {
                            self.build_nav.dispatch(BuildAction::CreateNew);
                        }
                        "b" => return,
                        _ => {}
                    }
                }
                BuildPanel::Category => {
                    println!("\n\u{2014} Choose Category \u{2014}");
                    for (i, category) in render::BUILD_CATEGORIES.iter().enumerate() {
                        println!("[{}] {}", i + 1, category.title());
                    }
                    println!("[b] back");
                    print!("> ");
                    let Some(line) = read_line() else { return };
                    let (cmd, _) = split_cmd(&line);
                    match cmd.as_str() {
                        "b" => {
                            self.build_nav.dispatch(BuildAction::Back);
                        }
                        other => {
                            if let Some(category) = other
                                .parse::<usize>()
                                .ok()
                                .and_then(|i| i.checked_sub(1))
                                .and_then(|i| render::BUILD_CATEGORIES.get(i))
                            {
                                self.surface.switch_category(*category);
                                self.build_nav.dispatch(BuildAction::PickCategory);
                            }
                        }
                    }
                }
                BuildPanel::Setup => {
                    println!("\n\u{2014} Setup \u{2014}");
                    println!("{}", render::render_surface(&self.surface));
                    println!("[<n> <value>] set field  [s] save build  [b] back");
                    print!("> ");
                    let Some(line) = read_line() else { return };
                    let mut parts = line.trim().splitn(2, ' ');
                    let cmd = parts.next().unwrap_or("");
                    let rest = parts.next().unwrap_or("").trim();
                    match cmd {
                        "s" => {
                            let surface = self.surface.clone();
                            match self
                                .builds
                                .save_build(&self.session, &self.dialogs, &surface)
                                .await
                            {
                                Ok(Some(_)) => self.dialogs.alert(
                                    "Build saved successfully!",
                                    "Success",
                                    "\u{2705}",
                                ),
                                Ok(None) => {}
                                Err(e) => self.report(&e),
                            }
                        }
                        "b" => {
                            self.build_nav.dispatch(BuildAction::Back);
                        }
                        other => {
                            let field = other
                                .parse::<usize>()
                                .ok()
                                .and_then(|i| i.checked_sub(1))
                                .and_then(|i| {
                                    crate::models::build::fields_in(self.surface.category()).nth(i)
                                });
                            if let Some(field) = field {
                                if let Err(e) = self.surface.set(field.key, rest) {
                                    self.report(&e);
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    /// Saved-builds list. Returns `true` when a build was loaded into the
    /// surface, which sends the caller to the category menu.
    async fn run_saved_builds_section(&mut self) -> bool {
        loop {
            println!("\n\u{2014} Saved Builds \u{2014}");
            if let Err(e) = self.builds.reload(&self.session).await {
                self.report(&e);
                return false;
            }
            println!("{}", render::render_build_list(self.builds.builds()));
            println!("[l <n>] load  [d <n>] delete  [b] back");
            print!("> ");
            let Some(line) = read_line() else { return false };
            let (cmd, index) = split_cmd(&line);
            match cmd.as_str() {
                "l" => {
                    let build_id = index
                        .and_then(|i| i.checked_sub(1))
                        .and_then(|i| self.builds.builds().get(i))
                        .and_then(|b| b.id.clone());
                    if let Some(build_id) = build_id {
                        let mut surface = self.surface.clone();
                        match self
                            .builds
                            .load_build(&self.session, &build_id, &mut surface)
                            .await
                        {
                            Ok(name) => {
                                self.surface = surface;
                                self.dialogs.alert(
                                    &format!("Build \"{}\" loaded successfully!", name),
                                    "Build Loaded",
                                    "\u{2705}",
                                );
                                return true;
                            }
                            Err(e) => self.report(&e),
                        }
                    }
                }
                "d" => {
                    let build_id = index
                        .and_then(|i| i.checked_sub(1))
                        .and_then(|i| self.builds.builds().get(i))
                        .and_then(|b| b.id.clone());
                    if let Some(build_id) = build_id {
                        match self
                            .builds
                            .delete_build(&self.session, &self.dialogs, &build_id)
                            .await
                        {
                            Ok(true) => self.dialogs.alert(
                                "Build deleted successfully!",
                                "Deleted",
                                "\u{1f5d1}",
                            ),
                            Ok(false) => {}
                            Err(e) => self.report(&e),
                        }
                    }
                }
                "b" => return false,
                _ => {}
            }
        }
    }

    // ─── Profile Section ─────────────────────────────────────────

    async fn run_profile_section(&mut self) {
        loop {
            println!("\n\u{2014} Profile \u{2014}");
            match self.profile.load(&self.session).await {
                Ok(Some(profile)) => println!("{}", render::render_profile(&profile)),
                Ok(None) => println!("  No profile saved yet."),
                Err(e) => {
                    self.report(&e);
                    return;
                }
            }
            println!("[e] edit profile  [m] change email  [p] change password  [b] back");
            print!("> ");
            let Some(line) = read_line() else { return };
            match split_cmd(&line).0.as_str() {
                "e" => self.edit_profile().await,
                "m" => self.change_email().await,
                "p" => self.change_password().await,
                "b" => return,
                _ => {}
            }
        }
    }

    async fn edit_profile(&mut self) {
        let current = match self.profile.load(&self.session).await {
            Ok(profile) => profile,
            Err(e) => {
                self.report(&e);
                return;
            }
        };
        let current = current.unwrap_or_else(|| crate::models::UserProfile {
            owner_id: String::new(),
            display_name: String::new(),
            dob: String::new(),
            racing_team: String::new(),
            kart_number: String::new(),
            racing_class: String::new(),
            profile_picture_data_uri: None,
            created_at: String::new(),
        });

        let form = ProfileForm {
            display_name: self.read_field_with_default("Display name", &current.display_name),
            dob: self.read_field_with_default("Date of birth", &current.dob),
            racing_team: self.read_field_with_default("Racing team", &current.racing_team),
            kart_number: self.read_field_with_default("Kart number", &current.kart_number),
            racing_class: self.read_field_with_default("Racing class", &current.racing_class),
            profile_picture_data_uri: current.profile_picture_data_uri.clone(),
        };

        match self.profile.save(&self.session, &form).await {
            Ok(()) => self.dialogs.alert("Profile saved.", "Success", "\u{2705}"),
            Err(e) => self.report(&e),
        }
    }

    async fn change_email(&mut self) {
        let Some(user) = self.session.user().cloned() else {
            self.report(&AppError::NotSignedIn);
            return;
        };
        let Some(current_password) =
            self.dialogs
                .prompt_text("Current password:", "Reauthenticate", "\u{1f511}")
        else {
            return;
        };
        let Some(new_email) = self
            .dialogs
            .prompt_text("New email address:", "Change Email", "\u{1f4e7}")
        else {
            return;
        };

        match self
            .identity
            .change_email(&user, &current_password, &new_email)
            .await
        {
            Ok(updated) => {
                self.session.sign_in(updated);
                self.dialogs.alert("Email updated.", "Success", "\u{2705}");
            }
            Err(e) => self.report(&e),
        }
    }

    async fn change_password(&mut self) {
        let Some(user) = self.session.user().cloned() else {
            self.report(&AppError::NotSignedIn);
            return;
        };
        let Some(current_password) =
            self.dialogs
                .prompt_text("Current password:", "Reauthenticate", "\u{1f511}")
        else {
            return;
        };
        let Some(new_password) = self
            .dialogs
            .prompt_text("New password:", "Change Password", "\u{1f511}")
        else {
            return;
        };

        match self
            .identity
            .change_password(&user, &current_password, &new_password)
            .await
        {
            Ok(updated) => {
                self.session.sign_in(updated);
                self.dialogs
                    .alert("Password updated.", "Success", "\u{2705}");
            }
            Err(e) => self.report(&e),
        }
    }
}
