// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod build;
pub mod tire;
pub mod track;
pub mod user;

pub use build::{Build, SetupCategory, SetupField};
pub use tire::{Tire, TireEvent, TireSet};
pub use track::{Day, Track};
pub use user::UserProfile;
