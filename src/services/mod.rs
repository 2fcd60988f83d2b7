// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - feature logic layer.

pub mod build;
pub mod identity;
pub mod profile;
pub mod tire;
pub mod track;

pub use build::{BuildService, SetupSurface};
pub use identity::IdentityClient;
pub use profile::ProfileService;
pub use tire::TireService;
pub use track::TrackService;
