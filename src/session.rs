// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Current-identity holder.
//!
//! Every owner-scoped read or write checks this holder first and fails fast
//! with [`AppError::NotSignedIn`] before any store call is attempted.

use crate::error::{AppError, Result};

/// Authenticated identity, as issued by the identity provider.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Stable opaque user id; owns every record it creates.
    pub uid: String,
    pub email: String,
    /// Fresh ID token, required for sensitive identity changes.
    pub id_token: String,
}

/// Nullable reference to the signed-in identity.
#[derive(Debug, Default)]
pub struct Session {
    user: Option<AuthUser>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the identity after a successful sign-in.
    pub fn sign_in(&mut self, user: AuthUser) {
        tracing::info!(uid = %user.uid, "Signed in");
        self.user = Some(user);
    }

    pub fn sign_out(&mut self) {
        if let Some(user) = self.user.take() {
            tracing::info!(uid = %user.uid, "Signed out");
        }
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    /// The signed-in identity, or [`AppError::NotSignedIn`].
    pub fn require_user(&self) -> Result<&AuthUser> {
        self.user.as_ref().ok_or(AppError::NotSignedIn)
    }
}
