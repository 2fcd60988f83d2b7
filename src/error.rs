// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.
//!
//! Every failure maps to one of the user-visible classes: not signed in,
//! validation, store failure, identity-provider failure, or not found.
//! None of them is fatal; the shell reports the error and returns control
//! to the active panel.

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Please log in first")]
    NotSignedIn,

    #[error("{0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Wrong current password")]
    WrongPassword,

    #[error("Email already in use")]
    EmailInUse,

    #[error("Identity provider error: {0}")]
    Identity(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;
