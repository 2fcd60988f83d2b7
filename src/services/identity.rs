// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity provider client (Firebase Auth REST API).
//!
//! Handles:
//! - Email/password sign-in and sign-up
//! - Reauthentication before sensitive changes
//! - Email and password updates
//!
//! Wrong-current-password and email-already-in-use surface as distinct
//! errors; everything else is a generic identity failure.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::session::AuthUser;
use serde::Deserialize;

/// Identity REST client.
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl IdentityClient {
    /// Create a new client.
    ///
    /// For local development with the Auth emulator, set
    /// FIREBASE_AUTH_EMULATOR_HOST.
    pub fn new(config: &Config) -> Self {
        let base_url = match std::env::var("FIREBASE_AUTH_EMULATOR_HOST") {
            Ok(host) => format!("http://{}/identitytoolkit.googleapis.com/v1", host),
            Err(_) => "https://identitytoolkit.googleapis.com/v1".to_string(),
        };

        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key: config.firebase_api_key.clone(),
        }
    }

    /// Sign in with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser> {
        self.credential_request("accounts:signInWithPassword", email, password)
            .await
    }

    /// Create a new account with email and password.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser> {
        self.credential_request("accounts:signUp", email, password)
            .await
    }

    /// Reauthenticate before a sensitive change. A stale session token is
    /// not enough for email/password updates; the provider wants a fresh
    /// credential check.
    pub async fn reauthenticate(&self, email: &str, current_password: &str) -> Result<AuthUser> {
        self.sign_in(email, current_password).await
    }

    /// Change the account email. Requires the current password; surfaces
    /// [`AppError::EmailInUse`] when the new email is already taken.
    pub async fn change_email(
        &self,
        user: &AuthUser,
        current_password: &str,
        new_email: &str,
    ) -> Result<AuthUser> {
        let fresh = self.reauthenticate(&user.email, current_password).await?;
        self.account_update(
            &fresh,
            serde_json::json!({
                "idToken": fresh.id_token.as_str(),
                "email": new_email,
                "returnSecureToken": true
            }),
        )
        .await
    }

    /// Change the account password. Requires the current password.
    pub async fn change_password(
        &self,
        user: &AuthUser,
        current_password: &str,
        new_password: &str,
    ) -> Result<AuthUser> {
        let fresh = self.reauthenticate(&user.email, current_password).await?;
        self.account_update(
            &fresh,
            serde_json::json!({
                "idToken": fresh.id_token.as_str(),
                "password": new_password,
                "returnSecureToken": true
            }),
        )
        .await
    }

    async fn account_update(&self, fresh: &AuthUser, body: serde_json::Value) -> Result<AuthUser> {
        let url = format!("{}/accounts:update?key={}", self.base_url, self.api_key);
        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Identity(e.to_string()))?;

        let auth: AuthResponse = check_response_json(response).await?;
        Ok(AuthUser {
            uid: auth.local_id,
            email: auth.email.unwrap_or_else(|| fresh.email.clone()),
            id_token: auth.id_token,
        })
    }

    async fn credential_request(
        &self,
        endpoint: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthUser> {
        let url = format!("{}/{}?key={}", self.base_url, endpoint, self.api_key);
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Identity(e.to_string()))?;

        let auth: AuthResponse = check_response_json(response).await?;
        Ok(AuthUser {
            uid: auth.local_id,
            email: auth.email.unwrap_or_else(|| email.to_string()),
            id_token: auth.id_token,
        })
    }
}

/// Check response status, mapping provider error codes, and parse the body.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T> {
    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(map_auth_error(status, &body));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Identity(format!("JSON parse error: {}", e)))
}

/// Map a provider error body to an application error.
///
/// Error codes arrive as `{"error": {"message": "CODE"}}`, sometimes with a
/// trailing explanation after the code.
fn map_auth_error(status: u16, body: &str) -> AppError {
    let code = serde_json::from_str::<AuthErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_default();

    match code.split_whitespace().next().unwrap_or("") {
        "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => AppError::WrongPassword,
        "EMAIL_EXISTS" => AppError::EmailInUse,
        "EMAIL_NOT_FOUND" => AppError::Identity("No account exists for that email".to_string()),
        "USER_DISABLED" => AppError::Identity("This account has been disabled".to_string()),
        "TOO_MANY_ATTEMPTS_TRY_LATER" => {
            AppError::Identity("Too many attempts, try again later".to_string())
        }
        "" => AppError::Identity(format!("HTTP {}", status)),
        other => AppError::Identity(other.to_string()),
    }
}

/// Successful response from the credential and update endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    local_id: String,
    email: Option<String>,
    id_token: String,
}

#[derive(Debug, Deserialize, Default)]
struct AuthErrorBody {
    error: AuthErrorDetail,
}

#[derive(Debug, Deserialize, Default)]
struct AuthErrorDetail {
    message: String,
}
