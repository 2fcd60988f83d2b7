// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile: one document per identity, addressed directly by uid.

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::UserProfile;
use crate::session::Session;
use crate::time_utils::now_rfc3339;
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Editable profile fields.
#[derive(Debug, Default, Clone)]
pub struct ProfileForm {
    pub display_name: String,
    pub dob: String,
    pub racing_team: String,
    pub kart_number: String,
    pub racing_class: String,
    pub profile_picture_data_uri: Option<String>,
}

/// Whether a string is a decodable `data:image/...;base64,` URI.
pub fn is_valid_picture_data_uri(uri: &str) -> bool {
    let Some(rest) = uri.strip_prefix("data:image/") else {
        return false;
    };
    let Some((_, payload)) = rest.split_once(";base64,") else {
        return false;
    };
    !payload.is_empty() && STANDARD.decode(payload).is_ok()
}

/// Profile feature module.
pub struct ProfileService {
    db: FirestoreDb,
}

impl ProfileService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Fetch the signed-in identity's profile, when one exists.
    pub async fn load(&self, session: &Session) -> Result<Option<UserProfile>> {
        let user = session.require_user()?;
        self.db.get_profile(&user.uid).await
    }

    /// Create or update the profile. The original `created_at` survives an
    /// update.
    pub async fn save(&self, session: &Session, form: &ProfileForm) -> Result<()> {
        let user = session.require_user()?;

        if let Some(uri) = form.profile_picture_data_uri.as_deref() {
            if !is_valid_picture_data_uri(uri) {
                return Err(AppError::Validation(
                    "Profile picture must be a base64 image data URI.".to_string(),
                ));
            }
        }

        let created_at = self
            .db
            .get_profile(&user.uid)
            .await?
            .map(|p| p.created_at)
            .unwrap_or_else(now_rfc3339);

        let profile = UserProfile {
            owner_id: user.uid.clone(),
            display_name: form.display_name.trim().to_string(),
            dob: form.dob.trim().to_string(),
            racing_team: form.racing_team.trim().to_string(),
            kart_number: form.kart_number.trim().to_string(),
            racing_class: form.racing_class.trim().to_string(),
            profile_picture_data_uri: form.profile_picture_data_uri.clone(),
            created_at,
        };
        self.db.set_profile(&profile).await?;
        tracing::info!(uid = %user.uid, "Profile saved");
        Ok(())
    }
}
