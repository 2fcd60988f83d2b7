//! User profile model for storage.

use serde::{Deserialize, Serialize};

/// Profile document, one per identity, addressed directly by uid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Owning identity uid (also the document id).
    pub owner_id: String,
    #[serde(default)]
    pub display_name: String,
    /// Date of birth, free-form.
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub racing_team: String,
    #[serde(default)]
    pub kart_number: String,
    #[serde(default)]
    pub racing_class: String,
    /// Compressed raster thumbnail as a `data:image/...;base64,` URI.
    pub profile_picture_data_uri: Option<String>,
    /// RFC3339 UTC.
    pub created_at: String,
}
