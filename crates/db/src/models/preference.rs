//! User preference entity model and DTOs.

use erp_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::theme::Theme;

/// A row from the `user_preferences` table. Created together with the user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserPreference {
    pub id: DbId,
    pub user_id: DbId,
    pub locale: String,
    pub theme_id: Option<DbId>,
    pub timezone: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for updating a preference. Only provided fields change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePreference {
    pub locale: Option<String>,
    pub theme_id: Option<DbId>,
    /// Drop the explicit theme so the default theme applies again.
    #[serde(default)]
    pub clear_theme: bool,
    pub timezone: Option<String>,
}

/// Preference together with the theme that actually applies.
#[derive(Debug, Clone, Serialize)]
pub struct PreferenceResponse {
    #[serde(flatten)]
    pub preference: UserPreference,
    /// Explicit theme, or the default theme when none is set.
    pub effective_theme: Option<Theme>,
}
