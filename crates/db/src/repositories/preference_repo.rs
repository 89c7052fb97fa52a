//! Repository for the `user_preferences` table.

use erp_core::types::DbId;
use sqlx::PgPool;

use crate::models::preference::{UpdatePreference, UserPreference};
use crate::models::theme::Theme;

const COLUMNS: &str = "id, user_id, locale, theme_id, timezone, created_at, updated_at";

/// Provides access to per-user preferences.
pub struct PreferenceRepo;

impl PreferenceRepo {
    /// The preference row of a user. Every user created through
    /// [`crate::repositories::UserRepo::create`] has one.
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<UserPreference>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_preferences WHERE user_id = $1");
        sqlx::query_as::<_, UserPreference>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Apply the provided fields. `clear_theme` resets `theme_id` to `NULL`
    /// and wins over `theme_id`.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        input: &UpdatePreference,
    ) -> Result<Option<UserPreference>, sqlx::Error> {
        let query = format!(
            "UPDATE user_preferences SET
                locale = COALESCE($2, locale),
                theme_id = CASE WHEN $4 THEN NULL ELSE COALESCE($3, theme_id) END,
                timezone = COALESCE($5, timezone)
             WHERE user_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserPreference>(&query)
            .bind(user_id)
            .bind(&input.locale)
            .bind(input.theme_id)
            .bind(input.clear_theme)
            .bind(&input.timezone)
            .fetch_optional(pool)
            .await
    }

    /// The theme that applies to a user: their explicit choice, otherwise
    /// the default theme. `None` when neither exists.
    pub async fn resolve_theme(pool: &PgPool, user_id: DbId) -> Result<Option<Theme>, sqlx::Error> {
        sqlx::query_as::<_, Theme>(
            "SELECT t.id, t.name, t.is_default, t.created_at, t.updated_at
             FROM themes t
             WHERE t.id = COALESCE(
                 (SELECT theme_id FROM user_preferences WHERE user_id = $1),
                 (SELECT id FROM themes WHERE is_default LIMIT 1)
             )",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }
}
