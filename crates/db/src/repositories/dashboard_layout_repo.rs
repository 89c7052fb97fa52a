//! Repository for the `dashboard_layouts` table.

use erp_core::types::DbId;
use serde_json::Value;
use sqlx::PgPool;

use crate::models::dashboard_layout::DashboardLayout;

const COLUMNS: &str = "id, user_id, layout_config, created_at, updated_at";

/// Provides per-user dashboard layout storage.
pub struct DashboardLayoutRepo;

impl DashboardLayoutRepo {
    /// The stored layout for a user, `None` if they never saved one.
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<DashboardLayout>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dashboard_layouts WHERE user_id = $1");
        sqlx::query_as::<_, DashboardLayout>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or replace the layout for a user.
    ///
    /// Uses `ON CONFLICT (user_id) DO UPDATE` so concurrent saves for one
    /// user leave exactly one row holding the last write.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        layout_config: &Value,
    ) -> Result<DashboardLayout, sqlx::Error> {
        let query = format!(
            "INSERT INTO dashboard_layouts (user_id, layout_config)
             VALUES ($1, $2)
             ON CONFLICT (user_id) DO UPDATE SET
                 layout_config = EXCLUDED.layout_config
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DashboardLayout>(&query)
            .bind(user_id)
            .bind(layout_config)
            .fetch_one(pool)
            .await
    }

    pub async fn count_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM dashboard_layouts WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }
}
