//! Repository for the `themes` table.

use erp_core::types::DbId;
use sqlx::PgPool;

use crate::models::theme::{CreateTheme, Theme, UpdateTheme};

const COLUMNS: &str = "id, name, is_default, created_at, updated_at";

/// Provides CRUD operations for themes and default-theme selection.
pub struct ThemeRepo;

impl ThemeRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<Theme>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM themes ORDER BY name");
        sqlx::query_as::<_, Theme>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Theme>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM themes WHERE id = $1");
        sqlx::query_as::<_, Theme>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_default(pool: &PgPool) -> Result<Option<Theme>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM themes WHERE is_default");
        sqlx::query_as::<_, Theme>(&query).fetch_optional(pool).await
    }

    /// Insert a theme. With `is_default` set, the current default is demoted
    /// in the same transaction.
    pub async fn create(pool: &PgPool, input: &CreateTheme) -> Result<Theme, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if input.is_default {
            sqlx::query("UPDATE themes SET is_default = FALSE WHERE is_default")
                .execute(&mut *tx)
                .await?;
        }

        let query = format!(
            "INSERT INTO themes (name, is_default) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        let theme = sqlx::query_as::<_, Theme>(&query)
            .bind(&input.name)
            .bind(input.is_default)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(theme)
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTheme,
    ) -> Result<Option<Theme>, sqlx::Error> {
        let query = format!(
            "UPDATE themes SET name = COALESCE($2, name) WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Theme>(&query)
            .bind(id)
            .bind(&input.name)
            .fetch_optional(pool)
            .await
    }

    /// Make `id` the only default theme.
    ///
    /// Clears the old default and sets the new one in one transaction.
    /// Returns `None` (and changes nothing) if the theme does not exist.
    pub async fn set_default(pool: &PgPool, id: DbId) -> Result<Option<Theme>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let exists: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM themes WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Ok(None);
        }

        sqlx::query("UPDATE themes SET is_default = FALSE WHERE is_default AND id <> $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let query =
            format!("UPDATE themes SET is_default = TRUE WHERE id = $1 RETURNING {COLUMNS}");
        let theme = sqlx::query_as::<_, Theme>(&query)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(theme))
    }

    /// Delete a theme. Preferences pointing at it fall back to the default.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM themes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_defaults(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM themes WHERE is_default")
            .fetch_one(pool)
            .await
    }
}
