//! Repository for the `groups` table.

use erp_core::types::DbId;
use sqlx::PgPool;

use crate::models::group::{CreateGroup, Group, UpdateGroup};
use crate::models::user::User;

const COLUMNS: &str = "id, name, created_at, updated_at";

/// Provides CRUD operations for groups.
pub struct GroupRepo;

impl GroupRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<Group>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM groups ORDER BY name");
        sqlx::query_as::<_, Group>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Group>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM groups WHERE id = $1");
        sqlx::query_as::<_, Group>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Group>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM groups WHERE name = $1");
        sqlx::query_as::<_, Group>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(pool: &PgPool, input: &CreateGroup) -> Result<Group, sqlx::Error> {
        let query = format!("INSERT INTO groups (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Group>(&query)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Rename a group. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateGroup,
    ) -> Result<Option<Group>, sqlx::Error> {
        let query = format!(
            "UPDATE groups SET name = COALESCE($2, name) WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Group>(&query)
            .bind(id)
            .bind(&input.name)
            .fetch_optional(pool)
            .await
    }

    /// Delete a group. Members keep their accounts with `group_id` cleared.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Pick a random group whose name is not in `exclude`, or `None` when
    /// no such group exists.
    pub async fn random_id(pool: &PgPool, exclude: &[String]) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT id FROM groups WHERE name <> ALL($1) ORDER BY random() LIMIT 1",
        )
        .bind(exclude)
        .fetch_optional(pool)
        .await
    }

    /// Users belonging to the group, ordered by ID.
    pub async fn list_members(pool: &PgPool, group_id: DbId) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, username, password_hash, avatar, status_id, group_id,
                    remember_token, remember_expires_at, failed_login_count, locked_until,
                    last_login_at, created_at, updated_at
             FROM users WHERE group_id = $1 ORDER BY id",
        )
        .bind(group_id)
        .fetch_all(pool)
        .await
    }
}
