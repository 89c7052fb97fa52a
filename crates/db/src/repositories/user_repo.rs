//! Repository for the `users` table and the identity lifecycle.

use erp_core::identity::{DEFAULT_LOCALE, DEFAULT_TIMEZONE};
use erp_core::lookup::{EmailType, UserStatus};
use erp_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::user::{ActorRow, CreateUser, UpdateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, username, password_hash, avatar, status_id, group_id, \
                       remember_token, remember_expires_at, failed_login_count, locked_until, \
                       last_login_at, created_at, updated_at";

/// Provides CRUD and login bookkeeping for users.
pub struct UserRepo;

impl UserRepo {
    /// Create a user together with its primary email and preference row.
    ///
    /// All three inserts run in one transaction. The preference starts with
    /// the default locale and timezone and the current default theme (if any).
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO users (name, username, password_hash, avatar, group_id, status_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.username)
            .bind(&input.password_hash)
            .bind(&input.avatar)
            .bind(input.group_id)
            .bind(UserStatus::Active.id())
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO user_emails (user_id, email, type_id, is_primary, verified_at)
             VALUES ($1, $2, $3, TRUE, CASE WHEN $4 THEN NOW() ELSE NULL END)",
        )
        .bind(user.id)
        .bind(&input.email)
        .bind(EmailType::Primary.id())
        .bind(input.email_verified)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO user_preferences (user_id, locale, timezone, theme_id)
             VALUES ($1, $2, $3, (SELECT id FROM themes WHERE is_default LIMIT 1))",
        )
        .bind(user.id)
        .bind(DEFAULT_LOCALE)
        .bind(DEFAULT_TIMEZONE)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(user)
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Load the authorization view of a user (status plus group name).
    pub async fn find_actor(pool: &PgPool, id: DbId) -> Result<Option<ActorRow>, sqlx::Error> {
        sqlx::query_as::<_, ActorRow>(
            "SELECT u.id, u.status_id, u.group_id, g.name AS group_name
             FROM users u
             LEFT JOIN groups g ON g.id = u.group_id
             WHERE u.id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// List all users ordered by ID.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY id");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Update a user. Only non-`None` fields in `input` are applied; the
    /// `clear_*` flags reset their column to `NULL`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                name = COALESCE($2, name),
                username = COALESCE($3, username),
                avatar = CASE WHEN $7 THEN NULL ELSE COALESCE($4, avatar) END,
                group_id = CASE WHEN $8 THEN NULL ELSE COALESCE($5, group_id) END,
                status_id = COALESCE($6, status_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.username)
            .bind(&input.avatar)
            .bind(input.group_id)
            .bind(input.status.map(UserStatus::id))
            .bind(input.clear_avatar)
            .bind(input.clear_group)
            .fetch_optional(pool)
            .await
    }

    /// Set the status of a user. Returns `true` if the row was updated.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: UserStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET status_id = $2 WHERE id = $1")
            .bind(id)
            .bind(status.id())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Soft-deactivate a user and drop any remember token.
    ///
    /// Returns `true` if the user was previously in another status.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET status_id = $2, remember_token = NULL, remember_expires_at = NULL
             WHERE id = $1 AND status_id <> $2",
        )
        .bind(id)
        .bind(UserStatus::Inactive.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record one failed login, returning the new count.
    ///
    /// An expired lock is cleared first, so counting restarts at 1.
    pub async fn increment_failed_login(pool: &PgPool, id: DbId) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE users SET
                failed_login_count = CASE
                    WHEN locked_until IS NOT NULL AND locked_until <= NOW() THEN 1
                    ELSE failed_login_count + 1
                END,
                locked_until = CASE
                    WHEN locked_until <= NOW() THEN NULL
                    ELSE locked_until
                END
             WHERE id = $1
             RETURNING failed_login_count",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Lock a user account until the specified timestamp.
    pub async fn lock_account(
        pool: &PgPool,
        id: DbId,
        until: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET locked_until = $2 WHERE id = $1")
            .bind(id)
            .bind(until)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Reset failed attempts and lock, and stamp `last_login_at`.
    pub async fn record_successful_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET failed_login_count = 0, locked_until = NULL, last_login_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Store the hash of a freshly issued remember token, replacing any
    /// previous one.
    pub async fn set_remember_token(
        pool: &PgPool,
        id: DbId,
        token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET remember_token = $2, remember_expires_at = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn clear_remember_token(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET remember_token = NULL, remember_expires_at = NULL WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Find the user holding the given remember-token hash, ignoring
    /// expired tokens.
    pub async fn find_by_remember_token(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE remember_token = $1 AND remember_expires_at > NOW()"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Replace the password hash.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
    }
}
