//! Repository for the `user_emails` and `user_phones` tables.

use erp_core::types::DbId;
use sqlx::PgPool;

use crate::models::contact::{CreateUserEmail, CreateUserPhone, UserEmail, UserPhone};

const EMAIL_COLUMNS: &str =
    "id, user_id, email, type_id, is_primary, verified_at, created_at, updated_at";

const PHONE_COLUMNS: &str = "id, user_id, number, type_id, created_at, updated_at";

/// Provides data access for a user's email addresses and phone numbers.
pub struct ContactRepo;

impl ContactRepo {
    // -----------------------------------------------------------------------
    // Emails
    // -----------------------------------------------------------------------

    /// Emails of a user, primary first.
    pub async fn list_emails(pool: &PgPool, user_id: DbId) -> Result<Vec<UserEmail>, sqlx::Error> {
        let query = format!(
            "SELECT {EMAIL_COLUMNS} FROM user_emails
             WHERE user_id = $1
             ORDER BY is_primary DESC, id"
        );
        sqlx::query_as::<_, UserEmail>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_email(pool: &PgPool, id: DbId) -> Result<Option<UserEmail>, sqlx::Error> {
        let query = format!("SELECT {EMAIL_COLUMNS} FROM user_emails WHERE id = $1");
        sqlx::query_as::<_, UserEmail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_primary_email(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<UserEmail>, sqlx::Error> {
        let query =
            format!("SELECT {EMAIL_COLUMNS} FROM user_emails WHERE user_id = $1 AND is_primary");
        sqlx::query_as::<_, UserEmail>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Add a non-primary, unverified email to a user.
    pub async fn add_email(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateUserEmail,
    ) -> Result<UserEmail, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_emails (user_id, email, type_id, is_primary)
             VALUES ($1, $2, $3, FALSE)
             RETURNING {EMAIL_COLUMNS}"
        );
        sqlx::query_as::<_, UserEmail>(&query)
            .bind(user_id)
            .bind(&input.email)
            .bind(input.email_type.id())
            .fetch_one(pool)
            .await
    }

    /// Make `email_id` the user's primary email.
    ///
    /// The old primary is demoted and the new one promoted in one
    /// transaction, so readers never see zero or two primaries. Returns
    /// `None` (and changes nothing) if the email does not belong to the user.
    pub async fn set_primary_email(
        pool: &PgPool,
        user_id: DbId,
        email_id: DbId,
    ) -> Result<Option<UserEmail>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let owned: Option<DbId> = sqlx::query_scalar(
            "SELECT id FROM user_emails WHERE id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(email_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;
        if owned.is_none() {
            return Ok(None);
        }

        sqlx::query(
            "UPDATE user_emails SET is_primary = FALSE
             WHERE user_id = $1 AND is_primary AND id <> $2",
        )
        .bind(user_id)
        .bind(email_id)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "UPDATE user_emails SET is_primary = TRUE WHERE id = $1 RETURNING {EMAIL_COLUMNS}"
        );
        let email = sqlx::query_as::<_, UserEmail>(&query)
            .bind(email_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(email))
    }

    /// Stamp `verified_at` if not already set.
    pub async fn mark_email_verified(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<UserEmail>, sqlx::Error> {
        let query = format!(
            "UPDATE user_emails SET verified_at = COALESCE(verified_at, NOW())
             WHERE id = $1
             RETURNING {EMAIL_COLUMNS}"
        );
        sqlx::query_as::<_, UserEmail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Clear `verified_at` on the user's primary email.
    ///
    /// Returns `true` if a primary email exists.
    pub async fn clear_primary_verification(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_emails SET verified_at = NULL WHERE user_id = $1 AND is_primary",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a secondary email. The primary email is never deleted.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete_email(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_emails WHERE id = $1 AND NOT is_primary")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_primary_emails(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM user_emails WHERE user_id = $1 AND is_primary")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Phones
    // -----------------------------------------------------------------------

    pub async fn list_phones(pool: &PgPool, user_id: DbId) -> Result<Vec<UserPhone>, sqlx::Error> {
        let query =
            format!("SELECT {PHONE_COLUMNS} FROM user_phones WHERE user_id = $1 ORDER BY id");
        sqlx::query_as::<_, UserPhone>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_phone(pool: &PgPool, id: DbId) -> Result<Option<UserPhone>, sqlx::Error> {
        let query = format!("SELECT {PHONE_COLUMNS} FROM user_phones WHERE id = $1");
        sqlx::query_as::<_, UserPhone>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn add_phone(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateUserPhone,
    ) -> Result<UserPhone, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_phones (user_id, number, type_id)
             VALUES ($1, $2, $3)
             RETURNING {PHONE_COLUMNS}"
        );
        sqlx::query_as::<_, UserPhone>(&query)
            .bind(user_id)
            .bind(&input.number)
            .bind(input.phone_type.id())
            .fetch_one(pool)
            .await
    }

    pub async fn delete_phone(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_phones WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
