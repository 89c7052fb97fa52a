//! User entity model and DTOs.

use erp_core::lookup::{LookupId, UserStatus};
use erp_core::policy::{Actor, Target};
use erp_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash and remember-token hash. NEVER serialize this
/// to API responses directly; use [`UserResponse`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub username: String,
    pub password_hash: String,
    pub avatar: Option<String>,
    pub status_id: LookupId,
    pub group_id: Option<DbId>,
    pub remember_token: Option<String>,
    pub remember_expires_at: Option<Timestamp>,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Resolved status. An id missing from the lookup table counts as inactive.
    pub fn status(&self) -> UserStatus {
        UserStatus::from_id(self.status_id).unwrap_or(UserStatus::Inactive)
    }

    pub fn is_active(&self) -> bool {
        self.status().is_active()
    }

    /// Policy target describing this user.
    pub fn as_target(&self) -> Target {
        Target::user(self.id, self.group_id)
    }
}

/// A user joined with their group name, as needed for authorization.
#[derive(Debug, Clone, FromRow)]
pub struct ActorRow {
    pub id: DbId,
    pub status_id: LookupId,
    pub group_id: Option<DbId>,
    pub group_name: Option<String>,
}

impl From<ActorRow> for Actor {
    fn from(row: ActorRow) -> Self {
        Actor {
            user_id: row.id,
            group_id: row.group_id,
            group_name: row.group_name,
            status: UserStatus::from_id(row.status_id).unwrap_or(UserStatus::Inactive),
        }
    }
}

/// Safe user representation for API responses (no secrets).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub name: String,
    pub username: String,
    pub avatar: Option<String>,
    pub status: UserStatus,
    pub status_label: &'static str,
    pub group_id: Option<DbId>,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        let status = user.status();
        Self {
            id: user.id,
            name: user.name.clone(),
            username: user.username.clone(),
            avatar: user.avatar.clone(),
            status,
            status_label: status.label(),
            group_id: user.group_id,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse::from(&user)
    }
}

/// DTO for creating a new user.
///
/// The user, its primary email and its preference row are written together.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub username: String,
    pub password_hash: String,
    pub avatar: Option<String>,
    pub group_id: Option<DbId>,
    /// Address stored as the primary email.
    pub email: String,
    /// Stamp `verified_at` on the primary email.
    pub email_verified: bool,
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub username: Option<String>,
    pub avatar: Option<String>,
    /// Set `avatar` to `NULL`. Wins over `avatar`.
    pub clear_avatar: bool,
    pub group_id: Option<DbId>,
    /// Set `group_id` to `NULL`. Wins over `group_id`.
    pub clear_group: bool,
    pub status: Option<UserStatus>,
}
