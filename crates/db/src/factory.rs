//! Synthetic users for seeding and tests.
//!
//! ```ignore
//! let users = UserFactory::new(hash)
//!     .in_random_group_except(&[ADMIN_GROUP])
//!     .create_many(&pool, 25)
//!     .await?;
//! let pending = UserFactory::new(hash).unverified().create(&pool).await?;
//! ```

use erp_core::lookup::UserStatus;
use erp_core::types::DbId;
use rand::Rng;
use sqlx::PgPool;

use crate::models::user::{CreateUser, User};
use crate::repositories::{ContactRepo, GroupRepo, UserRepo};

/// Domain used for generated email addresses.
pub const FACTORY_EMAIL_DOMAIN: &str = "example.test";

const FIRST_NAMES: &[&str] = &[
    "Ada", "Bruno", "Chloe", "Dmitri", "Elena", "Farid", "Greta", "Hiro", "Ines", "Jonas",
    "Kara", "Luca", "Mei", "Nadia", "Omar", "Priya", "Quinn", "Rosa", "Sven", "Tariq",
];

const LAST_NAMES: &[&str] = &[
    "Alvarez", "Becker", "Chen", "Dubois", "Eriksen", "Fischer", "Garcia", "Haas", "Ito",
    "Jensen", "Kowalski", "Lindqvist", "Moreau", "Novak", "Okafor", "Petrov", "Rossi", "Silva",
];

/// Attempts before giving up on a username collision.
const MAX_USERNAME_ATTEMPTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
enum GroupChoice {
    None,
    Fixed(DbId),
    /// Any group except those named here.
    Random(Vec<String>),
}

/// Builder producing users with a primary email and preference.
#[derive(Debug, Clone)]
pub struct UserFactory {
    password_hash: String,
    group: GroupChoice,
    verified: bool,
    status: UserStatus,
}

impl UserFactory {
    /// Factory whose users all share `password_hash` (hash once, reuse).
    pub fn new(password_hash: impl Into<String>) -> Self {
        Self {
            password_hash: password_hash.into(),
            group: GroupChoice::None,
            verified: true,
            status: UserStatus::Active,
        }
    }

    pub fn with_group(mut self, group_id: DbId) -> Self {
        self.group = GroupChoice::Fixed(group_id);
        self
    }

    /// Place each user in a randomly chosen existing group. Users stay
    /// ungrouped when no group exists.
    pub fn in_random_group(self) -> Self {
        self.in_random_group_except(&[])
    }

    /// Like [`UserFactory::in_random_group`], never picking a group named in
    /// `excluded`. Users stay ungrouped when every group is excluded.
    pub fn in_random_group_except(mut self, excluded: &[&str]) -> Self {
        self.group = GroupChoice::Random(excluded.iter().map(|n| n.to_string()).collect());
        self
    }

    /// Leave the primary email unverified.
    pub fn unverified(mut self) -> Self {
        self.verified = false;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.status = UserStatus::Inactive;
        self
    }

    /// Random input for one user. The email is derived from the username.
    pub fn definition(&self, group_id: Option<DbId>) -> CreateUser {
        let mut rng = rand::rng();
        let first = FIRST_NAMES[rng.random_range(0..FIRST_NAMES.len())];
        let last = LAST_NAMES[rng.random_range(0..LAST_NAMES.len())];
        let suffix: u32 = rng.random_range(0..1_000_000);
        let username = format!("{}.{}{suffix:06}", first.to_lowercase(), last.to_lowercase());

        CreateUser {
            name: format!("{first} {last}"),
            email: format!("{username}@{FACTORY_EMAIL_DOMAIN}"),
            username,
            password_hash: self.password_hash.clone(),
            avatar: None,
            group_id,
            email_verified: true,
        }
    }

    /// Create one user through the normal identity lifecycle, then apply
    /// the requested state changes.
    pub async fn create(&self, pool: &PgPool) -> Result<User, sqlx::Error> {
        let group_id = match &self.group {
            GroupChoice::None => None,
            GroupChoice::Fixed(id) => Some(*id),
            GroupChoice::Random(excluded) => GroupRepo::random_id(pool, excluded).await?,
        };

        let mut user = self.insert_with_retry(pool, group_id).await?;

        if !self.verified {
            ContactRepo::clear_primary_verification(pool, user.id).await?;
        }
        if self.status != UserStatus::Active {
            UserRepo::set_status(pool, user.id, self.status).await?;
            user.status_id = self.status.id();
        }

        Ok(user)
    }

    pub async fn create_many(&self, pool: &PgPool, count: usize) -> Result<Vec<User>, sqlx::Error> {
        let mut users = Vec::with_capacity(count);
        for _ in 0..count {
            users.push(self.create(pool).await?);
        }
        tracing::debug!(count, "Created synthetic users");
        Ok(users)
    }

    async fn insert_with_retry(
        &self,
        pool: &PgPool,
        group_id: Option<DbId>,
    ) -> Result<User, sqlx::Error> {
        let mut attempt = 1;
        loop {
            let input = self.definition(group_id);
            match UserRepo::create(pool, &input).await {
                Err(sqlx::Error::Database(db_err))
                    if db_err.constraint() == Some("uq_users_username")
                        && attempt < MAX_USERNAME_ATTEMPTS =>
                {
                    tracing::debug!(username = %input.username, attempt, "Username taken, retrying");
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}
