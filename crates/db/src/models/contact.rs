//! Email address and phone number models.

use erp_core::lookup::{EmailType, LookupId, PhoneType};
use erp_core::policy::Target;
use erp_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `user_emails` table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEmail {
    pub id: DbId,
    pub user_id: DbId,
    pub email: String,
    pub type_id: LookupId,
    pub is_primary: bool,
    pub verified_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserEmail {
    pub fn email_type(&self) -> Option<EmailType> {
        EmailType::from_id(self.type_id)
    }

    pub fn is_verified(&self) -> bool {
        self.verified_at.is_some()
    }

    pub fn as_target(&self) -> Target {
        Target::owned_by(self.id, self.user_id)
    }
}

/// A row from the `user_phones` table.
#[derive(Debug, Clone, FromRow)]
pub struct UserPhone {
    pub id: DbId,
    pub user_id: DbId,
    pub number: String,
    pub type_id: LookupId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserPhone {
    pub fn phone_type(&self) -> Option<PhoneType> {
        PhoneType::from_id(self.type_id)
    }

    pub fn as_target(&self) -> Target {
        Target::owned_by(self.id, self.user_id)
    }
}

/// DTO for adding a secondary email. New addresses start unverified.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserEmail {
    pub email: String,
    #[serde(rename = "type", default = "default_email_type")]
    pub email_type: EmailType,
}

fn default_email_type() -> EmailType {
    EmailType::Personal
}

/// DTO for adding a phone number.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserPhone {
    pub number: String,
    #[serde(rename = "type", default = "default_phone_type")]
    pub phone_type: PhoneType,
}

fn default_phone_type() -> PhoneType {
    PhoneType::Work
}

/// Email as returned by the API, with the type resolved to its name.
#[derive(Debug, Clone, Serialize)]
pub struct UserEmailResponse {
    pub id: DbId,
    pub user_id: DbId,
    pub email: String,
    #[serde(rename = "type")]
    pub email_type: Option<EmailType>,
    pub is_primary: bool,
    pub verified_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<UserEmail> for UserEmailResponse {
    fn from(row: UserEmail) -> Self {
        Self {
            email_type: row.email_type(),
            id: row.id,
            user_id: row.user_id,
            email: row.email,
            is_primary: row.is_primary,
            verified_at: row.verified_at,
            created_at: row.created_at,
        }
    }
}

/// Phone number as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct UserPhoneResponse {
    pub id: DbId,
    pub user_id: DbId,
    pub number: String,
    #[serde(rename = "type")]
    pub phone_type: Option<PhoneType>,
    pub created_at: Timestamp,
}

impl From<UserPhone> for UserPhoneResponse {
    fn from(row: UserPhone) -> Self {
        Self {
            phone_type: row.phone_type(),
            id: row.id,
            user_id: row.user_id,
            number: row.number,
            created_at: row.created_at,
        }
    }
}
