//! Group entity model and DTOs.

use erp_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `groups` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Group {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new group.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGroup {
    pub name: String,
}

/// DTO for renaming a group.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateGroup {
    pub name: Option<String>,
}
