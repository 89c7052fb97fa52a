//! Theme entity model and DTOs.

use erp_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `themes` table.
///
/// At most one row has `is_default = true`; it is the fallback for users
/// whose preference names no theme.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Theme {
    pub id: DbId,
    pub name: String,
    pub is_default: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new theme.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTheme {
    pub name: String,
    /// Make the new theme the default, demoting the current one.
    #[serde(default)]
    pub is_default: bool,
}

/// DTO for renaming a theme. Default selection goes through `set_default`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTheme {
    pub name: Option<String>,
}
