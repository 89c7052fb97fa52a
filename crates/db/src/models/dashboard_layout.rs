//! Dashboard layout entity model.

use erp_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `dashboard_layouts` table. One row per user at most.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DashboardLayout {
    pub id: DbId,
    pub user_id: DbId,
    pub layout_config: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
