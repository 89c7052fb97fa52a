//! Request handlers, one module per resource.

pub mod auth;
pub mod contacts;
pub mod dashboard_layout;
pub mod groups;
pub mod preferences;
pub mod themes;
pub mod users;

use erp_core::error::CoreError;
use erp_core::types::DbId;
use erp_db::models::user::User;
use erp_db::repositories::UserRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// Load a user or fail with 404.
pub(crate) async fn load_user(state: &AppState, id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::NotFound { entity: "User", id }.into())
}

/// Trimmed `name` field, required to be non-empty.
pub(crate) fn required_name(name: &str) -> Result<String, CoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::field("name", "The name field is required."));
    }
    Ok(name.to_string())
}
