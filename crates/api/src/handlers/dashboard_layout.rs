//! Handlers for the caller's dashboard layout.
//!
//! Every user reads and writes only their own layout; there is no user id in
//! the path.

use axum::extract::State;
use axum::Json;
use erp_core::layout::{default_layout, validate_layout_config};
use erp_core::policy::{Action, EntityKind, Target};
use erp_db::repositories::DashboardLayoutRepo;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppResult;
use crate::extract::JsonBody;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub const LAYOUT_SAVED_MESSAGE: &str = "Dashboard layout saved successfully.";

/// Body of `PUT /dashboard-layout`.
///
/// The field is optional at the serde level so a missing value becomes a
/// field-level "required" message.
#[derive(Debug, Deserialize)]
pub struct SaveLayoutRequest {
    #[serde(default)]
    pub layout_config: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct LayoutResponse {
    pub layout_config: Value,
}

#[derive(Debug, Serialize)]
pub struct SaveLayoutResponse {
    pub message: &'static str,
    pub layout_config: Value,
}

/// GET /api/dashboard-layout
///
/// The stored layout, or the default layout when none was saved.
pub async fn show(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<LayoutResponse>> {
    let stored = DashboardLayoutRepo::find_by_user(&state.pool, auth.user_id).await?;

    let target = Target::owned_by(stored.as_ref().map_or(auth.user_id, |l| l.id), auth.user_id);
    auth.authorize(&state, EntityKind::DashboardLayout, Action::View, Some(&target))?;

    let layout_config = stored.map_or_else(default_layout, |layout| layout.layout_config);
    Ok(Json(LayoutResponse { layout_config }))
}

/// PUT /api/dashboard-layout
///
/// Validate, then create or replace the caller's layout. Storage is left
/// untouched when validation fails.
pub async fn save(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(input): JsonBody<SaveLayoutRequest>,
) -> AppResult<Json<SaveLayoutResponse>> {
    let layout_config = validate_layout_config(input.layout_config)?;

    match DashboardLayoutRepo::find_by_user(&state.pool, auth.user_id).await? {
        Some(existing) => {
            let target = Target::owned_by(existing.id, existing.user_id);
            auth.authorize(&state, EntityKind::DashboardLayout, Action::Update, Some(&target))?;
        }
        None => {
            let owner = Target::unsaved(auth.user_id);
            auth.authorize(&state, EntityKind::DashboardLayout, Action::Create, Some(&owner))?;
        }
    }

    let saved = DashboardLayoutRepo::upsert(&state.pool, auth.user_id, &layout_config).await?;
    tracing::info!(
        user_id = auth.user_id,
        widgets = saved.layout_config.as_array().map_or(0, Vec::len),
        "Dashboard layout saved",
    );

    Ok(Json(SaveLayoutResponse {
        message: LAYOUT_SAVED_MESSAGE,
        layout_config: saved.layout_config,
    }))
}
