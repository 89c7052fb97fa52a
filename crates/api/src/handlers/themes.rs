//! Handlers for the `/themes` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use erp_core::error::CoreError;
use erp_core::policy::{Action, EntityKind, Target};
use erp_core::types::DbId;
use erp_db::models::theme::{CreateTheme, Theme, UpdateTheme};
use erp_db::repositories::ThemeRepo;

use super::required_name;
use crate::error::AppResult;
use crate::extract::JsonBody;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/themes
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Theme>>>> {
    auth.authorize(&state, EntityKind::Theme, Action::ViewAny, None)?;
    let themes = ThemeRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: themes }))
}

/// POST /api/themes
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(input): JsonBody<CreateTheme>,
) -> AppResult<(StatusCode, Json<DataResponse<Theme>>)> {
    auth.authorize(&state, EntityKind::Theme, Action::Create, None)?;
    let name = required_name(&input.name)?;

    let theme = ThemeRepo::create(
        &state.pool,
        &CreateTheme {
            name,
            is_default: input.is_default,
        },
    )
    .await?;
    tracing::info!(theme_id = theme.id, is_default = theme.is_default, "Theme created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: theme })))
}

/// PUT /api/themes/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    JsonBody(input): JsonBody<UpdateTheme>,
) -> AppResult<Json<DataResponse<Theme>>> {
    load_theme(&state, id).await?;
    auth.authorize(&state, EntityKind::Theme, Action::Update, Some(&Target::shared(id)))?;

    let name = input.name.as_deref().map(required_name).transpose()?;
    let theme = ThemeRepo::update(&state.pool, id, &UpdateTheme { name })
        .await?
        .ok_or(CoreError::NotFound { entity: "Theme", id })?;

    Ok(Json(DataResponse { data: theme }))
}

/// PUT /api/themes/{id}/default
///
/// Make this theme the single default.
pub async fn set_default(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Theme>>> {
    load_theme(&state, id).await?;
    auth.authorize(&state, EntityKind::Theme, Action::Update, Some(&Target::shared(id)))?;

    let theme = ThemeRepo::set_default(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Theme", id })?;
    tracing::info!(theme_id = id, "Default theme changed");

    Ok(Json(DataResponse { data: theme }))
}

/// DELETE /api/themes/{id}
///
/// Users who picked this theme fall back to the default one.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_theme(&state, id).await?;
    auth.authorize(&state, EntityKind::Theme, Action::Delete, Some(&Target::shared(id)))?;

    ThemeRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn load_theme(state: &AppState, id: DbId) -> AppResult<Theme> {
    ThemeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::NotFound { entity: "Theme", id }.into())
}
