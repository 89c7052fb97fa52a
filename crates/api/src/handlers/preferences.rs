//! Handlers for `/users/{id}/preference`.

use axum::extract::{Path, State};
use axum::Json;
use erp_core::error::{check_fields, CoreError};
use erp_core::identity::{validate_locale, validate_timezone};
use erp_core::policy::{Action, EntityKind, Target};
use erp_core::types::DbId;
use erp_db::models::preference::{PreferenceResponse, UpdatePreference, UserPreference};
use erp_db::repositories::{PreferenceRepo, ThemeRepo};

use crate::error::AppResult;
use crate::extract::JsonBody;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/users/{id}/preference
///
/// Includes the theme that actually applies (explicit or default).
pub async fn show(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<PreferenceResponse>>> {
    let preference = load_preference(&state, user_id).await?;
    auth.authorize(&state, EntityKind::UserPreference, Action::View, Some(&target(&preference)))?;

    respond(&state, preference).await
}

/// PUT /api/users/{id}/preference
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<DbId>,
    JsonBody(input): JsonBody<UpdatePreference>,
) -> AppResult<Json<DataResponse<PreferenceResponse>>> {
    let preference = load_preference(&state, user_id).await?;
    auth.authorize(
        &state,
        EntityKind::UserPreference,
        Action::Update,
        Some(&target(&preference)),
    )?;

    check_fields([
        input.locale.as_deref().map_or(Ok(()), validate_locale),
        input.timezone.as_deref().map_or(Ok(()), validate_timezone),
    ])?;
    if let Some(theme_id) = input.theme_id {
        if ThemeRepo::find_by_id(&state.pool, theme_id).await?.is_none() {
            return Err(CoreError::field("theme_id", "The selected theme is invalid.").into());
        }
    }

    let updated = PreferenceRepo::update(&state.pool, user_id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "UserPreference",
            id: user_id,
        })?;
    tracing::info!(user_id, "Preference updated");

    respond(&state, updated).await
}

fn target(preference: &UserPreference) -> Target {
    Target::owned_by(preference.id, preference.user_id)
}

async fn load_preference(state: &AppState, user_id: DbId) -> AppResult<UserPreference> {
    super::load_user(state, user_id).await?;
    PreferenceRepo::find_by_user(&state.pool, user_id)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "UserPreference",
                id: user_id,
            }
            .into()
        })
}

async fn respond(
    state: &AppState,
    preference: UserPreference,
) -> AppResult<Json<DataResponse<PreferenceResponse>>> {
    let effective_theme = PreferenceRepo::resolve_theme(&state.pool, preference.user_id).await?;
    Ok(Json(DataResponse {
        data: PreferenceResponse {
            preference,
            effective_theme,
        },
    }))
}
