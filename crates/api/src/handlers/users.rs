//! Handlers for the `/users` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use erp_core::error::{check_fields, CoreError};
use erp_core::identity::{validate_display_name, validate_email_address, validate_username};
use erp_core::lookup::UserStatus;
use erp_core::policy::{Action, EntityKind};
use erp_core::types::DbId;
use erp_db::models::user::{CreateUser, UpdateUser, UserResponse};
use erp_db::repositories::{GroupRepo, UserRepo};
use serde::Deserialize;

use super::load_user;
use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub username: String,
    pub password: String,
    pub email: String,
    pub avatar: Option<String>,
    pub group_id: Option<DbId>,
}

/// Request body for `PUT /users/{id}`. Group and status are admin-only.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub username: Option<String>,
    pub avatar: Option<String>,
    /// Remove the avatar. Ignored when `avatar` is given.
    #[serde(default)]
    pub clear_avatar: bool,
    pub group_id: Option<DbId>,
    /// Take the user out of their group. Ignored when `group_id` is given.
    #[serde(default)]
    pub clear_group: bool,
    pub status: Option<UserStatus>,
}

impl UpdateUserRequest {
    fn changes_group_or_status(&self) -> bool {
        self.group_id.is_some() || self.clear_group || self.status.is_some()
    }
}

/// GET /api/users
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    auth.authorize(&state, EntityKind::User, Action::ViewAny, None)?;
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse {
        data: users.iter().map(UserResponse::from).collect(),
    }))
}

/// POST /api/users
///
/// Creates the user with a verified primary email and default preference.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(input): JsonBody<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    auth.authorize(&state, EntityKind::User, Action::Create, None)?;

    check_fields([
        validate_display_name(&input.name),
        validate_username(&input.username),
        validate_password_strength(&input.password),
        validate_email_address(&input.email),
    ])?;
    if let Some(group_id) = input.group_id {
        ensure_group_exists(&state, group_id).await?;
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.name.trim().to_string(),
            username: input.username.trim().to_string(),
            password_hash,
            avatar: input.avatar,
            group_id: input.group_id,
            email: input.email.trim().to_string(),
            email_verified: true,
        },
    )
    .await?;
    tracing::info!(user_id = user.id, created_by = auth.user_id, "User created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(&user),
        }),
    ))
}

/// GET /api/users/{id}
pub async fn show(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = load_user(&state, id).await?;
    auth.authorize(&state, EntityKind::User, Action::View, Some(&user.as_target()))?;
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// PUT /api/users/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    JsonBody(input): JsonBody<UpdateUserRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = load_user(&state, id).await?;
    auth.authorize(&state, EntityKind::User, Action::Update, Some(&user.as_target()))?;

    if input.changes_group_or_status() {
        auth.authorize(&state, EntityKind::User, Action::Manage, Some(&user.as_target()))?;
    }
    if input.status.is_some_and(|s| !s.is_active()) && id == auth.user_id {
        return Err(CoreError::Forbidden("You cannot deactivate your own account".into()).into());
    }

    check_fields([
        input.name.as_deref().map_or(Ok(()), validate_display_name),
        input.username.as_deref().map_or(Ok(()), validate_username),
    ])?;
    if let Some(group_id) = input.group_id {
        ensure_group_exists(&state, group_id).await?;
    }

    let updated = UserRepo::update(
        &state.pool,
        id,
        &UpdateUser {
            name: input.name.map(|n| n.trim().to_string()),
            username: input.username.map(|u| u.trim().to_string()),
            clear_avatar: input.clear_avatar && input.avatar.is_none(),
            avatar: input.avatar,
            clear_group: input.clear_group && input.group_id.is_none(),
            group_id: input.group_id,
            status: input.status,
        },
    )
    .await?
    .ok_or(CoreError::NotFound { entity: "User", id })?;

    Ok(Json(DataResponse {
        data: UserResponse::from(&updated),
    }))
}

/// POST /api/users/{id}/deactivate
///
/// Soft delete: the user is marked inactive and their remember token revoked.
pub async fn deactivate(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = load_user(&state, id).await?;
    auth.authorize(&state, EntityKind::User, Action::Delete, Some(&user.as_target()))?;

    if UserRepo::deactivate(&state.pool, id).await? {
        tracing::info!(user_id = id, deactivated_by = auth.user_id, "User deactivated");
    }

    let user = load_user(&state, id).await?;
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

async fn ensure_group_exists(state: &AppState, group_id: DbId) -> AppResult<()> {
    if GroupRepo::find_by_id(&state.pool, group_id).await?.is_none() {
        return Err(CoreError::field("group_id", "The selected group is invalid.").into());
    }
    Ok(())
}
