//! Handlers for the `/groups` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use erp_core::error::CoreError;
use erp_core::policy::{Action, EntityKind, Target};
use erp_core::types::DbId;
use erp_db::models::group::{CreateGroup, Group, UpdateGroup};
use erp_db::models::user::UserResponse;
use erp_db::repositories::GroupRepo;
use serde::Serialize;

use super::required_name;
use crate::error::AppResult;
use crate::extract::JsonBody;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// A group with its members.
#[derive(Debug, Serialize)]
pub struct GroupDetail {
    #[serde(flatten)]
    pub group: Group,
    pub members: Vec<UserResponse>,
}

/// GET /api/groups
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Group>>>> {
    auth.authorize(&state, EntityKind::Group, Action::ViewAny, None)?;
    let groups = GroupRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: groups }))
}

/// POST /api/groups
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(input): JsonBody<CreateGroup>,
) -> AppResult<(StatusCode, Json<DataResponse<Group>>)> {
    auth.authorize(&state, EntityKind::Group, Action::Create, None)?;
    let name = required_name(&input.name)?;

    let group = GroupRepo::create(&state.pool, &CreateGroup { name }).await?;
    tracing::info!(group_id = group.id, name = %group.name, "Group created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: group })))
}

/// GET /api/groups/{id}
pub async fn show(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<GroupDetail>>> {
    let group = load_group(&state, id).await?;
    auth.authorize(&state, EntityKind::Group, Action::View, Some(&Target::shared(id)))?;

    let members = GroupRepo::list_members(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: GroupDetail {
            group,
            members: members.iter().map(UserResponse::from).collect(),
        },
    }))
}

/// PUT /api/groups/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    JsonBody(input): JsonBody<UpdateGroup>,
) -> AppResult<Json<DataResponse<Group>>> {
    load_group(&state, id).await?;
    auth.authorize(&state, EntityKind::Group, Action::Update, Some(&Target::shared(id)))?;

    let name = input.name.as_deref().map(required_name).transpose()?;
    let group = GroupRepo::update(&state.pool, id, &UpdateGroup { name })
        .await?
        .ok_or(CoreError::NotFound { entity: "Group", id })?;

    Ok(Json(DataResponse { data: group }))
}

/// DELETE /api/groups/{id}
///
/// Members stay, with their group cleared.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_group(&state, id).await?;
    auth.authorize(&state, EntityKind::Group, Action::Delete, Some(&Target::shared(id)))?;

    GroupRepo::delete(&state.pool, id).await?;
    tracing::info!(group_id = id, deleted_by = auth.user_id, "Group deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn load_group(state: &AppState, id: DbId) -> AppResult<Group> {
    GroupRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::NotFound { entity: "Group", id }.into())
}
