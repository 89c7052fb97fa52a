//! Handlers for a user's email addresses and phone numbers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use erp_core::error::CoreError;
use erp_core::identity::{validate_email_address, validate_phone_number};
use erp_core::policy::{Action, EntityKind, Target};
use erp_core::types::DbId;
use erp_db::models::contact::{
    CreateUserEmail, CreateUserPhone, UserEmail, UserEmailResponse, UserPhone, UserPhoneResponse,
};
use erp_db::repositories::ContactRepo;

use super::load_user;
use crate::error::AppResult;
use crate::extract::JsonBody;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Emails
// ---------------------------------------------------------------------------

/// GET /api/users/{id}/emails
pub async fn list_emails(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<UserEmailResponse>>>> {
    let user = load_user(&state, user_id).await?;
    // The collection is addressed as a record owned by the user.
    let target = Target::owned_by(user.id, user.id);
    auth.authorize(&state, EntityKind::UserEmail, Action::View, Some(&target))?;

    let emails = ContactRepo::list_emails(&state.pool, user.id).await?;
    Ok(Json(DataResponse {
        data: emails.into_iter().map(Into::into).collect(),
    }))
}

/// POST /api/users/{id}/emails
///
/// Adds a secondary, unverified address.
pub async fn add_email(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<DbId>,
    JsonBody(input): JsonBody<CreateUserEmail>,
) -> AppResult<(StatusCode, Json<DataResponse<UserEmailResponse>>)> {
    let user = load_user(&state, user_id).await?;
    let owner = Target::unsaved(user.id);
    auth.authorize(&state, EntityKind::UserEmail, Action::Create, Some(&owner))?;
    validate_email_address(&input.email)?;

    let input = CreateUserEmail {
        email: input.email.trim().to_string(),
        ..input
    };
    let email = ContactRepo::add_email(&state.pool, user.id, &input).await?;
    tracing::info!(user_id = user.id, email_id = email.id, "Email added");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse { data: email.into() }),
    ))
}

/// PUT /api/users/{id}/emails/{email_id}/primary
pub async fn set_primary_email(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((user_id, email_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<UserEmailResponse>>> {
    let email = load_email(&state, user_id, email_id).await?;
    auth.authorize(&state, EntityKind::UserEmail, Action::Update, Some(&email.as_target()))?;

    let email = ContactRepo::set_primary_email(&state.pool, user_id, email_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "UserEmail",
            id: email_id,
        })?;
    tracing::info!(user_id, email_id, "Primary email changed");

    Ok(Json(DataResponse { data: email.into() }))
}

/// DELETE /api/users/{id}/emails/{email_id}
///
/// The primary email cannot be removed; promote another address first.
pub async fn delete_email(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((user_id, email_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let email = load_email(&state, user_id, email_id).await?;
    auth.authorize(&state, EntityKind::UserEmail, Action::Delete, Some(&email.as_target()))?;

    if email.is_primary || !ContactRepo::delete_email(&state.pool, email.id).await? {
        return Err(CoreError::Conflict("The primary email address cannot be removed.".into()).into());
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Phones
// ---------------------------------------------------------------------------

/// GET /api/users/{id}/phones
pub async fn list_phones(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<UserPhoneResponse>>>> {
    let user = load_user(&state, user_id).await?;
    let target = Target::owned_by(user.id, user.id);
    auth.authorize(&state, EntityKind::UserPhone, Action::View, Some(&target))?;

    let phones = ContactRepo::list_phones(&state.pool, user.id).await?;
    Ok(Json(DataResponse {
        data: phones.into_iter().map(Into::into).collect(),
    }))
}

/// POST /api/users/{id}/phones
pub async fn add_phone(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<DbId>,
    JsonBody(input): JsonBody<CreateUserPhone>,
) -> AppResult<(StatusCode, Json<DataResponse<UserPhoneResponse>>)> {
    let user = load_user(&state, user_id).await?;
    let owner = Target::unsaved(user.id);
    auth.authorize(&state, EntityKind::UserPhone, Action::Create, Some(&owner))?;
    validate_phone_number(&input.number)?;

    let input = CreateUserPhone {
        number: input.number.trim().to_string(),
        ..input
    };
    let phone = ContactRepo::add_phone(&state.pool, user.id, &input).await?;
    tracing::info!(user_id = user.id, phone_id = phone.id, "Phone added");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse { data: phone.into() }),
    ))
}

/// DELETE /api/users/{id}/phones/{phone_id}
pub async fn delete_phone(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((user_id, phone_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let phone = load_phone(&state, user_id, phone_id).await?;
    auth.authorize(&state, EntityKind::UserPhone, Action::Delete, Some(&phone.as_target()))?;

    ContactRepo::delete_phone(&state.pool, phone.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load an email that belongs to `user_id`; anything else is a 404.
async fn load_email(state: &AppState, user_id: DbId, email_id: DbId) -> AppResult<UserEmail> {
    ContactRepo::find_email(&state.pool, email_id)
        .await?
        .filter(|e| e.user_id == user_id)
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "UserEmail",
                id: email_id,
            }
            .into()
        })
}

async fn load_phone(state: &AppState, user_id: DbId, phone_id: DbId) -> AppResult<UserPhone> {
    ContactRepo::find_phone(&state.pool, phone_id)
        .await?
        .filter(|p| p.user_id == user_id)
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "UserPhone",
                id: phone_id,
            }
            .into()
        })
}
