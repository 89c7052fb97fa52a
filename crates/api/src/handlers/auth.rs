//! Handlers for the `/auth` resource (login, refresh, logout, me).

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use erp_core::auth::{AuthFailure, LoginForm};
use erp_core::i18n::{translate, AuthMessage};
use erp_db::models::contact::{UserEmailResponse, UserPhoneResponse};
use erp_db::models::preference::PreferenceResponse;
use erp_db::models::user::{User, UserResponse};
use erp_db::repositories::{ContactRepo, PreferenceRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{generate_access_token, generate_remember_token, hash_remember_token};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::middleware::auth::AuthUser;
use crate::middleware::locale::RequestLocale;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// Consecutive failed attempts that lock the account.
const MAX_FAILED_ATTEMPTS: i32 = 5;

/// Lock duration once the threshold is reached.
const LOCK_DURATION_MINS: i64 = 15;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub remember_token: String,
}

/// Successful authentication response returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub access_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    /// Present when a remember token was requested or rotated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remember_token: Option<String>,
    pub user: UserResponse,
}

/// Request body for `PUT /auth/password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub password: String,
}

/// The authenticated user with their related records.
#[derive(Debug, Serialize)]
pub struct CurrentUser {
    pub user: UserResponse,
    pub is_admin: bool,
    pub emails: Vec<UserEmailResponse>,
    pub phones: Vec<UserPhoneResponse>,
    pub preference: Option<PreferenceResponse>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
///
/// Authenticate with username + password. Issues an access token and, with
/// `remember = true`, a remember token.
pub async fn login(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    JsonBody(form): JsonBody<LoginForm>,
) -> AppResult<Json<AuthResponse>> {
    let credentials = form.into_credentials()?;
    let reject = |failure| AppError::auth(failure, locale);

    let user = UserRepo::find_by_username(&state.pool, &credentials.username)
        .await?
        .ok_or_else(|| reject(AuthFailure::Failed))?;

    if let Some(locked_until) = user.locked_until {
        let remaining = (locked_until - Utc::now()).num_seconds();
        if remaining > 0 {
            return Err(reject(AuthFailure::Throttled { seconds: remaining }));
        }
    }

    let password_valid = verify_password(&credentials.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        let failures = UserRepo::increment_failed_login(&state.pool, user.id).await?;
        if failures >= MAX_FAILED_ATTEMPTS {
            let lock_until = Utc::now() + chrono::Duration::minutes(LOCK_DURATION_MINS);
            UserRepo::lock_account(&state.pool, user.id, lock_until).await?;
            tracing::warn!(user_id = user.id, failures, "Account locked after failed logins");
        }
        return Err(reject(AuthFailure::Failed));
    }

    // Only callers holding the right password learn the account is inactive.
    if !user.is_active() {
        return Err(reject(AuthFailure::UserInactive));
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;
    tracing::info!(user_id = user.id, remember = credentials.remember, "User logged in");

    let response = issue_tokens(&state, user, credentials.remember).await?;
    Ok(Json(AuthResponse {
        message: Some(translate(locale, AuthMessage::LoginSuccess).to_string()),
        ..response
    }))
}

/// POST /api/auth/refresh
///
/// Exchange a remember token for a new access token and a rotated remember
/// token. The presented token stops working.
pub async fn refresh(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    JsonBody(input): JsonBody<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token_hash = hash_remember_token(&input.remember_token);

    let user = UserRepo::find_by_remember_token(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| AppError::auth(AuthFailure::TokenInvalid, locale))?;

    if !user.is_active() {
        UserRepo::clear_remember_token(&state.pool, user.id).await?;
        return Err(AppError::auth(AuthFailure::UserInactive, locale));
    }

    let response = issue_tokens(&state, user, true).await?;
    Ok(Json(response))
}

/// POST /api/auth/logout
///
/// Revoke the remember token of the authenticated user. Access tokens expire
/// on their own.
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<MessageResponse>> {
    UserRepo::clear_remember_token(&state.pool, auth.user_id).await?;
    tracing::info!(user_id = auth.user_id, "User logged out");

    Ok(Json(MessageResponse {
        message: translate(auth.locale, AuthMessage::LogoutSuccess).to_string(),
    }))
}

/// PUT /api/auth/password
///
/// Replace the caller's password after re-confirming the current one. Any
/// remember token is revoked.
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(input): JsonBody<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    validate_password_strength(&input.password)?;

    let user = super::load_user(&state, auth.user_id).await?;
    let confirmed = verify_password(&input.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !confirmed {
        return Err(AppError::auth(AuthFailure::Password, auth.locale));
    }

    let hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &hash).await?;
    UserRepo::clear_remember_token(&state.pool, user.id).await?;
    tracing::info!(user_id = user.id, "Password changed");

    Ok(Json(MessageResponse {
        message: "Password updated successfully.".to_string(),
    }))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<CurrentUser>>> {
    let user = super::load_user(&state, auth.user_id).await?;
    let emails = ContactRepo::list_emails(&state.pool, user.id).await?;
    let phones = ContactRepo::list_phones(&state.pool, user.id).await?;

    let preference = match PreferenceRepo::find_by_user(&state.pool, user.id).await? {
        Some(preference) => Some(PreferenceResponse {
            effective_theme: PreferenceRepo::resolve_theme(&state.pool, user.id).await?,
            preference,
        }),
        None => None,
    };

    Ok(Json(DataResponse {
        data: CurrentUser {
            user: UserResponse::from(&user),
            is_admin: auth.is_admin(),
            emails: emails.into_iter().map(Into::into).collect(),
            phones: phones.into_iter().map(Into::into).collect(),
            preference,
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Sign an access token and, when asked, store and return a new remember token.
async fn issue_tokens(
    state: &AppState,
    user: User,
    remember: bool,
) -> AppResult<AuthResponse> {
    let jwt = &state.config.jwt;
    let access_token = generate_access_token(user.id, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let remember_token = if remember {
        let (plaintext, hash) = generate_remember_token();
        let expires_at = Utc::now() + chrono::Duration::days(jwt.remember_token_expiry_days);
        UserRepo::set_remember_token(&state.pool, user.id, &hash, expires_at).await?;
        Some(plaintext)
    } else {
        None
    };

    Ok(AuthResponse {
        message: None,
        access_token,
        token_type: "Bearer",
        expires_in: jwt.access_token_expiry_secs(),
        remember_token,
        user: UserResponse::from(&user),
    })
}
