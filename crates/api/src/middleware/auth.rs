//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use erp_core::auth::AuthFailure;
use erp_core::i18n::Locale;
use erp_core::policy::{Action, Actor, EntityKind, Target};
use erp_core::types::DbId;
use erp_db::repositories::UserRepo;

use super::locale::RequestLocale;
use crate::auth::jwt::{classify_token_error, validate_token};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Authenticated, active user extracted from a JWT Bearer token.
///
/// The user row is loaded on every request so status and group changes take
/// effect without waiting for the token to expire.
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     auth.authorize(&state, EntityKind::Group, Action::ViewAny, None)?;
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub actor: Actor,
    /// Negotiated response language.
    pub locale: Locale,
}

impl AuthUser {
    /// Run the registered policy for `kind`, mapping a denial to 403.
    pub fn authorize(
        &self,
        state: &AppState,
        kind: EntityKind,
        action: Action,
        target: Option<&Target>,
    ) -> AppResult<()> {
        state
            .policies
            .authorize(&self.actor, kind, action, target)
            .map_err(AppError::from)
    }

    pub fn is_admin(&self) -> bool {
        self.actor.is_admin()
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequestLocale(locale) = RequestLocale::from_parts(parts);
        let reject = |failure| AppError::auth(failure, locale);

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| reject(AuthFailure::Unauthorized))?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|e| reject(classify_token_error(&e)))?;

        let actor: Actor = UserRepo::find_actor(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| reject(AuthFailure::UserNotFound))?
            .into();

        if !actor.is_active() {
            tracing::debug!(user_id = actor.user_id, "Rejected token of inactive user");
            return Err(reject(AuthFailure::UserInactive));
        }

        Ok(AuthUser {
            user_id: actor.user_id,
            actor,
            locale,
        })
    }
}
