//! Authentication failures and login form validation.

use std::fmt;

use serde::Deserialize;
use validator::Validate;

use crate::error::{CoreError, FieldErrors};
use crate::i18n::{render, AuthMessage, Locale};
use crate::identity::USERNAME_MAX_LENGTH;

/// Minimum length of a login password.
pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Why a request could not be authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// Unknown username or wrong password.
    Failed,
    /// Wrong password on a re-confirmation step.
    Password,
    /// Too many failed attempts; retry after `seconds`.
    Throttled { seconds: i64 },
    /// No credentials presented.
    Unauthorized,
    TokenExpired,
    TokenInvalid,
    UserNotFound,
    UserInactive,
}

impl AuthFailure {
    pub fn message_key(self) -> AuthMessage {
        match self {
            AuthFailure::Failed => AuthMessage::Failed,
            AuthFailure::Password => AuthMessage::Password,
            AuthFailure::Throttled { .. } => AuthMessage::Throttle,
            AuthFailure::Unauthorized => AuthMessage::Unauthorized,
            AuthFailure::TokenExpired => AuthMessage::TokenExpired,
            AuthFailure::TokenInvalid => AuthMessage::TokenInvalid,
            AuthFailure::UserNotFound => AuthMessage::UserNotFound,
            AuthFailure::UserInactive => AuthMessage::UserInactive,
        }
    }

    /// Stable machine-readable code for API clients.
    pub fn code(self) -> &'static str {
        match self {
            AuthFailure::Failed => "AUTH_FAILED",
            AuthFailure::Password => "AUTH_PASSWORD",
            AuthFailure::Throttled { .. } => "AUTH_THROTTLED",
            AuthFailure::Unauthorized => "UNAUTHORIZED",
            AuthFailure::TokenExpired => "TOKEN_EXPIRED",
            AuthFailure::TokenInvalid => "TOKEN_INVALID",
            AuthFailure::UserNotFound => "USER_NOT_FOUND",
            AuthFailure::UserInactive => "USER_INACTIVE",
        }
    }

    /// Localized message for this failure.
    pub fn message(self, locale: Locale) -> String {
        let seconds = match self {
            AuthFailure::Throttled { seconds } => Some(seconds),
            _ => None,
        };
        render(locale, self.message_key(), seconds)
    }
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message(Locale::En))
    }
}

impl From<AuthFailure> for CoreError {
    fn from(failure: AuthFailure) -> Self {
        CoreError::Unauthenticated(failure)
    }
}

/// Body of `POST /auth/login`.
///
/// Fields are optional at the serde level so a missing field becomes a
/// field-level "required" message instead of a deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(length(max = 50))]
    pub username: Option<String>,
    #[serde(default)]
    #[validate(length(min = 6))]
    pub password: Option<String>,
    /// Issue a long-lived remember token alongside the access token.
    #[serde(default)]
    pub remember: bool,
}

/// Validated login credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub remember: bool,
}

impl LoginForm {
    /// Run the login rules, returning the credentials or every field message.
    pub fn into_credentials(self) -> Result<Credentials, CoreError> {
        let length_errors = self.validate().err();
        let length_failed = |field: &str| {
            length_errors
                .as_ref()
                .is_some_and(|e| e.field_errors().contains_key(field))
        };

        let mut errors = FieldErrors::new();

        if is_blank(self.username.as_deref()) {
            push(&mut errors, "username", "The username field is required.");
        } else if length_failed("username") {
            push(
                &mut errors,
                "username",
                format!(
                    "The username field must not be greater than {USERNAME_MAX_LENGTH} characters."
                ),
            );
        }

        if is_blank(self.password.as_deref()) {
            push(&mut errors, "password", "The password field is required.");
        } else if length_failed("password") {
            push(
                &mut errors,
                "password",
                format!("The password field must be at least {PASSWORD_MIN_LENGTH} characters."),
            );
        }

        if !errors.is_empty() {
            return Err(CoreError::InvalidInput(errors));
        }

        Ok(Credentials {
            username: self.username.unwrap_or_default().trim().to_string(),
            password: self.password.unwrap_or_default(),
            remember: self.remember,
        })
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

fn push(errors: &mut FieldErrors, field: &str, message: impl Into<String>) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.into());
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn form(username: Option<&str>, password: Option<&str>) -> LoginForm {
        LoginForm {
            username: username.map(str::to_string),
            password: password.map(str::to_string),
            remember: false,
        }
    }

    fn field_errors(result: Result<Credentials, CoreError>) -> FieldErrors {
        match result {
            Err(CoreError::InvalidInput(errors)) => errors,
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn valid_form_yields_credentials() {
        let creds = form(Some("alice"), Some("secret1")).into_credentials().unwrap();
        assert_eq!(creds.username, "alice");
        assert_eq!(creds.password, "secret1");
        assert!(!creds.remember);
    }

    #[test]
    fn username_is_trimmed_but_password_is_not() {
        let creds = form(Some("  alice "), Some(" secret1 ")).into_credentials().unwrap();
        assert_eq!(creds.username, "alice");
        assert_eq!(creds.password, " secret1 ");
    }

    #[test]
    fn missing_fields_are_required() {
        let errors = field_errors(form(None, None).into_credentials());
        assert_eq!(errors["username"], vec!["The username field is required."]);
        assert_eq!(errors["password"], vec!["The password field is required."]);
    }

    #[test]
    fn blank_username_is_required_not_length() {
        let errors = field_errors(form(Some("   "), Some("secret1")).into_credentials());
        assert_eq!(errors["username"], vec!["The username field is required."]);
        assert!(!errors.contains_key("password"));
    }

    #[test]
    fn username_longer_than_fifty_fails() {
        let long = "u".repeat(51);
        let errors = field_errors(form(Some(&long), Some("secret1")).into_credentials());
        assert_eq!(
            errors["username"],
            vec!["The username field must not be greater than 50 characters."]
        );

        let exact = "u".repeat(50);
        assert!(form(Some(&exact), Some("secret1")).into_credentials().is_ok());
    }

    #[test]
    fn short_password_fails() {
        let errors = field_errors(form(Some("alice"), Some("12345")).into_credentials());
        assert_eq!(
            errors["password"],
            vec!["The password field must be at least 6 characters."]
        );
        assert!(form(Some("alice"), Some("123456")).into_credentials().is_ok());
    }

    #[test]
    fn failure_messages_are_localized() {
        assert_eq!(
            AuthFailure::Throttled { seconds: 30 }.message(Locale::En),
            "Too many login attempts. Please try again in 30 seconds."
        );
        assert_eq!(AuthFailure::UserNotFound.message(Locale::Fr), "Utilisateur introuvable.");
        assert_eq!(AuthFailure::TokenExpired.code(), "TOKEN_EXPIRED");
    }

    #[test]
    fn failure_converts_into_core_error() {
        let err: CoreError = AuthFailure::UserInactive.into();
        assert_matches!(err, CoreError::Unauthenticated(AuthFailure::UserInactive));
    }
}
