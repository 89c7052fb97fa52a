use std::collections::BTreeMap;

use crate::auth::AuthFailure;
use crate::types::DbId;

/// Field name to the list of human-readable messages for that field.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid input: {}", summarize(.0))]
    InvalidInput(FieldErrors),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(AuthFailure),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Build an [`CoreError::InvalidInput`] carrying a single field message.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        CoreError::InvalidInput(errors)
    }
}

/// Run several field checks and report every failing field at once.
///
/// Non-field errors short-circuit and are returned as-is.
pub fn check_fields<I>(checks: I) -> Result<(), CoreError>
where
    I: IntoIterator<Item = Result<(), CoreError>>,
{
    let mut errors = FieldErrors::new();
    for check in checks {
        match check {
            Ok(()) => {}
            Err(CoreError::InvalidInput(fields)) => {
                for (field, messages) in fields {
                    errors.entry(field).or_default().extend(messages);
                }
            }
            Err(other) => return Err(other),
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(CoreError::InvalidInput(errors))
    }
}

/// First message of the first failing field, used as the headline message.
pub fn summarize(errors: &FieldErrors) -> String {
    errors
        .values()
        .flat_map(|messages| messages.iter())
        .next()
        .cloned()
        .unwrap_or_else(|| "The given data was invalid.".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_fields_merges_every_failure() {
        let result = check_fields([
            Ok(()),
            Err(CoreError::field("name", "The name field is required.")),
            Err(CoreError::field("email", "The email field must be a valid email address.")),
        ]);
        match result {
            Err(CoreError::InvalidInput(errors)) => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors["name"], vec!["The name field is required."]);
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(check_fields([Ok(()), Ok(())]).is_ok());
    }

    #[test]
    fn check_fields_passes_other_errors_through() {
        let result = check_fields([
            Err(CoreError::field("name", "required")),
            Err(CoreError::Conflict("taken".into())),
        ]);
        assert!(matches!(result, Err(CoreError::Conflict(_))));
    }

    #[test]
    fn field_error_carries_message() {
        let err = CoreError::field("layout_config", "The layout config field is required.");
        match err {
            CoreError::InvalidInput(errors) => {
                assert_eq!(
                    errors["layout_config"],
                    vec!["The layout config field is required.".to_string()]
                );
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn summarize_empty_map_has_generic_message() {
        assert_eq!(summarize(&FieldErrors::new()), "The given data was invalid.");
    }
}
