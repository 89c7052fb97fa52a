//! Identity defaults and input rules for users and their contact records.

use validator::ValidateEmail;

use crate::error::CoreError;
use crate::i18n::Locale;

/// Locale assigned to every new user preference.
pub const DEFAULT_LOCALE: &str = "en";

/// Timezone assigned to every new user preference.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Members of this group are administrators for every policy.
///
/// Must match the group seeded by `erp-seed`.
pub const ADMIN_GROUP: &str = "administrators";

/// Maximum length of a username.
pub const USERNAME_MAX_LENGTH: usize = 50;

/// Maximum length of a phone number as entered.
pub const PHONE_MAX_LENGTH: usize = 32;

/// Usernames must be non-empty after trimming and at most 50 characters.
pub fn validate_username(username: &str) -> Result<(), CoreError> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(CoreError::field("username", "The username field is required."));
    }
    if trimmed.chars().count() > USERNAME_MAX_LENGTH {
        return Err(CoreError::field(
            "username",
            format!("The username field must not be greater than {USERNAME_MAX_LENGTH} characters."),
        ));
    }
    Ok(())
}

pub fn validate_display_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::field("name", "The name field is required."));
    }
    Ok(())
}

pub fn validate_email_address(email: &str) -> Result<(), CoreError> {
    if !email.validate_email() {
        return Err(CoreError::field(
            "email",
            "The email field must be a valid email address.",
        ));
    }
    Ok(())
}

/// Digits plus the usual separators; at least one digit.
pub fn validate_phone_number(number: &str) -> Result<(), CoreError> {
    let trimmed = number.trim();
    let allowed = |c: char| c.is_ascii_digit() || " +-().x".contains(c);
    if trimmed.is_empty()
        || trimmed.len() > PHONE_MAX_LENGTH
        || !trimmed.chars().all(allowed)
        || !trimmed.chars().any(|c| c.is_ascii_digit())
    {
        return Err(CoreError::field(
            "number",
            "The number field must be a valid phone number.",
        ));
    }
    Ok(())
}

/// Preference locales must be one of the translated locales.
pub fn validate_locale(code: &str) -> Result<(), CoreError> {
    if Locale::ALL.iter().any(|l| l.code() == code) {
        Ok(())
    } else {
        Err(CoreError::field("locale", "The selected locale is invalid."))
    }
}

pub fn validate_timezone(timezone: &str) -> Result<(), CoreError> {
    if timezone.trim().is_empty() {
        return Err(CoreError::field("timezone", "The timezone field is required."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn username_rules() {
        assert!(validate_username("alice").is_ok());
        assert_matches!(validate_username("  "), Err(CoreError::InvalidInput(_)));
        assert_matches!(
            validate_username(&"a".repeat(51)),
            Err(CoreError::InvalidInput(_))
        );
    }

    #[test]
    fn email_rules() {
        assert!(validate_email_address("alice@example.test").is_ok());
        assert!(validate_email_address("not-an-email").is_err());
    }

    #[test]
    fn phone_rules() {
        assert!(validate_phone_number("+1 (555) 010-2000").is_ok());
        assert!(validate_phone_number("4021").is_ok());
        assert!(validate_phone_number("call me").is_err());
        assert!(validate_phone_number("---").is_err());
    }

    #[test]
    fn locale_rules() {
        assert!(validate_locale(DEFAULT_LOCALE).is_ok());
        assert!(validate_locale("zh_CN").is_ok());
        assert!(validate_locale("nl").is_err());
    }
}
