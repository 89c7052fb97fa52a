//! JWT access-token generation/validation and remember-token helpers.
//!
//! Access tokens are HS256-signed JWTs containing a [`Claims`] payload.
//! Remember tokens are opaque random strings; only their SHA-256 hash is
//! stored on the user row so a database leak does not expose live tokens.

use erp_core::auth::AuthFailure;
use erp_core::types::DbId;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::{env_or, ConfigError};

/// JWT claims embedded in every access token.
///
/// Group and status are deliberately absent: they are loaded per request so
/// that deactivation and group changes apply immediately.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4).
    pub jti: String,
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in minutes (default: 60).
    pub access_token_expiry_mins: i64,
    /// Remember token lifetime in days (default: 30).
    pub remember_token_expiry_days: i64,
}

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60;
const DEFAULT_REMEMBER_EXPIRY_DAYS: i64 = 30;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                    | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `JWT_SECRET`               | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS`   | no       | `60`    |
    /// | `JWT_REMEMBER_EXPIRY_DAYS` | no       | `30`    |
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let access_token_expiry_mins = env_or("JWT_ACCESS_EXPIRY_MINS", DEFAULT_ACCESS_EXPIRY_MINS)?;
        let remember_token_expiry_days =
            env_or("JWT_REMEMBER_EXPIRY_DAYS", DEFAULT_REMEMBER_EXPIRY_DAYS)?;

        if access_token_expiry_mins <= 0 {
            return Err(ConfigError::Invalid {
                var: "JWT_ACCESS_EXPIRY_MINS",
                value: access_token_expiry_mins.to_string(),
            });
        }
        if remember_token_expiry_days <= 0 {
            return Err(ConfigError::Invalid {
                var: "JWT_REMEMBER_EXPIRY_DAYS",
                value: remember_token_expiry_days.to_string(),
            });
        }

        Ok(Self {
            secret,
            access_token_expiry_mins,
            remember_token_expiry_days,
        })
    }

    /// Access token lifetime in seconds, as reported to clients.
    pub fn access_token_expiry_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }
}

/// Generate an HS256 access token for the given user.
pub fn generate_access_token(
    user_id: DbId,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub: user_id,
        exp: now + config.access_token_expiry_secs(),
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode an access token, returning the embedded [`Claims`].
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

/// Map a token validation error onto the failure reported to the client.
pub fn classify_token_error(err: &jsonwebtoken::errors::Error) -> AuthFailure {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthFailure::TokenExpired,
        _ => AuthFailure::TokenInvalid,
    }
}

/// Generate a random remember token.
///
/// Returns `(plaintext_token, sha256_hex_hash)`. The plaintext goes to the
/// client; only the hash is persisted.
pub fn generate_remember_token() -> (String, String) {
    let plaintext = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
    let hash = hash_remember_token(&plaintext);
    (plaintext, hash)
}

/// SHA-256 hex digest of a remember token.
pub fn hash_remember_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
            remember_token_expiry_days: 30,
        }
    }

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn access_token_round_trips_subject() {
        let config = test_config();
        let token = generate_access_token(42, &config).unwrap();

        let claims = validate_token(&token, &config).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn expired_token_is_classified_as_expired() {
        let config = test_config();
        // Well beyond the default 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            exp: now - 300,
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };
        let token = sign(&claims, &config.secret);

        let err = validate_token(&token, &config).unwrap_err();
        assert_eq!(classify_token_error(&err), AuthFailure::TokenExpired);
    }

    #[test]
    fn foreign_signature_is_invalid() {
        let config = test_config();
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            exp: now + 300,
            iat: now,
            jti: Uuid::new_v4().to_string(),
        };
        let token = sign(&claims, "some-other-secret");

        let err = validate_token(&token, &config).unwrap_err();
        assert_eq!(classify_token_error(&err), AuthFailure::TokenInvalid);
    }

    #[test]
    fn garbage_is_invalid() {
        let err = validate_token("not.a.jwt", &test_config()).unwrap_err();
        assert_eq!(classify_token_error(&err), AuthFailure::TokenInvalid);
    }

    #[test]
    fn remember_token_hash_is_stable() {
        let (plaintext, hash) = generate_remember_token();
        assert_eq!(hash, hash_remember_token(&plaintext));
        assert_eq!(hash.len(), 64);

        let (other, _) = generate_remember_token();
        assert_ne!(plaintext, other);
    }
}
