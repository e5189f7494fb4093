//! Issuing and verifying the stateless HS256 session tokens used as bearer credentials.
//!
//! # Example
//!
//! ```rust,no_run
//! use domain::jwt::{generate_token, verify_token};
//! use domain::Id;
//! use service::config::Config;
//!
//! fn example(config: &Config, user_id: Id) {
//!     let token = generate_token(config, user_id, "learner@example.com").unwrap();
//!     let claims = verify_token(config, &token).unwrap();
//!     assert_eq!(claims.user_id, user_id);
//! }
//! ```

use crate::error::Error;
use chrono::{Duration, Utc};
use entity::Id;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::*;
use service::config::Config;

pub use claims::SessionClaims;

pub(crate) mod claims;

fn signing_secret(config: &Config) -> Result<String, Error> {
    config.jwt_secret().ok_or_else(|| {
        error!("JWT secret is not configured");
        Error::config()
    })
}

pub fn generate_token(config: &Config, user_id: Id, email: &str) -> Result<String, Error> {
    let secret = signing_secret(config)?;
    let now = Utc::now();

    let claims = SessionClaims {
        user_id,
        email: email.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::days(config.jwt_expiry_days)).timestamp(),
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

/// Rejects tokens with a bad signature or past their expiry.
pub fn verify_token(config: &Config, token: &str) -> Result<SessionClaims, Error> {
    let secret = signing_secret(config)?;

    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|token_data| token_data.claims)
    .map_err(|e| {
        debug!("Rejected session token: {e:?}");
        Error {
            source: Some(Box::new(e)),
            ..Error::unauthenticated("Invalid or expired token")
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DomainErrorKind, InternalErrorKind};
    use clap::Parser;

    fn config_with_secret(secret: &str) -> Config {
        Config::parse_from(["learning_assistant", "--jwt-secret", secret])
    }

    #[test]
    fn generated_token_verifies_with_same_secret() {
        let config = config_with_secret("test-secret");
        let user_id = Id::new_v4();

        let token = generate_token(&config, user_id, "learner@example.com").unwrap();
        let claims = verify_token(&config, &token).unwrap();

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.email, "learner@example.com");
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = generate_token(&config_with_secret("one"), Id::new_v4(), "a@b.c").unwrap();

        let err = verify_token(&config_with_secret("two"), &token).unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Unauthenticated(
                "Invalid or expired token".to_string()
            ))
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = config_with_secret("test-secret");
        let claims = SessionClaims {
            user_id: Id::new_v4(),
            email: "a@b.c".to_string(),
            iat: Utc::now().timestamp() - 7200,
            exp: Utc::now().timestamp() - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(verify_token(&config, &token).is_err());
    }

    #[test]
    fn missing_secret_is_a_config_error() {
        let config = Config::parse_from(["learning_assistant"]);

        let err = generate_token(&config, Id::new_v4(), "a@b.c").unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Config)
        );
    }
}
