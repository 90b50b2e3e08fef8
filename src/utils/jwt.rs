//! JWT utility module.
//!
//! Provides JWT token generation and parsing functions.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::config::get_env;
use crate::error::AppResult;

/// Minimum recommended length for JWT secrets.
const MIN_SECRET_LENGTH: usize = 32;

static JWT_SECRET: Lazy<String> = Lazy::new(|| {
    let secret = get_env("JWT_SECRET", None);
    let env_mode = get_env("RUST_ENV", Some("development"));
    let is_production = env_mode == "production" || env_mode == "prod";

    if secret.is_empty() {
        assert!(
            !is_production,
            "JWT_SECRET must be set in production environment"
        );
        tracing::warn!(
            "JWT_SECRET not set - using insecure default. \
             Set RUST_ENV=production to enforce security requirements."
        );
        "default-secret-change-me-in-production".to_string()
    } else if secret.len() < MIN_SECRET_LENGTH {
        tracing::warn!(
            "JWT_SECRET is shorter than {} characters. \
             Consider using a longer secret for better security.",
            MIN_SECRET_LENGTH
        );
        secret
    } else {
        secret
    }
});

static JWT_EXPIRATION: Lazy<i64> = Lazy::new(|| {
    get_env("JWT_EXPIRATION_HOURS", Some("24"))
        .parse()
        .unwrap_or(24)
});

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Generates a JWT token for the given subject.
#[must_use = "the generated token should be used"]
pub fn gen_token(subject: &str) -> AppResult<String> {
    let now = chrono::Utc::now().timestamp();
    let exp = now + (*JWT_EXPIRATION * 3600);

    let claims = Claims {
        sub: subject.to_string(),
        exp,
        iat: now,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )?;

    Ok(token)
}

/// Parses and validates a JWT token.
#[must_use = "the parsed claims should be used"]
pub fn parse_token(token: &str) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(JWT_SECRET.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}
