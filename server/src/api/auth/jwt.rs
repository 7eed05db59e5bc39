//! JWT access token handling

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// JWT creation or validation error
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Access token has expired")]
    Expired,
    #[error("Invalid access token signature")]
    InvalidSignature,
    #[error("Invalid access token: {0}")]
    Invalid(String),
    #[error("Failed to create access token: {0}")]
    Encode(String),
}

/// JWT claims for access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// User id as a decimal string
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

impl AccessClaims {
    pub fn new(user_id: i64, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Numeric user id, `None` when the subject is not one
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

/// Sign claims with HS256
pub fn create_access_token(signing_key: &[u8], claims: &AccessClaims) -> Result<String, JwtError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(signing_key),
    )
    .map_err(|e| JwtError::Encode(e.to_string()))
}

/// Validate and decode an access token
pub fn validate_access_token(token: &str, signing_key: &[u8]) -> Result<AccessClaims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let token_data =
        decode::<AccessClaims>(token, &DecodingKey::from_secret(signing_key), &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::Invalid(e.to_string()),
            })?;

    Ok(token_data.claims)
}
