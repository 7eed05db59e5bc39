//! Authentication manager

use chrono::Duration;

use super::jwt::{AccessClaims, JwtError, create_access_token, validate_access_token};
use crate::core::config::AuthConfig;
use crate::core::constants::MAX_TOKEN_TTL_MINUTES;
use crate::utils::crypto;

/// A freshly signed access token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    /// Lifetime in seconds
    pub expires_in: i64,
}

/// Issues and validates access tokens
pub struct AuthManager {
    signing_key: Vec<u8>,
    token_ttl: Duration,
}

impl std::fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthManager")
            .field("signing_key", &"[redacted]")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

impl AuthManager {
    pub fn new(config: &AuthConfig) -> Self {
        let signing_key = match &config.jwt_secret {
            Some(secret) => secret.as_bytes().to_vec(),
            None => {
                tracing::warn!(
                    "No JWT secret configured, using a random key. Tokens will not survive a restart"
                );
                crypto::generate_signing_key()
            }
        };
        let ttl_minutes = config.token_ttl_minutes.min(MAX_TOKEN_TTL_MINUTES) as i64;

        Self {
            signing_key,
            token_ttl: Duration::minutes(ttl_minutes),
        }
    }

    pub fn issue(&self, user_id: i64) -> Result<IssuedToken, JwtError> {
        let claims = AccessClaims::new(user_id, self.token_ttl);
        let token = create_access_token(&self.signing_key, &claims)?;
        Ok(IssuedToken {
            token,
            expires_in: self.token_ttl.num_seconds(),
        })
    }

    pub fn validate(&self, token: &str) -> Result<AccessClaims, JwtError> {
        validate_access_token(token, &self.signing_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: Option<&str>) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.map(String::from),
            token_ttl_minutes: 15,
        }
    }

    #[test]
    fn test_issue_and_validate() {
        let manager = AuthManager::new(&config(Some("0123456789abcdef0123456789abcdef")));
        let issued = manager.issue(7).unwrap();
        assert_eq!(issued.expires_in, 900);

        let claims = manager.validate(&issued.token).unwrap();
        assert_eq!(claims.user_id(), Some(7));
    }

    #[test]
    fn test_generated_keys_differ() {
        let a = AuthManager::new(&config(None));
        let b = AuthManager::new(&config(None));
        let token = a.issue(1).unwrap().token;
        assert!(a.validate(&token).is_ok());
        assert!(b.validate(&token).is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let manager = AuthManager::new(&config(Some("0123456789abcdef0123456789abcdef")));
        assert!(!format!("{:?}", manager).contains("0123456789"));
    }
}
