//! Password hashing
//!
//! PBKDF2-HMAC-SHA256 with a random per-password salt. Stored form:
//! `pbkdf2_sha256$<iterations>$<salt hex>$<hash hex>`.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use thiserror::Error;

use crate::core::constants::{PASSWORD_HASH_ITERATIONS, PASSWORD_SALT_LEN};
use crate::utils::crypto::{constant_time_eq, generate_key};

const SCHEME: &str = "pbkdf2_sha256";
const HASH_LEN: usize = 32;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Malformed password hash")]
    MalformedHash,
}

/// Hash a password with a fresh salt
pub fn hash_password(password: &str) -> String {
    hash_with(password, &generate_key(PASSWORD_SALT_LEN), PASSWORD_HASH_ITERATIONS)
}

fn hash_with(password: &str, salt: &[u8], iterations: u32) -> String {
    let mut hash = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut hash);
    format!(
        "{}${}${}${}",
        SCHEME,
        iterations,
        hex::encode(salt),
        hex::encode(hash)
    )
}

/// Check a password against a stored hash
///
/// Returns `Ok(false)` on mismatch and an error only when the stored value
/// cannot be parsed.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, PasswordError> {
    let mut parts = stored.split('$');
    let (Some(scheme), Some(iterations), Some(salt), Some(expected), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return Err(PasswordError::MalformedHash);
    };

    if scheme != SCHEME {
        return Err(PasswordError::MalformedHash);
    }
    let iterations: u32 = iterations
        .parse()
        .ok()
        .filter(|n| *n > 0)
        .ok_or(PasswordError::MalformedHash)?;
    let salt = hex::decode(salt).map_err(|_| PasswordError::MalformedHash)?;
    let expected = hex::decode(expected).map_err(|_| PasswordError::MalformedHash)?;
    if expected.len() != HASH_LEN {
        return Err(PasswordError::MalformedHash);
    }

    let mut actual = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut actual);
    Ok(constant_time_eq(&actual, &expected))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_format() {
        let hash = hash_with("secret", &[7u8; 16], 1_000);
        let parts: Vec<&str> = hash.split('$').collect();
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], SCHEME);
        assert_eq!(parts[1], "1000");
        assert_eq!(parts[2], hex::encode([7u8; 16]));
        assert_eq!(parts[3].len(), HASH_LEN * 2);
    }

    #[test]
    fn test_verify_round_trip() {
        let hash = hash_with("correct horse", &[1u8; 16], 1_000);
        assert_eq!(verify_password("correct horse", &hash), Ok(true));
        assert_eq!(verify_password("wrong horse", &hash), Ok(false));
    }

    #[test]
    fn test_salts_differ() {
        let a = hash_password("same");
        let b = hash_password("same");
        assert_ne!(a, b);
        assert_eq!(verify_password("same", &a), Ok(true));
    }

    #[test]
    fn test_malformed_hash() {
        for stored in [
            "",
            "plaintext",
            "bcrypt$10$aa$bb",
            "pbkdf2_sha256$0$00$00",
            "pbkdf2_sha256$1000$zz$00",
            "pbkdf2_sha256$1000$00$00",
            "pbkdf2_sha256$1000$00$00$extra",
        ] {
            assert_eq!(
                verify_password("x", stored),
                Err(PasswordError::MalformedHash),
                "accepted {:?}",
                stored
            );
        }
    }
}
