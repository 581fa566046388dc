//! Password hashing.
//!
//! Argon2id with default parameters; each hash carries its own salt in PHC
//! string format, so verification needs no side-channel state.

use crate::error::{AuthError, AuthResult};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use std::sync::OnceLock;

/// Hash a plaintext password.
pub fn hash(plain: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hashed| hashed.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// Verify a plaintext password against a stored PHC hash. A malformed
/// stored hash verifies as false rather than erroring.
pub fn verify(plain: &str, stored: &str) -> bool {
    PasswordHash::new(stored)
        .map(|parsed| {
            Argon2::default()
                .verify_password(plain.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

static DUMMY_HASH: OnceLock<String> = OnceLock::new();

/// A fixed hash used on the missing-record login path, so that lookups of
/// unknown identifiers do the same verification work as real mismatches.
pub fn dummy_hash() -> &'static str {
    DUMMY_HASH.get_or_init(|| hash("healthgate-dummy-credential").expect("static hash"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_salted_and_verifies() {
        let first = hash("pw").unwrap();
        let second = hash("pw").unwrap();
        assert_ne!(first, "pw");
        assert_ne!(first, second);
        assert!(verify("pw", &first));
        assert!(verify("pw", &second));
        assert!(!verify("wrong", &first));
    }

    #[test]
    fn malformed_stored_hash_never_verifies() {
        assert!(!verify("pw", "not-a-phc-string"));
        assert!(!verify("pw", ""));
    }

    #[test]
    fn dummy_hash_rejects_everything() {
        assert!(!verify("pw", dummy_hash()));
        assert!(verify("healthgate-dummy-credential", dummy_hash()));
    }
}
