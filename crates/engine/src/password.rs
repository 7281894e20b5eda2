//! Argon2 password hashing.
//!
//! Hashes are stored as PHC strings, so the salt and parameters travel with
//! the hash and verification does not need any extra state.

use std::sync::LazyLock;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};

use crate::{EngineError, ResultEngine};

/// Hash `password` with a fresh random salt.
pub(crate) fn hash_password(password: &str) -> ResultEngine<String> {
    if password.is_empty() {
        return Err(EngineError::InvalidInput("password must not be empty".to_string()));
    }
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| EngineError::PasswordHash(err.to_string()))
}

/// Uses argon2 to verify `password` against the stored hash.
///
/// A malformed stored hash never verifies.
pub(crate) fn verify_password(password: &str, stored: &str) -> bool {
    let hash = match PasswordHash::new(stored) {
        Ok(hash) => hash,
        Err(err) => {
            tracing::error!("failed to parse password hash: {err}");
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &hash)
        .is_ok()
}

/// Hash verified against when the username is unknown.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("staffbook-dummy-password").ok());

/// Spend one verification on a hash no account owns.
pub(crate) fn burn_verify(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("s3cret").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("s3cret", &hash));
        assert!(!verify_password("s3cret ", &hash));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash_password("s3cret").unwrap();
        let b = hash_password("s3cret").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn unknown_user_hash_is_a_real_argon2_hash() {
        burn_verify("whatever");
        let hash = DUMMY_HASH.as_deref().unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(PasswordHash::new(hash).is_ok());
    }

    #[test]
    fn plaintext_is_not_a_hash() {
        assert!(!verify_password("password", "password"));
    }

    #[test]
    #[should_panic(expected = "InvalidInput(\"password must not be empty\")")]
    fn fail_empty_password() {
        hash_password("").unwrap();
    }
}
