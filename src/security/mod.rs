//! Secret Hashing
//!
//! Argon2id hashing for account passwords and card CVVs. Digests are
//! stored inside the account document and never serialized outward.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Hashing failed; the underlying cause is deliberately not exposed.
#[derive(Debug, thiserror::Error)]
#[error("Secret hashing failed")]
pub struct HashError;

/// Hashes and verifies passwords and CVVs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecretHasher;

impl SecretHasher {
    pub fn hash(&self, secret: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(secret.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| HashError)
    }

    /// Constant-time verification. An unparseable digest verifies as
    /// false rather than erroring, so corrupt records fail closed.
    pub fn verify(&self, secret: &str, digest: &str) -> bool {
        match PasswordHash::new(digest) {
            Ok(parsed) => Argon2::default()
                .verify_password(secret.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => {
                tracing::warn!("Stored digest could not be parsed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = SecretHasher;
        let digest = hasher.hash("anush12345$").unwrap();

        assert!(digest.starts_with("$argon2id$"));
        assert!(hasher.verify("anush12345$", &digest));
        assert!(!hasher.verify("wrong-password", &digest));
    }

    #[test]
    fn test_same_secret_different_digests() {
        let hasher = SecretHasher;
        let first = hasher.hash("777").unwrap();
        let second = hasher.hash("777").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("777", &first));
        assert!(hasher.verify("777", &second));
    }

    #[test]
    fn test_garbage_digest_fails_closed() {
        assert!(!SecretHasher.verify("secret", "not-a-digest"));
    }
}
