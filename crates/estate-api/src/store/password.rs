// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Argon2 password hashing.
//!
//! Hashing is deliberately slow, so the async helpers run it on the blocking
//! thread pool.

use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use super::StoreError;

/// Hashes a password into an Argon2id PHC string.
pub fn hash_password_blocking(password: &str) -> Result<String, StoreError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| StoreError::Hash(e.to_string()))
}

/// Checks a password against a PHC string. Unparseable hashes never match.
pub fn verify_password_blocking(password: &str, phc: &str) -> bool {
    match PasswordHash::new(phc) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is not a valid PHC string");
            false
        }
    }
}

/// Returns `true` if `phc` is an Argon2 PHC string this module can verify.
pub fn is_argon2_phc(phc: &str) -> bool {
    PasswordHash::new(phc).is_ok_and(|parsed| parsed.algorithm.as_str().starts_with("argon2"))
}

/// Hash of a random password nobody knows, built on first use.
fn decoy_hash() -> &'static str {
    static DECOY: OnceLock<String> = OnceLock::new();
    DECOY.get_or_init(|| {
        let secret = SaltString::generate(&mut OsRng);
        hash_password_blocking(secret.as_str()).unwrap_or_default()
    })
}

/// Runs a full verification that always fails.
///
/// Logins for unknown emails call this so they cost as much as a wrong
/// password.
pub async fn verify_password_decoy(password: String) -> Result<bool, StoreError> {
    tokio::task::spawn_blocking(move || verify_password_blocking(&password, decoy_hash()))
        .await
        .map_err(|e| StoreError::Hash(e.to_string()))
}

/// Hashes a password on the blocking pool.
pub async fn hash_password(password: String) -> Result<String, StoreError> {
    tokio::task::spawn_blocking(move || hash_password_blocking(&password))
        .await
        .map_err(|e| StoreError::Hash(e.to_string()))?
}

/// Verifies a password on the blocking pool.
pub async fn verify_password(password: String, phc: String) -> Result<bool, StoreError> {
    tokio::task::spawn_blocking(move || verify_password_blocking(&password, &phc))
        .await
        .map_err(|e| StoreError::Hash(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let phc = hash_password_blocking("gatekeeper").unwrap();
        assert!(phc.starts_with("$argon2id$"));
        assert!(verify_password_blocking("gatekeeper", &phc));
        assert!(!verify_password_blocking("Gatekeeper", &phc));
    }

    #[test]
    fn test_salted() {
        let a = hash_password_blocking("same").unwrap();
        let b = hash_password_blocking("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_is_argon2_phc() {
        assert!(is_argon2_phc(&hash_password_blocking("x").unwrap()));
        assert!(!is_argon2_phc(
            "$2b$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy"
        ));
        assert!(!is_argon2_phc("$pbkdf2-sha256$i=1000$c2FsdA$aGFzaA"));
        assert!(!is_argon2_phc("plaintext"));
    }

    #[test]
    fn test_invalid_hash_never_matches() {
        assert!(!verify_password_blocking("anything", "plaintext"));
        assert!(!verify_password_blocking("", ""));
    }

    #[tokio::test]
    async fn test_async_helpers() {
        let phc = hash_password("resident-pass".to_string()).await.unwrap();
        assert!(verify_password("resident-pass".to_string(), phc.clone()).await.unwrap());
        assert!(!verify_password("wrong".to_string(), phc).await.unwrap());
    }

    #[tokio::test]
    async fn test_decoy_is_a_real_hash_that_never_matches() {
        assert!(decoy_hash().starts_with("$argon2id$"));
        assert!(std::ptr::eq(decoy_hash(), decoy_hash()));

        for password in ["", "password", decoy_hash()] {
            assert!(!verify_password_decoy(password.to_string()).await.unwrap());
        }
    }
}
