//! Credential hashing
//!
//! Salted SHA-256 digests stored as `salt$digest`. The salt is fresh random
//! bytes per account, so identical passwords never share a stored hash.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    let digest = salted_digest(&salt, password);
    format!("{}${}", salt, digest)
}

/// Verify a password against a stored `salt$digest` value
pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, expected)) => salted_digest(salt, password) == expected,
        None => false,
    }
}

fn salted_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
