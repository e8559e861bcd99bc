//! Password-hashing port.
//!
//! Password value objects consume an already-correct external primitive:
//! a hash function producing a salt/hash pair and a constant-time verify.
//! The kernel defines the port only; implementations (Argon2id or
//! similar) live in the infrastructure layer.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A hashed password: the salt used and the resulting hash, both encoded
/// as opaque strings by the implementation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordDigest {
    /// Encoded salt
    pub salt: String,
    /// Encoded hash
    pub hash: String,
}

/// Errors from the hashing primitive.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The underlying primitive failed to produce a digest
    #[error("password hashing failed: {0}")]
    HashingFailed(String),
}

/// The external password-hashing primitive.
pub trait PasswordHasher {
    /// Hash a plaintext password with a fresh salt.
    ///
    /// # Errors
    ///
    /// `CryptoError::HashingFailed` when the primitive cannot produce a
    /// digest.
    fn hash_password(&self, plaintext: &str) -> Result<PasswordDigest, CryptoError>;

    /// Verify a plaintext password against a digest.
    ///
    /// Implementations must compare in constant time.
    fn verify_password(&self, plaintext: &str, digest: &PasswordDigest) -> bool;
}
