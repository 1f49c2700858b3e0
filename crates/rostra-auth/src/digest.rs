//! The credential digest.

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of `salt + password`.
///
/// This is the only form in which a password ever exists at rest or in a
/// comparison; the plaintext is dropped as soon as the digest is computed
/// and is never logged.
pub fn password_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
