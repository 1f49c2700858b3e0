//! Credential verification and password changes.
//!
//! The deployment carries exactly one credential in the snapshot. When the
//! operator changes their password, only a new digest is stored locally
//! (the [`PasswordVault`]); the username and salt are never overridden,
//! and the snapshot itself is untouched. A stored override always
//! supersedes the snapshot digest.

use std::sync::Arc;

use rostra_core::{CredentialRecord, Error, Result};
use rostra_store::{LocalStore, PASSWORD_OVERRIDE_KEY};

use crate::digest::password_digest;

/// Minimum accepted length for a new password.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Check a login attempt against a credential.
///
/// The username is compared case-sensitively; the password digest is
/// compared against `override_digest` when present, else the snapshot
/// digest. Both must match.
pub fn verify(
    username: &str,
    password: &str,
    credential: &CredentialRecord,
    override_digest: Option<&str>,
) -> bool {
    if username != credential.username {
        return false;
    }
    let digest = password_digest(&credential.salt, password);
    let expected = override_digest.unwrap_or(&credential.password_digest);
    digest == expected
}

/// Local storage for the changed-password digest override.
#[derive(Clone)]
pub struct PasswordVault {
    store: Arc<dyn LocalStore>,
}

impl PasswordVault {
    /// Wrap a persistent local store.
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    /// The stored digest override, if any. Unreadable storage is treated
    /// as "no override" so login keeps working against the snapshot digest.
    pub fn override_digest(&self) -> Option<String> {
        match self.store.get(PASSWORD_OVERRIDE_KEY) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("password override unreadable, using snapshot digest: {e}");
                None
            }
        }
    }

    /// Drop the override, reverting to the snapshot digest.
    pub fn clear(&self) -> Result<()> {
        self.store.remove(PASSWORD_OVERRIDE_KEY)
    }

    /// Change the operator password.
    ///
    /// The current password must verify against the presently effective
    /// digest; the new password must be at least [`MIN_PASSWORD_LEN`]
    /// characters and match its confirmation. On success the new digest is
    /// persisted as the override. On any failure the effective digest is
    /// unchanged.
    pub fn change_password(
        &self,
        credential: &CredentialRecord,
        current: &str,
        new: &str,
        confirm: &str,
    ) -> Result<()> {
        let effective = self.override_digest();
        let expected = effective.as_deref().unwrap_or(&credential.password_digest);
        if password_digest(&credential.salt, current) != expected {
            return Err(Error::auth("current password is incorrect"));
        }
        if new.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::validation_field(
                "new_password",
                format!("must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }
        if new != confirm {
            return Err(Error::validation_field(
                "confirm_password",
                "passwords do not match",
            ));
        }

        self.store
            .put(PASSWORD_OVERRIDE_KEY, &password_digest(&credential.salt, new))
    }
}
