//! Tab-scoped authentication state.
//!
//! The session lives exactly as long as its ephemeral store: a new process
//! (the browser-world equivalent of a new tab) starts unauthenticated.
//! There is no timeout beyond that scope. Failed logins arm a short
//! cooldown on the submit action; that is a UX affordance, not a security
//! control, and the error message never says which of username/password
//! was wrong.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rostra_core::{CredentialRecord, Error, Result};
use rostra_store::{LocalStore, SESSION_KEY};
use serde::{Deserialize, Serialize};

use crate::credential::verify;

/// Cooldown armed after a failed login attempt.
pub const LOGIN_COOLDOWN: Duration = Duration::from_secs(2);

/// The generic login failure message. Deliberately non-specific.
const INVALID_CREDENTIALS: &str = "invalid username or password";

/// An established session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// The authenticated operator.
    pub user: String,

    /// When the session was established.
    pub established_at: DateTime<Utc>,
}

/// State machine: Unauthenticated → Authenticated → Unauthenticated.
///
/// The only way in is a successful credential check; the ways out are an
/// explicit logout or losing the ephemeral store. Repository mutations go
/// through [`SessionManager::require_authenticated`].
pub struct SessionManager {
    store: Arc<dyn LocalStore>,
    current: Option<Session>,
    cooldown_until: Option<Instant>,
}

impl SessionManager {
    /// Create a manager over an ephemeral store, restoring any session the
    /// store already holds (same tab, earlier in its lifetime). Corrupt
    /// stored state restores to unauthenticated.
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        let current = match store.get(SESSION_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(session) => Some(session),
                Err(e) => {
                    log::warn!("stored session is corrupt, starting unauthenticated: {e}");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                log::warn!("session store unreadable, starting unauthenticated: {e}");
                None
            }
        };
        Self {
            store,
            current,
            cooldown_until: None,
        }
    }

    /// Attempt a login.
    ///
    /// During the post-failure cooldown window every attempt is refused
    /// with the same generic error. On success the session is persisted to
    /// the ephemeral store; if that write fails the in-memory session
    /// survives anyway (it just won't be restorable).
    pub fn login(
        &mut self,
        username: &str,
        password: &str,
        credential: &CredentialRecord,
        override_digest: Option<&str>,
    ) -> Result<&Session> {
        if self.cooldown_remaining().is_some() {
            return Err(Error::auth(INVALID_CREDENTIALS));
        }

        if !verify(username, password, credential, override_digest) {
            self.cooldown_until = Some(Instant::now() + LOGIN_COOLDOWN);
            log::info!("failed login attempt, cooldown armed");
            return Err(Error::auth(INVALID_CREDENTIALS));
        }

        let session = Session {
            user: username.to_string(),
            established_at: Utc::now(),
        };
        match serde_json::to_string(&session) {
            Ok(raw) => {
                if let Err(e) = self.store.put(SESSION_KEY, &raw) {
                    log::warn!("could not persist session, staying in-memory only: {e}");
                }
            }
            Err(e) => log::warn!("could not serialize session: {e}"),
        }
        self.cooldown_until = None;
        Ok(self.current.insert(session))
    }

    /// Explicit logout: back to Unauthenticated, store cleared.
    pub fn logout(&mut self) {
        if let Err(e) = self.store.remove(SESSION_KEY) {
            log::warn!("could not clear persisted session: {e}");
        }
        self.current = None;
    }

    /// The current session, if authenticated.
    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// Whether a session is established.
    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// The session, or an authorization error for mutation gating.
    pub fn require_authenticated(&self) -> Result<&Session> {
        self.current
            .as_ref()
            .ok_or_else(|| Error::auth("not authenticated"))
    }

    /// Time left in the post-failure cooldown, if it is active.
    pub fn cooldown_remaining(&self) -> Option<Duration> {
        let until = self.cooldown_until?;
        let now = Instant::now();
        (now < until).then(|| until - now)
    }
}
