//! # rostra-auth
//!
//! Operator authentication for the Rostra admin console:
//!
//! - [`digest`] — the salted SHA-256 credential digest
//! - [`credential`] — verification against the snapshot credential, with a
//!   locally stored digest override for changed passwords
//! - [`session`] — tab-scoped session state gating repository mutations

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod credential;
pub mod digest;
pub mod session;

pub use credential::{MIN_PASSWORD_LEN, PasswordVault, verify};
pub use digest::password_digest;
pub use session::{LOGIN_COOLDOWN, Session, SessionManager};
