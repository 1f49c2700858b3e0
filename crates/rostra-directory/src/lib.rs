//! # rostra-directory
//!
//! The business end of the Rostra admin console:
//!
//! - [`repository`] — auth-gated worker CRUD over the merged view, with
//!   write-through persistence to the override store
//! - [`console`] — the single controller owning the merged view and
//!   wiring loader, stores, session, and repository together

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod console;
pub mod repository;

pub use console::{Console, PROMO_DELAY};
pub use repository::{DEFAULT_VERIFIED_DOCUMENTS, Repository, RosterStats, WorkerForm};
