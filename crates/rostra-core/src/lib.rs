//! # rostra-core
//!
//! Core data model and merge engine for the Rostra business directory.
//!
//! The directory is served from a read-only snapshot document; operator
//! edits are persisted locally as a patch set and re-applied on every load.
//! This crate owns the pieces with real invariants:
//!
//! - [`model`] — the snapshot [`Dataset`], worker records, reviews, and the
//!   operator credential
//! - [`patch`] — the tri-state [`PatchField`], per-worker overlays, and the
//!   tombstone-carrying [`PatchSet`]
//! - [`merge`] — the deterministic, idempotent merge of snapshot and patch
//!   set into the [`MergedView`] all surfaces read
//! - [`error`] — the shared error taxonomy

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod error;
pub mod merge;
pub mod model;
pub mod patch;

pub use error::{Error, Result};
pub use merge::{MergedView, merge};
pub use model::{
    CompanyInfo, CredentialRecord, Dataset, FALLBACK_COMPANY_NAME, PLACEHOLDER_PHOTO_URL, Review,
    ServiceInfo, Testimonial, WorkerId, WorkerRecord,
};
pub use patch::{PatchField, PatchSet, WorkerPatch};
