//! # rostra-store
//!
//! Persistence and I/O edges for the Rostra directory:
//!
//! - [`local`] — whole-value keyed storage ([`FileStore`], [`MemoryStore`])
//! - [`overrides`] — the persisted patch set, corrupt-tolerant on read
//! - [`snapshot`] — fetching the canonical dataset, with fallback
//! - [`export`] — serializing the merged dataset for download or write-back

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod export;
pub mod local;
pub mod overrides;
pub mod snapshot;

pub use export::{export_filename, export_json, parse_dataset};
pub use local::{
    FileStore, LocalStore, MemoryStore, OVERRIDES_KEY, PASSWORD_OVERRIDE_KEY, PROMO_DISMISSED_KEY,
    SESSION_KEY,
};
pub use overrides::OverrideStore;
pub use snapshot::{HttpSnapshotSource, SnapshotLoader, SnapshotSource, StaticSnapshotSource};
