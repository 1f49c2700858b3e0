//! The override patch set layered on top of the snapshot.
//!
//! Edits made in the admin console never touch the snapshot; they are
//! recorded here, keyed by worker id, and re-applied by the merge engine
//! on every load.
//!
//! # Cleared vs. unmentioned fields
//!
//! A patch must distinguish "field intentionally cleared" from "field not
//! mentioned". [`PatchField`] makes that explicit:
//!
//! - a key missing from the patch JSON is [`PatchField::Absent`] — the
//!   snapshot value is preserved;
//! - an explicit `null` is [`PatchField::Clear`] — the value is removed;
//! - anything else is [`PatchField::Set`] — the value is replaced.
//!
//! Deletions are a separate persisted id set ([`PatchSet::deleted`]) so a
//! snapshot-origin record stays suppressed across reloads.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{Review, WorkerId, WorkerRecord};

// ============================================================================
// PatchField
// ============================================================================

/// Tri-state patch value for a single record field.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PatchField<T> {
    /// Key not present in the patch; the existing value is preserved.
    #[default]
    Absent,
    /// Explicit `null`; the existing value is cleared.
    Clear,
    /// The value is replaced.
    Set(T),
}

impl<T> PatchField<T> {
    /// Returns `true` for [`PatchField::Absent`]. Used as the
    /// `skip_serializing_if` predicate so absent fields stay absent.
    pub fn is_absent(&self) -> bool {
        matches!(self, PatchField::Absent)
    }

    /// Resolve against a required field.
    ///
    /// `Clear` has no meaning for a required field and preserves the
    /// current value.
    pub fn resolve(&self, current: &T) -> T
    where
        T: Clone,
    {
        match self {
            PatchField::Set(v) => v.clone(),
            PatchField::Absent | PatchField::Clear => current.clone(),
        }
    }

    /// Resolve against an optional field: `Set` replaces, `Clear` empties,
    /// `Absent` preserves.
    pub fn resolve_opt(&self, current: &Option<T>) -> Option<T>
    where
        T: Clone,
    {
        match self {
            PatchField::Set(v) => Some(v.clone()),
            PatchField::Clear => None,
            PatchField::Absent => current.clone(),
        }
    }
}

impl<T> From<Option<T>> for PatchField<T> {
    /// `Some` becomes `Set`, `None` becomes `Clear`.
    ///
    /// This is the conversion used when a full record is flattened into a
    /// patch: an empty optional must override a populated snapshot value,
    /// so it maps to `Clear`, not `Absent`.
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => PatchField::Set(v),
            None => PatchField::Clear,
        }
    }
}

impl<T: Serialize> Serialize for PatchField<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            PatchField::Set(v) => v.serialize(serializer),
            // Absent is skipped at the struct level; if serialized anyway
            // it degrades to Clear, which is the conservative reading.
            PatchField::Clear | PatchField::Absent => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for PatchField<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => PatchField::Set(v),
            None => PatchField::Clear,
        })
    }
}

// ============================================================================
// WorkerPatch
// ============================================================================

/// A full or partial overlay for one worker record.
///
/// The repository stores every entry as the *full* resulting record
/// (see [`WorkerPatch::from_record`]) so that re-applying the patch over a
/// stale snapshot reproduces the edited record exactly. Hand-written
/// partial patches are equally valid input to the merge engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkerPatch {
    /// Full name.
    #[serde(default, skip_serializing_if = "PatchField::is_absent")]
    pub name: PatchField<String>,

    /// Role or job title.
    #[serde(default, skip_serializing_if = "PatchField::is_absent")]
    pub role: PatchField<String>,

    /// Area of specialty.
    #[serde(default, skip_serializing_if = "PatchField::is_absent")]
    pub specialty: PatchField<String>,

    /// Tenure description.
    #[serde(default, skip_serializing_if = "PatchField::is_absent")]
    pub tenure: PatchField<String>,

    /// Contact phone number.
    #[serde(default, skip_serializing_if = "PatchField::is_absent")]
    pub phone: PatchField<String>,

    /// Contact email address.
    #[serde(default, skip_serializing_if = "PatchField::is_absent")]
    pub email: PatchField<String>,

    /// Profile photo URL.
    #[serde(default, skip_serializing_if = "PatchField::is_absent")]
    pub photo_url: PatchField<String>,

    /// Short biography.
    #[serde(default, skip_serializing_if = "PatchField::is_absent")]
    pub bio: PatchField<String>,

    /// Skills.
    #[serde(default, skip_serializing_if = "PatchField::is_absent")]
    pub skills: PatchField<Vec<String>>,

    /// Availability description.
    #[serde(default, skip_serializing_if = "PatchField::is_absent")]
    pub availability: PatchField<String>,

    /// Join date.
    #[serde(default, skip_serializing_if = "PatchField::is_absent")]
    pub joined: PatchField<NaiveDate>,

    /// Verified flag.
    #[serde(default, skip_serializing_if = "PatchField::is_absent")]
    pub verified: PatchField<bool>,

    /// Featured flag.
    #[serde(default, skip_serializing_if = "PatchField::is_absent")]
    pub featured: PatchField<bool>,

    /// Aggregate rating.
    #[serde(default, skip_serializing_if = "PatchField::is_absent")]
    pub rating: PatchField<f64>,

    /// Reviews in insertion order.
    #[serde(default, skip_serializing_if = "PatchField::is_absent")]
    pub reviews: PatchField<Vec<Review>>,

    /// Documents checked during verification.
    #[serde(default, skip_serializing_if = "PatchField::is_absent")]
    pub verified_documents: PatchField<Vec<String>>,
}

impl WorkerPatch {
    /// Flatten a record into a patch that reproduces it over any base.
    ///
    /// Optional fields that are `None` become [`PatchField::Clear`] so the
    /// result is independent of the base record.
    pub fn from_record(record: &WorkerRecord) -> Self {
        Self {
            name: PatchField::Set(record.name.clone()),
            role: PatchField::Set(record.role.clone()),
            specialty: record.specialty.clone().into(),
            tenure: record.tenure.clone().into(),
            phone: record.phone.clone().into(),
            email: record.email.clone().into(),
            photo_url: PatchField::Set(record.photo_url.clone()),
            bio: record.bio.clone().into(),
            skills: PatchField::Set(record.skills.clone()),
            availability: record.availability.clone().into(),
            joined: record.joined.into(),
            verified: PatchField::Set(record.verified),
            featured: PatchField::Set(record.featured),
            rating: PatchField::Set(record.rating),
            reviews: PatchField::Set(record.reviews.clone()),
            verified_documents: PatchField::Set(record.verified_documents.clone()),
        }
    }

    /// Apply this patch over a base record. The id is always the base's.
    pub fn apply(&self, base: &WorkerRecord) -> WorkerRecord {
        WorkerRecord {
            id: base.id,
            name: self.name.resolve(&base.name),
            role: self.role.resolve(&base.role),
            specialty: self.specialty.resolve_opt(&base.specialty),
            tenure: self.tenure.resolve_opt(&base.tenure),
            phone: self.phone.resolve_opt(&base.phone),
            email: self.email.resolve_opt(&base.email),
            photo_url: self.photo_url.resolve(&base.photo_url),
            bio: self.bio.resolve_opt(&base.bio),
            skills: self.skills.resolve(&base.skills),
            availability: self.availability.resolve_opt(&base.availability),
            joined: self.joined.resolve_opt(&base.joined),
            verified: self.verified.resolve(&base.verified),
            featured: self.featured.resolve(&base.featured),
            rating: self.rating.resolve(&base.rating),
            reviews: self.reviews.resolve(&base.reviews),
            verified_documents: self.verified_documents.resolve(&base.verified_documents),
        }
    }
}

// ============================================================================
// PatchSet
// ============================================================================

/// The persisted set of operator edits: per-id overlays plus tombstones.
///
/// BTree containers keep iteration deterministic, which the merge engine
/// relies on when appending records that have no snapshot counterpart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatchSet {
    /// Overlays keyed by worker id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub entries: BTreeMap<WorkerId, WorkerPatch>,

    /// Ids suppressed from the merged view, including snapshot-origin ids.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub deleted: BTreeSet<WorkerId>,
}

impl PatchSet {
    /// An empty patch set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when there are no overlays and no tombstones.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.deleted.is_empty()
    }

    /// Insert or replace the overlay for `id`, removing any tombstone.
    pub fn set(&mut self, id: WorkerId, patch: WorkerPatch) {
        self.deleted.remove(&id);
        self.entries.insert(id, patch);
    }

    /// The overlay for `id`, if any.
    pub fn get(&self, id: WorkerId) -> Option<&WorkerPatch> {
        self.entries.get(&id)
    }

    /// Tombstone `id`: drop its overlay and suppress it from future merges.
    pub fn tombstone(&mut self, id: WorkerId) {
        self.entries.remove(&id);
        self.deleted.insert(id);
    }

    /// Whether `id` is tombstoned.
    pub fn is_deleted(&self, id: WorkerId) -> bool {
        self.deleted.contains(&id)
    }

    /// Highest id mentioned anywhere in the patch set, or zero.
    ///
    /// Tombstoned ids count: a deleted id must never be reassigned while
    /// this patch set lives.
    pub fn max_id(&self) -> WorkerId {
        let max_entry = self.entries.keys().next_back().copied().unwrap_or(0);
        let max_deleted = self.deleted.iter().next_back().copied().unwrap_or(0);
        max_entry.max(max_deleted)
    }
}
