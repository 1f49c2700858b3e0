//! The merge engine: snapshot + patch set → merged view.
//!
//! Both the public site and the admin console read the same merged view;
//! neither re-implements the layering. [`merge`] is a pure function of its
//! two inputs: no clocks, no call history, no I/O.
//!
//! Properties the tests pin down:
//!
//! - **Determinism** — `merge(S, P)` called twice is identical.
//! - **Idempotence** — re-merging a view's dataset with an empty patch set
//!   reproduces the view.
//! - **Patch precedence** — patched fields win, unmentioned fields keep the
//!   snapshot value, tombstoned ids vanish.

use serde::{Deserialize, Serialize};

use crate::model::{
    CompanyInfo, CredentialRecord, Dataset, ServiceInfo, Testimonial, WorkerId, WorkerRecord,
};
use crate::patch::PatchSet;

/// The working dataset consumed by all views.
///
/// Snapshot-origin workers come first in snapshot order; workers that exist
/// only in the patch set are appended in ascending id order. The non-worker
/// sections pass through from the snapshot unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedView {
    /// Company identity, from the snapshot.
    pub company: CompanyInfo,

    /// Offered services, from the snapshot.
    pub services: Vec<ServiceInfo>,

    /// The merged worker roster.
    pub workers: Vec<WorkerRecord>,

    /// Testimonials, from the snapshot.
    pub testimonials: Vec<Testimonial>,

    /// The operator credential, from the snapshot.
    pub auth: CredentialRecord,
}

impl MergedView {
    /// The worker with the given id, if present.
    pub fn get(&self, id: WorkerId) -> Option<&WorkerRecord> {
        self.workers.iter().find(|w| w.id == id)
    }

    /// Whether the merged roster contains the given id.
    pub fn contains(&self, id: WorkerId) -> bool {
        self.get(id).is_some()
    }

    /// Highest worker id in the merged roster, or zero when empty.
    pub fn max_id(&self) -> WorkerId {
        self.workers.iter().map(|w| w.id).max().unwrap_or(0)
    }

    /// Reconstitute a [`Dataset`] with the merged roster in place of the
    /// snapshot's. This is the shape the export bridge serializes and the
    /// snapshot loader re-ingests.
    pub fn to_dataset(&self) -> Dataset {
        Dataset {
            company: self.company.clone(),
            services: self.services.clone(),
            workers: self.workers.clone(),
            testimonials: self.testimonials.clone(),
            auth: self.auth.clone(),
        }
    }
}

/// Deterministically combine a snapshot and a patch set.
///
/// Snapshot workers are walked in their original order: tombstoned ids are
/// dropped, ids with an overlay get the overlay applied field-by-field, the
/// rest pass through. Overlay entries with no snapshot counterpart are
/// appended at the end, in ascending id order, applied over an empty base
/// record (tombstones suppress these too).
pub fn merge(snapshot: &Dataset, patches: &PatchSet) -> MergedView {
    let mut workers = Vec::with_capacity(snapshot.workers.len() + patches.entries.len());

    for record in &snapshot.workers {
        if patches.is_deleted(record.id) {
            continue;
        }
        match patches.get(record.id) {
            Some(patch) => workers.push(patch.apply(record)),
            None => workers.push(record.clone()),
        }
    }

    for (&id, patch) in &patches.entries {
        if patches.is_deleted(id) || snapshot.workers.iter().any(|w| w.id == id) {
            continue;
        }
        workers.push(patch.apply(&WorkerRecord::empty(id)));
    }

    MergedView {
        company: snapshot.company.clone(),
        services: snapshot.services.clone(),
        workers,
        testimonials: snapshot.testimonials.clone(),
        auth: snapshot.auth.clone(),
    }
}
