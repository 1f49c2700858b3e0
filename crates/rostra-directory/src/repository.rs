//! CRUD over the merged worker collection.
//!
//! The repository reads the merged view and writes only to the override
//! store; the snapshot is never mutated. Every mutation persists the new
//! patch set *before* touching the in-memory view, so a storage failure
//! aborts cleanly: the edit is reported lost, the view stays consistent
//! and usable for the rest of the session.
//!
//! Mutations require an authenticated session. Reads (including export)
//! do not.

use rostra_auth::SessionManager;
use rostra_core::{
    Error, MergedView, PatchSet, Result, Review, WorkerId, WorkerPatch, WorkerRecord,
};
use rostra_store::OverrideStore;

/// Documents recorded when a worker is created already verified.
pub const DEFAULT_VERIFIED_DOCUMENTS: [&str; 2] = ["ID card", "Background check"];

/// Input fields for creating a worker.
///
/// `name` and `role` are required; everything else is optional and
/// defaulted the way the admin form defaults it.
#[derive(Debug, Clone, Default)]
pub struct WorkerForm {
    /// Full name.
    pub name: String,
    /// Role or job title.
    pub role: String,
    /// Area of specialty.
    pub specialty: Option<String>,
    /// Tenure description.
    pub tenure: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Contact email address.
    pub email: Option<String>,
    /// Photo URL; the placeholder is used when omitted.
    pub photo_url: Option<String>,
    /// Short biography.
    pub bio: Option<String>,
    /// Skills.
    pub skills: Vec<String>,
    /// Availability description.
    pub availability: Option<String>,
    /// Join date.
    pub joined: Option<chrono::NaiveDate>,
    /// Verified flag.
    pub verified: bool,
    /// Featured flag.
    pub featured: bool,
}

/// Dashboard counts over the merged roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterStats {
    /// Total workers in the merged view.
    pub total: usize,
    /// Workers with the verified flag.
    pub verified: usize,
    /// Workers with the featured flag.
    pub featured: usize,
    /// Total reviews across all workers.
    pub reviews: usize,
}

/// The record repository: merged view in memory, patch set written
/// through to the override store.
pub struct Repository {
    view: MergedView,
    patches: PatchSet,
    overrides: OverrideStore,
}

impl Repository {
    /// Build a repository from an already-merged view and the patch set
    /// that produced it.
    pub fn new(view: MergedView, patches: PatchSet, overrides: OverrideStore) -> Self {
        Self {
            view,
            patches,
            overrides,
        }
    }

    /// The merged view all surfaces read.
    pub fn view(&self) -> &MergedView {
        &self.view
    }

    /// The merged roster.
    pub fn workers(&self) -> &[WorkerRecord] {
        &self.view.workers
    }

    /// The worker with the given id, if present.
    pub fn get(&self, id: WorkerId) -> Option<&WorkerRecord> {
        self.view.get(id)
    }

    /// Workers whose name or role contains `query`, case-insensitively.
    /// An empty query matches everyone.
    pub fn search(&self, query: &str) -> Vec<&WorkerRecord> {
        let needle = query.to_lowercase();
        self.view
            .workers
            .iter()
            .filter(|w| {
                needle.is_empty()
                    || w.name.to_lowercase().contains(&needle)
                    || w.role.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Dashboard counts.
    pub fn stats(&self) -> RosterStats {
        RosterStats {
            total: self.view.workers.len(),
            verified: self.view.workers.iter().filter(|w| w.verified).count(),
            featured: self.view.workers.iter().filter(|w| w.featured).count(),
            reviews: self.view.workers.iter().map(|w| w.reviews.len()).sum(),
        }
    }

    /// Every review in the roster, paired with its worker, newest first.
    pub fn all_reviews(&self) -> Vec<(&WorkerRecord, &Review)> {
        let mut reviews: Vec<(&WorkerRecord, &Review)> = self
            .view
            .workers
            .iter()
            .flat_map(|w| w.reviews.iter().map(move |r| (w, r)))
            .collect();
        reviews.sort_by(|a, b| b.1.date.cmp(&a.1.date));
        reviews
    }

    /// Next id to assign: one past the highest id the merged view or the
    /// patch set (tombstones included) has ever mentioned. Deleted ids are
    /// never reused while the override store lives.
    fn next_id(&self) -> WorkerId {
        self.view.max_id().max(self.patches.max_id()) + 1
    }

    /// Persist `patches`, then commit it as the current set. The error
    /// path leaves `self` untouched.
    fn persist(&mut self, patches: PatchSet) -> Result<()> {
        self.overrides.write(&patches)?;
        self.patches = patches;
        Ok(())
    }

    /// Create a worker from form fields.
    pub fn create(&mut self, session: &SessionManager, form: WorkerForm) -> Result<WorkerRecord> {
        session.require_authenticated()?;
        if form.name.trim().is_empty() {
            return Err(Error::validation_field("name", "name is required"));
        }
        if form.role.trim().is_empty() {
            return Err(Error::validation_field("role", "role is required"));
        }

        let mut record = WorkerRecord::empty(self.next_id());
        record.name = form.name.trim().to_string();
        record.role = form.role.trim().to_string();
        record.specialty = form.specialty;
        record.tenure = form.tenure;
        record.phone = form.phone;
        record.email = form.email;
        if let Some(url) = form.photo_url.filter(|u| !u.trim().is_empty()) {
            record.photo_url = url;
        }
        record.bio = form.bio;
        record.skills = form.skills;
        record.availability = form.availability;
        record.joined = form.joined;
        record.verified = form.verified;
        record.featured = form.featured;
        if record.verified {
            record.verified_documents = DEFAULT_VERIFIED_DOCUMENTS
                .iter()
                .map(ToString::to_string)
                .collect();
        }

        let mut patches = self.patches.clone();
        patches.set(record.id, WorkerPatch::from_record(&record));
        self.persist(patches)?;

        log::info!("created worker {} ({})", record.id, record.name);
        self.view.workers.push(record.clone());
        Ok(record)
    }

    /// Apply a patch to an existing worker.
    ///
    /// The stored entry is the full resulting record, not the partial
    /// diff, so re-applying it over a stale snapshot reproduces the edit.
    pub fn update(
        &mut self,
        session: &SessionManager,
        id: WorkerId,
        patch: WorkerPatch,
    ) -> Result<WorkerRecord> {
        session.require_authenticated()?;
        let existing = self.view.get(id).ok_or_else(|| Error::not_found(id))?;
        let updated = patch.apply(existing);

        let mut patches = self.patches.clone();
        patches.set(id, WorkerPatch::from_record(&updated));
        self.persist(patches)?;

        log::info!("updated worker {id}");
        let slot = self
            .view
            .workers
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| Error::not_found(id))?;
        *slot = updated.clone();
        Ok(updated)
    }

    /// Remove a worker from the merged view and tombstone its id so a
    /// reload cannot resurrect it from the stale snapshot.
    pub fn delete(&mut self, session: &SessionManager, id: WorkerId) -> Result<()> {
        session.require_authenticated()?;
        if !self.view.contains(id) {
            return Err(Error::not_found(id));
        }

        let mut patches = self.patches.clone();
        patches.tombstone(id);
        self.persist(patches)?;

        log::info!("deleted worker {id}");
        self.view.workers.retain(|w| w.id != id);
        Ok(())
    }

    /// Append a review and recompute the worker's aggregate rating.
    ///
    /// The rating is the mean of the review star values; it is derived
    /// here, at write time, never by the merge engine.
    pub fn add_review(
        &mut self,
        session: &SessionManager,
        id: WorkerId,
        review: Review,
    ) -> Result<WorkerRecord> {
        session.require_authenticated()?;
        let existing = self.view.get(id).ok_or_else(|| Error::not_found(id))?;

        let mut updated = existing.clone();
        updated.reviews.push(review);
        let total: u32 = updated.reviews.iter().map(|r| u32::from(r.stars)).sum();
        updated.rating = f64::from(total) / updated.reviews.len() as f64;

        let mut patches = self.patches.clone();
        patches.set(id, WorkerPatch::from_record(&updated));
        self.persist(patches)?;

        log::info!("added review for worker {id}, rating now {:.2}", updated.rating);
        let slot = self
            .view
            .workers
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| Error::not_found(id))?;
        *slot = updated.clone();
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::NaiveDate;
    use rostra_auth::password_digest;
    use rostra_core::{CredentialRecord, Dataset, merge};
    use rostra_store::{LocalStore, MemoryStore, OverrideStore};

    fn credential() -> CredentialRecord {
        CredentialRecord {
            username: "admin".into(),
            salt: "salty".into(),
            password_digest: password_digest("salty", "correct1"),
        }
    }

    fn authed_session() -> SessionManager {
        let mut mgr = SessionManager::new(Arc::new(MemoryStore::new()));
        mgr.login("admin", "correct1", &credential(), None).unwrap();
        mgr
    }

    fn snapshot(ids: &[WorkerId]) -> Dataset {
        let mut ds = Dataset::fallback();
        for &id in ids {
            let mut w = WorkerRecord::empty(id);
            w.name = format!("Worker {id}");
            w.role = "Cleaner".into();
            ds.workers.push(w);
        }
        ds
    }

    fn repository(ids: &[WorkerId]) -> (Repository, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let overrides = OverrideStore::new(store.clone());
        let ds = snapshot(ids);
        let patches = overrides.read();
        let view = merge(&ds, &patches);
        (Repository::new(view, patches, overrides), store)
    }

    fn form(name: &str) -> WorkerForm {
        WorkerForm {
            name: name.into(),
            role: "Cleaner".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_mutations_require_authenticated_session() {
        let (mut repo, _) = repository(&[1]);
        let unauthed = SessionManager::new(Arc::new(MemoryStore::new()));

        assert!(matches!(
            repo.create(&unauthed, form("Eva")).unwrap_err(),
            Error::Auth { .. }
        ));
        assert!(matches!(
            repo.update(&unauthed, 1, WorkerPatch::default()).unwrap_err(),
            Error::Auth { .. }
        ));
        assert!(matches!(
            repo.delete(&unauthed, 1).unwrap_err(),
            Error::Auth { .. }
        ));
        let date = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        assert!(matches!(
            repo.add_review(&unauthed, 1, Review::new("Ana", "Acme", "ok", 5, date).unwrap())
                .unwrap_err(),
            Error::Auth { .. }
        ));
        // Reads stay open.
        assert_eq!(repo.workers().len(), 1);
    }

    #[test]
    fn test_create_assigns_max_plus_one() {
        let (mut repo, _) = repository(&[1, 2, 5]);
        let session = authed_session();
        let created = repo.create(&session, form("Eva")).unwrap();
        assert_eq!(created.id, 6);
        assert_eq!(created.rating, 0.0);
        assert!(created.reviews.is_empty());
        assert_eq!(created.photo_url, rostra_core::PLACEHOLDER_PHOTO_URL);
    }

    #[test]
    fn test_create_never_reuses_deleted_ids() {
        let (mut repo, _) = repository(&[1, 2]);
        let session = authed_session();
        repo.delete(&session, 2).unwrap();
        let created = repo.create(&session, form("Eva")).unwrap();
        assert_eq!(created.id, 3);
    }

    #[test]
    fn test_create_verified_seeds_documents() {
        let (mut repo, _) = repository(&[]);
        let session = authed_session();
        let mut f = form("Eva");
        f.verified = true;
        let created = repo.create(&session, f).unwrap();
        assert_eq!(created.verified_documents, vec!["ID card", "Background check"]);
    }

    #[test]
    fn test_create_rejects_blank_name() {
        let (mut repo, _) = repository(&[]);
        let session = authed_session();
        let err = repo.create(&session, form("  ")).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn test_update_merges_and_stores_full_record() {
        let (mut repo, store) = repository(&[1]);
        let session = authed_session();
        let patch: WorkerPatch = serde_json::from_str(r#"{"rating": 4.5}"#).unwrap();
        let updated = repo.update(&session, 1, patch).unwrap();
        assert_eq!(updated.rating, 4.5);
        assert_eq!(updated.name, "Worker 1");

        // The persisted entry reproduces the record over an empty base.
        let persisted = OverrideStore::new(store).read();
        let entry = persisted.get(1).unwrap();
        assert_eq!(entry.apply(&WorkerRecord::empty(1)), updated);
    }

    #[test]
    fn test_update_missing_id_is_not_found() {
        let (mut repo, _) = repository(&[1]);
        let session = authed_session();
        let err = repo.update(&session, 99, WorkerPatch::default()).unwrap_err();
        assert!(matches!(err, Error::NotFound { id: 99 }));
    }

    #[test]
    fn test_delete_tombstones_snapshot_record() {
        let (mut repo, store) = repository(&[1, 2]);
        let session = authed_session();
        repo.delete(&session, 1).unwrap();
        assert!(!repo.view().contains(1));

        // A fresh merge of the stale snapshot with the persisted patches
        // does not resurrect the record.
        let persisted = OverrideStore::new(store).read();
        let reloaded = merge(&snapshot(&[1, 2]), &persisted);
        assert!(!reloaded.contains(1));
        assert!(reloaded.contains(2));
    }

    #[test]
    fn test_add_review_recomputes_rating() {
        let (mut repo, _) = repository(&[1]);
        let session = authed_session();
        let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        repo.add_review(
            &session,
            1,
            Review::new("Ana", "Acme", "great", 5, date).unwrap(),
        )
        .unwrap();
        let updated = repo
            .add_review(
                &session,
                1,
                Review::new("Luz", "Beta", "fine", 4, date).unwrap(),
            )
            .unwrap();
        assert_eq!(updated.reviews.len(), 2);
        assert!((updated.rating - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_all_reviews_sorted_newest_first() {
        let (mut repo, _) = repository(&[1, 2]);
        let session = authed_session();
        let old = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let new = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        repo.add_review(&session, 1, Review::new("A", "X", "ok", 4, old).unwrap())
            .unwrap();
        repo.add_review(&session, 2, Review::new("B", "Y", "ok", 5, new).unwrap())
            .unwrap();
        let reviews = repo.all_reviews();
        assert_eq!(reviews[0].1.date, new);
        assert_eq!(reviews[1].1.date, old);
    }

    #[test]
    fn test_search_matches_name_or_role() {
        let (mut repo, _) = repository(&[]);
        let session = authed_session();
        let mut f = form("Marta Ruiz");
        f.role = "Supervisor".into();
        repo.create(&session, f).unwrap();
        repo.create(&session, form("Luis Mendoza")).unwrap();

        assert_eq!(repo.search("marta").len(), 1);
        assert_eq!(repo.search("cleaner").len(), 1);
        assert_eq!(repo.search("").len(), 2);
        assert!(repo.search("nobody").is_empty());
    }

    #[test]
    fn test_stats_counts() {
        let (mut repo, _) = repository(&[]);
        let session = authed_session();
        let mut f = form("Eva");
        f.verified = true;
        f.featured = true;
        repo.create(&session, f).unwrap();
        repo.create(&session, form("Leo")).unwrap();

        let stats = repo.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.verified, 1);
        assert_eq!(stats.featured, 1);
        assert_eq!(stats.reviews, 0);
    }

    /// Store whose writes always fail, for the storage-failure contract.
    struct ReadOnlyStore(MemoryStore);

    impl LocalStore for ReadOnlyStore {
        fn get(&self, key: &str) -> rostra_core::Result<Option<String>> {
            self.0.get(key)
        }
        fn put(&self, _key: &str, _value: &str) -> rostra_core::Result<()> {
            Err(Error::storage("quota exceeded"))
        }
        fn remove(&self, _key: &str) -> rostra_core::Result<()> {
            Err(Error::storage("quota exceeded"))
        }
    }

    #[test]
    fn test_storage_failure_aborts_without_partial_state() {
        let store = Arc::new(ReadOnlyStore(MemoryStore::new()));
        let overrides = OverrideStore::new(store);
        let ds = snapshot(&[1]);
        let view = merge(&ds, &PatchSet::new());
        let mut repo = Repository::new(view, PatchSet::new(), overrides);
        let session = authed_session();

        let err = repo.create(&session, form("Eva")).unwrap_err();
        assert!(matches!(err, Error::Storage { .. }));
        // The merged view is untouched and still usable.
        assert_eq!(repo.workers().len(), 1);
        assert!(repo.delete(&session, 1).is_err());
        assert!(repo.view().contains(1));
    }
}
