//! The admin console controller.
//!
//! One controller owns the merged view and every collaborator around it;
//! UI layers call its command methods and hold no business logic of their
//! own. The merged view is an explicit value passed to whoever needs it,
//! never ambient global state.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rostra_auth::{PasswordVault, Session, SessionManager};
use rostra_core::{
    Dataset, MergedView, Result, Review, WorkerId, WorkerPatch, WorkerRecord, merge,
};
use rostra_store::{
    LocalStore, OverrideStore, PROMO_DISMISSED_KEY, SnapshotLoader, SnapshotSource,
};

use crate::repository::{Repository, RosterStats, WorkerForm};

/// Fixed one-time delay before the promotional prompt is shown.
pub const PROMO_DELAY: Duration = Duration::from_secs(15);

/// Top-level controller wiring loader, stores, session, and repository.
///
/// `persistent` plays the role of origin-scoped browser storage (patch
/// set, password override, promo flag); `ephemeral` the tab-scoped store
/// holding the session.
pub struct Console<S: SnapshotSource> {
    loader: SnapshotLoader<S>,
    snapshot: Dataset,
    overrides: OverrideStore,
    vault: PasswordVault,
    session: SessionManager,
    persistent: Arc<dyn LocalStore>,
    repository: Repository,
}

impl<S: SnapshotSource> Console<S> {
    /// Load the snapshot (or its fallback), read the persisted overrides,
    /// merge, and wire everything up.
    pub async fn open(
        source: S,
        persistent: Arc<dyn LocalStore>,
        ephemeral: Arc<dyn LocalStore>,
    ) -> Self {
        let loader = SnapshotLoader::new(source);
        let overrides = OverrideStore::new(persistent.clone());
        let vault = PasswordVault::new(persistent.clone());
        let session = SessionManager::new(ephemeral);

        let snapshot = loader.load().await;
        let patches = overrides.read();
        let view = merge(&snapshot, &patches);
        let repository = Repository::new(view, patches, overrides.clone());

        Self {
            loader,
            snapshot,
            overrides,
            vault,
            session,
            persistent,
            repository,
        }
    }

    /// Fetch a fresh snapshot, re-read the same override store, and
    /// rebuild the merged view.
    pub async fn reload(&mut self) {
        self.snapshot = self.loader.load().await;
        let patches = self.overrides.read();
        let view = merge(&self.snapshot, &patches);
        self.repository = Repository::new(view, patches, self.overrides.clone());
    }

    // ------------------------------------------------------------------
    // Auth commands
    // ------------------------------------------------------------------

    /// Attempt a login against the snapshot credential, honoring any
    /// locally stored digest override.
    pub fn login(&mut self, username: &str, password: &str) -> Result<()> {
        let credential = self.repository.view().auth.clone();
        let override_digest = self.vault.override_digest();
        self.session
            .login(username, password, &credential, override_digest.as_deref())
            .map(|_| ())
    }

    /// Explicit logout.
    pub fn logout(&mut self) {
        self.session.logout();
    }

    /// The current session, if authenticated.
    pub fn session(&self) -> Option<&Session> {
        self.session.current()
    }

    /// Whether the operator is logged in.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Time left in the failed-login cooldown, if armed.
    pub fn login_cooldown(&self) -> Option<Duration> {
        self.session.cooldown_remaining()
    }

    /// Change the operator password (see
    /// [`PasswordVault::change_password`]).
    pub fn change_password(&self, current: &str, new: &str, confirm: &str) -> Result<()> {
        self.vault
            .change_password(&self.repository.view().auth, current, new, confirm)
    }

    // ------------------------------------------------------------------
    // Roster commands
    // ------------------------------------------------------------------

    /// The merged view all surfaces read.
    pub fn view(&self) -> &MergedView {
        self.repository.view()
    }

    /// Read-only repository access (search, stats, reviews).
    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    /// Create a worker. Requires an authenticated session.
    pub fn create_worker(&mut self, form: WorkerForm) -> Result<WorkerRecord> {
        self.repository.create(&self.session, form)
    }

    /// Update a worker. Requires an authenticated session.
    pub fn update_worker(&mut self, id: WorkerId, patch: WorkerPatch) -> Result<WorkerRecord> {
        self.repository.update(&self.session, id, patch)
    }

    /// Delete a worker. Requires an authenticated session.
    pub fn delete_worker(&mut self, id: WorkerId) -> Result<()> {
        self.repository.delete(&self.session, id)
    }

    /// Add a review and recompute the worker's rating. Requires an
    /// authenticated session.
    pub fn add_review(&mut self, id: WorkerId, review: Review) -> Result<WorkerRecord> {
        self.repository.add_review(&self.session, id, review)
    }

    /// Dashboard counts.
    pub fn stats(&self) -> RosterStats {
        self.repository.stats()
    }

    // ------------------------------------------------------------------
    // Export and reset
    // ------------------------------------------------------------------

    /// The full merged dataset, pretty-printed. Read-only; no session
    /// required.
    pub fn export(&self) -> Result<String> {
        rostra_store::export_json(self.repository.view())
    }

    /// Suggested download filename for an export taken now.
    pub fn export_filename(&self) -> String {
        rostra_store::export_filename(Utc::now().date_naive())
    }

    /// Drop all local overrides and rebuild the view from the last loaded
    /// snapshot alone.
    pub fn reset_overrides(&mut self) -> Result<()> {
        self.overrides.clear()?;
        let patches = self.overrides.read();
        let view = merge(&self.snapshot, &patches);
        self.repository = Repository::new(view, patches, self.overrides.clone());
        Ok(())
    }

    // ------------------------------------------------------------------
    // Promotional prompt
    // ------------------------------------------------------------------

    /// Whether the one-time promotional prompt should be scheduled (it has
    /// not been dismissed before). The caller owns the [`PROMO_DELAY`]
    /// timer; this controller holds no background tasks.
    pub fn promo_pending(&self) -> bool {
        !matches!(
            self.persistent.get(PROMO_DISMISSED_KEY),
            Ok(Some(ref v)) if v == "true"
        )
    }

    /// Record that the promotional prompt was dismissed.
    pub fn dismiss_promo(&self) -> Result<()> {
        self.persistent.put(PROMO_DISMISSED_KEY, "true")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rostra_auth::password_digest;
    use rostra_core::CredentialRecord;
    use rostra_store::{MemoryStore, StaticSnapshotSource};

    fn snapshot() -> Dataset {
        let mut ds = Dataset::fallback();
        let mut w = WorkerRecord::empty(1);
        w.name = "A".into();
        w.role = "Cleaner".into();
        w.rating = 4.0;
        ds.workers.push(w);
        ds.auth = CredentialRecord {
            username: "admin".into(),
            salt: "salty".into(),
            password_digest: password_digest("salty", "correct1"),
        };
        ds
    }

    async fn console(persistent: Arc<MemoryStore>) -> Console<StaticSnapshotSource> {
        Console::open(
            StaticSnapshotSource::new(snapshot()),
            persistent,
            Arc::new(MemoryStore::new()),
        )
        .await
    }

    #[tokio::test]
    async fn test_open_merges_snapshot_and_overrides() {
        let mut c = console(Arc::new(MemoryStore::new())).await;
        c.login("admin", "correct1").unwrap();
        let patch: WorkerPatch = serde_json::from_str(r#"{"rating": 4.5}"#).unwrap();
        c.update_worker(1, patch).unwrap();
        assert_eq!(c.view().get(1).unwrap().rating, 4.5);
    }

    #[tokio::test]
    async fn test_reload_reproduces_persisted_edit() {
        let persistent = Arc::new(MemoryStore::new());
        {
            let mut c = console(persistent.clone()).await;
            c.login("admin", "correct1").unwrap();
            let patch: WorkerPatch = serde_json::from_str(r#"{"rating": 4.5}"#).unwrap();
            c.update_worker(1, patch).unwrap();
        }
        // Fresh console, fresh snapshot, same persistent store.
        let c = console(persistent).await;
        let worker = c.view().get(1).unwrap();
        assert_eq!(worker.rating, 4.5);
        assert_eq!(worker.name, "A");
    }

    #[tokio::test]
    async fn test_delete_survives_reload() {
        let persistent = Arc::new(MemoryStore::new());
        {
            let mut c = console(persistent.clone()).await;
            c.login("admin", "correct1").unwrap();
            c.delete_worker(1).unwrap();
        }
        let c = console(persistent).await;
        assert!(!c.view().contains(1));
    }

    #[tokio::test]
    async fn test_mutations_gated_when_logged_out() {
        let mut c = console(Arc::new(MemoryStore::new())).await;
        assert!(c.delete_worker(1).is_err());
        c.login("admin", "correct1").unwrap();
        c.logout();
        assert!(c.delete_worker(1).is_err());
        // But export stays available.
        assert!(c.export().is_ok());
    }

    #[tokio::test]
    async fn test_login_uses_changed_password_after_change() {
        let persistent = Arc::new(MemoryStore::new());
        let c = console(persistent.clone()).await;
        c.change_password("correct1", "newpass1", "newpass1").unwrap();

        let mut c = console(persistent).await;
        assert!(c.login("admin", "correct1").is_err());
        // Failed attempt armed the cooldown; use a fresh session scope.
        let mut c2 = Console::open(
            StaticSnapshotSource::new(snapshot()),
            c.persistent.clone(),
            Arc::new(MemoryStore::new()),
        )
        .await;
        assert!(c2.login("admin", "newpass1").is_ok());
    }

    #[tokio::test]
    async fn test_reset_overrides_restores_snapshot_view() {
        let mut c = console(Arc::new(MemoryStore::new())).await;
        c.login("admin", "correct1").unwrap();
        c.delete_worker(1).unwrap();
        assert!(!c.view().contains(1));

        c.reset_overrides().unwrap();
        assert!(c.view().contains(1));
        assert_eq!(c.view().get(1).unwrap().rating, 4.0);
    }

    #[tokio::test]
    async fn test_promo_prompt_flag() {
        let c = console(Arc::new(MemoryStore::new())).await;
        assert!(c.promo_pending());
        c.dismiss_promo().unwrap();
        assert!(!c.promo_pending());
        assert_eq!(PROMO_DELAY, Duration::from_secs(15));
    }

    #[tokio::test]
    async fn test_export_round_trips_into_fresh_console() {
        let mut c = console(Arc::new(MemoryStore::new())).await;
        c.login("admin", "correct1").unwrap();
        let patch: WorkerPatch = serde_json::from_str(r#"{"rating": 4.5}"#).unwrap();
        c.update_worker(1, patch).unwrap();

        let exported = c.export().unwrap();
        let dataset = rostra_store::parse_dataset(&exported).unwrap();

        // A console loading the exported dataset with no overrides sees
        // the same merged view.
        let fresh = Console::open(
            StaticSnapshotSource::new(dataset),
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
        )
        .await;
        assert_eq!(fresh.view(), c.view());
    }
}
