//! Keyed local persistence.
//!
//! The browser original kept its state in origin-scoped web storage. The
//! [`LocalStore`] trait generalizes that: a handful of well-known string
//! keys, whole-value reads and writes, no partial updates. [`FileStore`]
//! is the persistent implementation (survives restarts, the way
//! `localStorage` survives reloads); [`MemoryStore`] is the ephemeral one
//! (process lifetime, the way `sessionStorage` dies with the tab).

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rostra_core::{Error, Result};

/// Key holding the override patch set.
pub const OVERRIDES_KEY: &str = "overrides";

/// Key holding the operator's changed-password digest override.
pub const PASSWORD_OVERRIDE_KEY: &str = "password_override";

/// Key holding the ephemeral session record.
pub const SESSION_KEY: &str = "session";

/// Key holding the "promotional prompt dismissed" flag.
pub const PROMO_DISMISSED_KEY: &str = "promo_dismissed";

/// Whole-value keyed storage.
///
/// `put` replaces the stored value atomically from the caller's
/// perspective: a concurrent `get` observes either the old value or the
/// new one, never a torn write.
pub trait LocalStore: Send + Sync {
    /// The value stored under `key`, or `None` when the key is unset.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an unset key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

// ============================================================================
// FileStore
// ============================================================================

/// Persistent [`LocalStore`] keeping one file per key under a root
/// directory. Writes go through a sibling temp file and a rename, so a
/// value on disk is always complete.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|e| Error::storage_with_source(format!("create {}", root.display()), e))?;
        Ok(Self { root })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::storage_with_source(
                format!("read {}", path.display()),
                e,
            )),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key);
        let tmp = self.root.join(format!("{key}.json.tmp"));
        fs::write(&tmp, value)
            .map_err(|e| Error::storage_with_source(format!("write {}", tmp.display()), e))?;
        fs::rename(&tmp, &path)
            .map_err(|e| Error::storage_with_source(format!("rename to {}", path.display()), e))
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::storage_with_source(
                format!("remove {}", path.display()),
                e,
            )),
        }
    }
}

/// Where the store keeps its files.
impl AsRef<Path> for FileStore {
    fn as_ref(&self) -> &Path {
        &self.root
    }
}

// ============================================================================
// MemoryStore
// ============================================================================

/// Ephemeral [`LocalStore`] backed by a mutexed map. Used for the
/// tab-scoped session record and for tests.
#[derive(Default)]
pub struct MemoryStore {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let map = self
            .map
            .lock()
            .map_err(|_| Error::storage("memory store poisoned"))?;
        Ok(map.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self
            .map
            .lock()
            .map_err(|_| Error::storage("memory store poisoned"))?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut map = self
            .map
            .lock()
            .map_err(|_| Error::storage("memory store poisoned"))?;
        map.remove(key);
        Ok(())
    }
}
