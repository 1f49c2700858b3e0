//! Fetching the canonical snapshot document.
//!
//! The snapshot is a single JSON document at a well-known path, read via an
//! unauthenticated GET. After an edit round-trip a stale cached copy must
//! never be served, so the HTTP source tags every request with a
//! cache-defeating query parameter and a `no-cache` header.

use async_trait::async_trait;
use chrono::Utc;
use rostra_core::{Dataset, Error, Result};

/// Something that can produce the canonical dataset.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch and parse the snapshot. Transport and parse failures surface
    /// as [`Error::Load`]; the loader above this trait handles recovery.
    async fn fetch(&self) -> Result<Dataset>;
}

// ============================================================================
// HttpSnapshotSource
// ============================================================================

/// Fetches the snapshot over HTTP with cache-defeating semantics.
pub struct HttpSnapshotSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSnapshotSource {
    /// Source reading from `url` (e.g. `https://example.com/data.json`).
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl SnapshotSource for HttpSnapshotSource {
    async fn fetch(&self) -> Result<Dataset> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("t", Utc::now().timestamp_millis())])
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|e| Error::load(format!("GET {}: {e}", self.url)))?
            .error_for_status()
            .map_err(|e| Error::load(format!("GET {}: {e}", self.url)))?;

        response
            .json::<Dataset>()
            .await
            .map_err(|e| Error::load(format!("parse {}: {e}", self.url)))
    }
}

// ============================================================================
// StaticSnapshotSource
// ============================================================================

/// In-memory source for tests and offline use.
pub struct StaticSnapshotSource {
    dataset: Option<Dataset>,
}

impl StaticSnapshotSource {
    /// Source that always yields `dataset`.
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset: Some(dataset),
        }
    }

    /// Source whose fetch always fails, for exercising the fallback path.
    pub fn failing() -> Self {
        Self { dataset: None }
    }
}

#[async_trait]
impl SnapshotSource for StaticSnapshotSource {
    async fn fetch(&self) -> Result<Dataset> {
        self.dataset
            .clone()
            .ok_or_else(|| Error::load("static source configured to fail"))
    }
}

// ============================================================================
// SnapshotLoader
// ============================================================================

/// Loads the snapshot, degrading to the fallback dataset on any failure.
///
/// The system must remain renderable with zero records, so callers never
/// see a load error: it is logged and [`Dataset::fallback`] is returned.
/// First attempt only; no retry policy.
pub struct SnapshotLoader<S: SnapshotSource> {
    source: S,
}

impl<S: SnapshotSource> SnapshotLoader<S> {
    /// Wrap a source.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// The snapshot, or the fallback dataset when the fetch fails.
    pub async fn load(&self) -> Dataset {
        match self.source.fetch().await {
            Ok(dataset) => dataset,
            Err(e) => {
                log::warn!("snapshot load failed, using fallback dataset: {e}");
                Dataset::fallback()
            }
        }
    }
}
