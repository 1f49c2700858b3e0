//! The write-back routes.
//!
//! `POST /data` accepts the whole dataset in one shot, gated by an exact
//! bearer-token match, and replaces the snapshot document atomically.
//! `GET /data.json` serves the current document uncached. Requests with
//! the wrong method on `/data` get the router's 405.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use http::{HeaderMap, StatusCode, header};
use rostra_core::Dataset;

use crate::error::{Error, Result};

/// Shared route state: the configured token and the document path.
#[derive(Clone)]
pub struct AppState {
    token: Arc<str>,
    data_path: Arc<PathBuf>,
}

impl AppState {
    /// Build the state from the configured token and snapshot path.
    pub fn new(token: impl Into<Arc<str>>, data_path: impl Into<PathBuf>) -> Self {
        Self {
            token: token.into(),
            data_path: Arc::new(data_path.into()),
        }
    }
}

/// The `/data` + `/data.json` router.
pub fn router(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/data", post(save_data))
        .route("/data.json", get(serve_data))
        .with_state(state)
}

/// Extract the bearer token from the Authorization header.
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Replace `path` with `contents` without a window where a reader can see
/// a partial document.
async fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    tokio::fs::write(&tmp, contents)
        .await
        .map_err(|e| Error::Storage(format!("write {}: {e}", tmp.display())))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| Error::Storage(format!("rename to {}: {e}", path.display())))
}

async fn save_data(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<serde_json::Value>> {
    match extract_bearer_token(&headers) {
        Some(token) if token == state.token.as_ref() => {}
        _ => {
            log::warn!("rejected save: missing or invalid bearer token");
            return Err(Error::Unauthorized(
                "missing or invalid bearer token".into(),
            ));
        }
    }

    let dataset: Dataset = serde_json::from_str(&body)
        .map_err(|e| Error::InvalidPayload(format!("body is not a valid dataset: {e}")))?;

    let pretty = serde_json::to_string_pretty(&dataset)
        .map_err(|e| Error::Storage(format!("serialize dataset: {e}")))?;
    write_atomic(&state.data_path, &pretty).await?;

    log::info!(
        "snapshot document replaced ({} workers)",
        dataset.workers.len()
    );
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "data saved",
    })))
}

async fn serve_data(State(state): State<AppState>) -> Result<Response> {
    let raw = tokio::fs::read_to_string(state.data_path.as_ref())
        .await
        .map_err(|e| Error::Storage(format!("read {}: {e}", state.data_path.display())))?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        Body::from(raw),
    )
        .into_response())
}
