//! The export bridge.
//!
//! Serializes the full merged dataset for manual download or handoff to
//! the write-back endpoint. The payload is exactly the shape the snapshot
//! loader re-ingests, so export followed by import is lossless.

use chrono::NaiveDate;
use rostra_core::{Dataset, MergedView, Result};

/// The merged dataset, pretty-printed.
pub fn export_json(view: &MergedView) -> Result<String> {
    Ok(serde_json::to_string_pretty(&view.to_dataset())?)
}

/// Download filename for an export taken on `date`:
/// `rostra_data_YYYY-MM-DD.json`.
pub fn export_filename(date: NaiveDate) -> String {
    format!("rostra_data_{}.json", date.format("%Y-%m-%d"))
}

/// Parse a dataset document, as the snapshot loader would.
pub fn parse_dataset(json: &str) -> Result<Dataset> {
    Ok(serde_json::from_str(json)?)
}
