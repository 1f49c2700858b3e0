//! # rostra-api
//!
//! The write-back HTTP endpoint for the Rostra snapshot document:
//!
//! - [`routes`] — `POST /data` (token-gated bulk overwrite, atomic
//!   replace) and `GET /data.json` (uncached serving)
//! - [`config`] — TOML file plus environment-variable configuration
//! - [`server`] — the axum serving loop

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod routes;
pub mod server;

pub use config::Config;
pub use error::{Error, Result};
pub use routes::{AppState, router};
pub use server::Server;
