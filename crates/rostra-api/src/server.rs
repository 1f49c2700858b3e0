//! Serving loop for the write-back endpoint.

use tokio::net::TcpListener;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::routes::{AppState, router};

/// The write-back HTTP server.
pub struct Server {
    config: Config,
}

impl Server {
    /// Create a server from its configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Bind and serve until the task is cancelled.
    pub async fn run(self) -> Result<()> {
        let state = AppState::new(self.config.token.as_str(), self.config.data_path.clone());
        let app = router(state);

        let listener = TcpListener::bind(self.config.addr)
            .await
            .map_err(|e| Error::Config(format!("bind {}: {e}", self.config.addr)))?;
        tracing::info!(
            addr = %self.config.addr,
            data_path = %self.config.data_path.display(),
            "serving"
        );

        axum::serve(listener, app)
            .await
            .map_err(|e| Error::Storage(format!("serve: {e}")))
    }
}
