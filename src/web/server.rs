//! Web server for godw.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::{GodwError, Result};

use super::handlers::AppState;
use super::router::{create_health_router, create_router, create_static_router};

/// Web server for the file drop.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Static asset directory.
    template_path: String,
}

impl WebServer {
    /// Create a new web server from configuration.
    ///
    /// Creates the store root if it is missing.
    pub fn new(config: &Config) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| GodwError::Config(format!("invalid server address: {e}")))?;

        let app_state = AppState::from_config(config)?;
        tracing::info!(
            root = %app_state.store.root().display(),
            max_upload_bytes = app_state.guard.limit(),
            "file store initialized"
        );

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            template_path: config.store.template_path.clone(),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Build the full router.
    pub fn router(&self) -> Router {
        let mut router = create_router(self.app_state.clone()).merge(create_health_router());

        match create_static_router(&self.template_path) {
            Some(static_router) => router = router.merge(static_router),
            None => tracing::debug!(
                path = %self.template_path,
                "static asset directory not found, asset mounts disabled"
            ),
        }

        router
    }

    /// Run the web server.
    pub async fn run(self) -> std::result::Result<(), std::io::Error> {
        let router = self.router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router).await
    }
}
