//! Request handlers for the web layer.

pub mod file;
pub mod listing;

pub use file::*;
pub use listing::*;

use crate::auth::AuthGate;
use crate::config::Config;
use crate::file::{Catalog, FileStore, SizeGuard};
use crate::Result;

/// Shared application state.
///
/// Built once from the configuration and shared read-only by every request.
#[derive(Debug, Clone)]
pub struct AppState {
    /// File store.
    pub store: FileStore,
    /// Listing over the store root.
    pub catalog: Catalog,
    /// Admin capability gate.
    pub gate: AuthGate,
    /// Upload size limit.
    pub guard: SizeGuard,
    /// Timezone for displayed times.
    pub timezone: String,
}

impl AppState {
    /// Create a new application state.
    pub fn new(store: FileStore, gate: AuthGate, guard: SizeGuard) -> Self {
        let catalog = Catalog::new(store.root());
        Self {
            store,
            catalog,
            gate,
            guard,
            timezone: "UTC".to_string(),
        }
    }

    /// Set the display timezone.
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    /// Build the state from configuration, creating the store root.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = FileStore::new(&config.store.root)?;
        Ok(Self::new(
            store,
            AuthGate::new(config.admin.clone()),
            SizeGuard::new(config.size),
        )
        .with_timezone(config.server.timezone.clone()))
    }
}
