//! godw - a minimal HTTP file drop.
//!
//! Clients upload files over HTTP, the service keeps them in a flat local
//! directory, lists them on request, serves downloads and lets the admin
//! delete them.

pub mod auth;
pub mod config;
pub mod datetime;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use auth::{Access, AuthGate, Capability};
pub use config::Config;
pub use error::{GodwError, Result};
pub use file::{Catalog, CollisionPolicy, FileService, FileStore, SizeGuard, StoredFile, Upload};
pub use web::{create_router, AppState, WebServer};
