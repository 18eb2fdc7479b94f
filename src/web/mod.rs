//! Web layer for godw.
//!
//! HTTP routes for listing, uploading, downloading and deleting files,
//! plus the HTML views and static asset mounts.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;
pub mod view;

pub use error::WebError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
