//! File management module for godw.
//!
//! This module provides the file drop core:
//! - Name validation and collision resolution
//! - Upload size enforcement
//! - Streaming storage under a flat root directory
//! - Scan-time listing

mod catalog;
mod guard;
mod name;
mod service;
mod storage;

pub use catalog::{Catalog, StoredFile};
pub use guard::SizeGuard;
pub use name::{resolve, validate_name, CollisionPolicy, Resolved, MAX_SUFFIX_ATTEMPTS};
pub use service::{DeleteOutcome, FileService, StoredUpload, Upload};
pub use storage::{Download, FileStore};
