//! File service for godw.
//!
//! Composes name validation, the size guard, collision resolution and the
//! store into the upload and delete operations the web layer calls.

use bytes::Bytes;
use futures::Stream;

use crate::{GodwError, Result};

use super::guard::SizeGuard;
use super::name::{resolve, validate_name, CollisionPolicy};
use super::storage::FileStore;

/// An incoming upload.
#[derive(Debug)]
pub struct Upload<S> {
    /// Name requested by the client.
    pub name: String,
    /// Size declared by the client, if any.
    pub declared_size: Option<u64>,
    /// Content stream.
    pub body: S,
}

impl<S> Upload<S> {
    /// Create a new upload with no declared size.
    pub fn new(name: impl Into<String>, body: S) -> Self {
        Self {
            name: name.into(),
            declared_size: None,
            body,
        }
    }

    /// Set the declared size.
    pub fn with_declared_size(mut self, size: Option<u64>) -> Self {
        self.declared_size = size;
        self
    }
}

/// Result of a stored upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    /// Name the client asked for.
    pub requested: String,
    /// Final on-disk name.
    pub name: String,
    /// Bytes written.
    pub size: u64,
}

impl StoredUpload {
    /// Whether collision resolution picked a different name.
    pub fn renamed(&self) -> bool {
        self.requested != self.name
    }
}

/// Outcome of a best-effort delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The file was removed.
    Removed,
    /// Blank name or no such file; nothing to do.
    Skipped,
}

/// File service for uploads and deletes.
pub struct FileService<'a> {
    store: &'a FileStore,
    guard: SizeGuard,
}

impl<'a> FileService<'a> {
    /// Create a new FileService.
    pub fn new(store: &'a FileStore, guard: SizeGuard) -> Self {
        Self { store, guard }
    }

    /// Store an upload under a name chosen by `policy`.
    ///
    /// A declared size over the limit is rejected before anything touches
    /// the disk; undeclared sizes are enforced while streaming. A rejected
    /// overwrite leaves the existing file in place.
    pub async fn upload<S, E>(&self, upload: Upload<S>, policy: CollisionPolicy) -> Result<StoredUpload>
    where
        S: Stream<Item = std::result::Result<Bytes, E>>,
        E: std::error::Error + Send + Sync + 'static,
    {
        let requested = validate_name(&upload.name)?.to_string();
        self.guard.check_declared(&requested, upload.declared_size)?;

        let resolved = resolve(self.store.root(), &requested, policy).await?;
        let size = match policy {
            CollisionPolicy::Overwrite => {
                self.store
                    .replace(&resolved.name, upload.body, &self.guard)
                    .await?
            }
            CollisionPolicy::AutoSuffix => {
                self.store
                    .write(&resolved.name, upload.body, &self.guard)
                    .await?
            }
        };

        tracing::info!(
            requested = %requested,
            name = %resolved.name,
            size,
            "stored upload"
        );

        Ok(StoredUpload {
            requested,
            name: resolved.name,
            size,
        })
    }

    /// Remove `name` if it names an existing file.
    ///
    /// Blank and missing names are not errors.
    pub async fn delete(&self, name: &str) -> Result<DeleteOutcome> {
        if name.trim().is_empty() {
            return Ok(DeleteOutcome::Skipped);
        }

        match self.store.remove(name).await {
            Ok(()) => {
                tracing::info!(name = name.trim(), "deleted file");
                Ok(DeleteOutcome::Removed)
            }
            Err(GodwError::NotFound(_)) => Ok(DeleteOutcome::Skipped),
            Err(e) => Err(e),
        }
    }
}
