//! Scan-time file listing.
//!
//! There is no index: every listing walks the store root again, so the
//! result always matches what is on disk at the time of the scan.

use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::fs;

use super::storage::is_staging_name;
use crate::Result;

/// A file found in the store root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredFile {
    /// 1-based position in the listing.
    pub id: usize,
    /// On-disk file name.
    pub name: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Last modification time.
    pub modified_at: DateTime<Utc>,
}

/// Directory-derived file catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    root: PathBuf,
}

impl Catalog {
    /// Create a catalog over `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// List regular files in the root, optionally keeping only names that
    /// contain `filter` (case-insensitive).
    ///
    /// Subdirectories and in-flight overwrite staging files are skipped. Results are sorted by name and numbered
    /// from 1. A missing root yields an empty listing.
    pub async fn list(&self, filter: Option<&str>) -> Result<Vec<StoredFile>> {
        let needle = filter
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_lowercase);

        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            // Entries can vanish between readdir and stat.
            let metadata = match entry.metadata().await {
                Ok(m) => m,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            if !metadata.is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            if is_staging_name(&name) {
                continue;
            }
            if let Some(needle) = &needle {
                if !name.to_lowercase().contains(needle.as_str()) {
                    continue;
                }
            }

            let modified_at = metadata
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_default();

            files.push(StoredFile {
                id: 0,
                name,
                size_bytes: metadata.len(),
                modified_at,
            });
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        for (index, file) in files.iter_mut().enumerate() {
            file.id = index + 1;
        }

        Ok(files)
    }
}
