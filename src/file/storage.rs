//! File storage for godw.
//!
//! Files live flat under a single root directory, stored under the name the
//! client asked for (after collision resolution). This is the only place
//! that reads, writes or removes file content.

use std::fs as std_fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;

use super::guard::SizeGuard;
use super::name::validate_name;
use crate::{GodwError, Result};

/// Prefix of the staging files used by [`FileStore::replace`].
pub const STAGING_PREFIX: &str = ".godw-upload-";

static STAGING_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Whether `name` is an in-flight staging file rather than a stored upload.
pub fn is_staging_name(name: &str) -> bool {
    name.starts_with(STAGING_PREFIX)
}

fn staging_name() -> String {
    let nonce = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let seq = STAGING_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{STAGING_PREFIX}{nonce}-{seq}")
}

/// An opened stored file ready to be streamed to a client.
///
/// The handle is closed when this value (or the stream built from it) is
/// dropped.
#[derive(Debug)]
pub struct Download {
    /// Open read handle.
    pub file: File,
    /// File length in bytes at open time.
    pub len: u64,
}

/// Removes a partially written file unless disarmed.
struct PartialFile {
    path: PathBuf,
    armed: bool,
}

impl PartialFile {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match std_fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "removed partial upload");
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to remove partial upload"
                );
            }
        }
    }
}

/// File store rooted at a single directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Store root directory.
    root: PathBuf,
}

impl FileStore {
    /// Create a new FileStore with the given root.
    ///
    /// The root directory will be created if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        Self::create(&root)?;

        Ok(Self { root })
    }

    /// Ensure `dir` exists. Idempotent.
    pub fn create(dir: &Path) -> Result<()> {
        std_fs::create_dir_all(dir)?;
        Ok(())
    }

    /// Get the root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a client-supplied name to a path under the root.
    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        let name = validate_name(name)?;
        Ok(self.root.join(name))
    }

    /// Stream `source` into a newly created file called `name`.
    ///
    /// The file must not exist yet. Every chunk is checked against `guard`;
    /// on any failure the partial file is removed before returning.
    pub async fn write<S, E>(&self, name: &str, source: S, guard: &SizeGuard) -> Result<u64>
    where
        S: Stream<Item = std::result::Result<Bytes, E>>,
        E: std::error::Error + Send + Sync + 'static,
    {
        let path = self.path_for(name)?;

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => GodwError::Exists(name.to_string()),
                _ => GodwError::Io(e),
            })?;
        let mut partial = PartialFile::new(path);

        let written = copy_stream(file, name, source, guard).await?;
        partial.disarm();

        Ok(written)
    }

    /// Stream `source` into `name`, replacing any existing file.
    ///
    /// The content is staged next to the target and renamed over it only
    /// once the whole stream has passed `guard`, so a rejected upload leaves
    /// the existing file untouched.
    pub async fn replace<S, E>(&self, name: &str, source: S, guard: &SizeGuard) -> Result<u64>
    where
        S: Stream<Item = std::result::Result<Bytes, E>>,
        E: std::error::Error + Send + Sync + 'static,
    {
        let path = self.path_for(name)?;
        let staging = self.root.join(staging_name());

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&staging)
            .await?;
        let mut partial = PartialFile::new(staging.clone());

        let written = copy_stream(file, name, source, guard).await?;
        fs::rename(&staging, &path).await?;
        partial.disarm();

        Ok(written)
    }

    /// Open `name` for reading.
    pub async fn open(&self, name: &str) -> Result<Download> {
        let path = self.path_for(name)?;

        let file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(GodwError::NotFound(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Err(GodwError::NotFound(name.to_string()));
        }

        Ok(Download {
            file,
            len: metadata.len(),
        })
    }

    /// Remove `name` from the store.
    pub async fn remove(&self, name: &str) -> Result<()> {
        let path = self.path_for(name)?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(GodwError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check if a regular file called `name` exists in the store.
    pub async fn exists(&self, name: &str) -> bool {
        let Ok(path) = self.path_for(name) else {
            return false;
        };
        fs::metadata(&path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }
}

async fn copy_stream<S, E>(mut file: File, name: &str, source: S, guard: &SizeGuard) -> Result<u64>
where
    S: Stream<Item = std::result::Result<Bytes, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    let mut source = std::pin::pin!(source);
    let mut total: u64 = 0;

    while let Some(chunk) = source.next().await {
        let chunk = chunk.map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        total = total.saturating_add(chunk.len() as u64);
        guard.check(name, total)?;
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use tempfile::TempDir;
    use tokio::io::AsyncReadExt;

    fn setup_store() -> (TempDir, FileStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path()).unwrap();
        (temp_dir, store)
    }

    fn chunks(parts: &[&'static str]) -> impl Stream<Item = io::Result<Bytes>> {
        stream::iter(
            parts
                .iter()
                .map(|p| Ok(Bytes::from_static(p.as_bytes())))
                .collect::<Vec<_>>(),
        )
    }

    async fn read_all(store: &FileStore, name: &str) -> Vec<u8> {
        let mut download = store.open(name).await.unwrap();
        let mut buf = Vec::new();
        download.file.read_to_end(&mut buf).await.unwrap();
        buf
    }

    #[test]
    fn test_new_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("files");

        assert!(!root.exists());

        let store = FileStore::new(&root).unwrap();

        assert!(root.is_dir());
        assert_eq!(store.root(), root);

        // Idempotent
        FileStore::create(&root).unwrap();
    }

    #[test]
    fn test_path_for_rejects_traversal() {
        let (_temp_dir, store) = setup_store();

        assert!(matches!(
            store.path_for("../secret"),
            Err(GodwError::InvalidInput(_))
        ));
        assert_eq!(
            store.path_for(" a.txt ").unwrap(),
            store.root().join("a.txt")
        );
    }

    #[tokio::test]
    async fn test_write_and_open() {
        let (_temp_dir, store) = setup_store();
        let guard = SizeGuard::new(1024);

        let written = store
            .write("hello.txt", chunks(&["Hello, ", "World!"]), &guard)
            .await
            .unwrap();

        assert_eq!(written, 13);
        let download = store.open("hello.txt").await.unwrap();
        assert_eq!(download.len, 13);
        assert_eq!(read_all(&store, "hello.txt").await, b"Hello, World!");
    }

    #[tokio::test]
    async fn test_write_empty_file() {
        let (_temp_dir, store) = setup_store();

        let written = store
            .write("empty", chunks(&[]), &SizeGuard::new(10))
            .await
            .unwrap();

        assert_eq!(written, 0);
        assert!(store.exists("empty").await);
    }

    #[tokio::test]
    async fn test_write_existing_name_fails() {
        let (_temp_dir, store) = setup_store();
        let guard = SizeGuard::new(1024);
        store.write("a", chunks(&["one"]), &guard).await.unwrap();

        let result = store.write("a", chunks(&["two"]), &guard).await;

        assert!(matches!(result, Err(GodwError::Exists(n)) if n == "a"));
        assert_eq!(read_all(&store, "a").await, b"one");
    }

    #[tokio::test]
    async fn test_write_too_large_removes_partial() {
        let (_temp_dir, store) = setup_store();
        let guard = SizeGuard::new(8);

        let result = store
            .write("big.bin", chunks(&["12345", "67890"]), &guard)
            .await;

        assert!(matches!(
            result,
            Err(GodwError::TooLarge { ref name, size: 10, limit: 8 }) if name == "big.bin"
        ));
        assert!(!store.exists("big.bin").await);
        assert!(!store.root().join("big.bin").exists());
    }

    #[tokio::test]
    async fn test_write_stream_error_removes_partial() {
        let (_temp_dir, store) = setup_store();
        let source = stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "client gone")),
        ]);

        let result = store.write("cut.bin", source, &SizeGuard::new(1024)).await;

        assert!(matches!(result, Err(GodwError::Io(_))));
        assert!(!store.root().join("cut.bin").exists());
    }

    #[tokio::test]
    async fn test_open_not_found() {
        let (_temp_dir, store) = setup_store();

        let result = store.open("missing.txt").await;

        assert!(matches!(result, Err(GodwError::NotFound(n)) if n == "missing.txt"));
        assert!(!store.root().join("missing.txt").exists());
    }

    #[tokio::test]
    async fn test_open_directory_is_not_found() {
        let (_temp_dir, store) = setup_store();
        std::fs::create_dir(store.root().join("sub")).unwrap();

        assert!(matches!(
            store.open("sub").await,
            Err(GodwError::NotFound(_))
        ));
        assert!(!store.exists("sub").await);
    }

    #[tokio::test]
    async fn test_remove() {
        let (_temp_dir, store) = setup_store();
        store
            .write("gone.txt", chunks(&["bye"]), &SizeGuard::new(10))
            .await
            .unwrap();

        store.remove("gone.txt").await.unwrap();

        assert!(!store.exists("gone.txt").await);
        assert!(matches!(
            store.remove("gone.txt").await,
            Err(GodwError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_exists_invalid_name() {
        let (_temp_dir, store) = setup_store();
        assert!(!store.exists("..").await);
        assert!(!store.exists("").await);
    }

    #[tokio::test]
    async fn test_binary_content() {
        let (_temp_dir, store) = setup_store();
        let content: Vec<u8> = (0..=255).collect();
        let source = stream::iter(vec![Ok::<_, io::Error>(Bytes::from(content.clone()))]);

        store
            .write("binary.bin", source, &SizeGuard::new(256))
            .await
            .unwrap();

        assert_eq!(read_all(&store, "binary.bin").await, content);
    }

    #[tokio::test]
    async fn test_replace_existing_file() {
        let (_temp_dir, store) = setup_store();
        let guard = SizeGuard::new(64);
        store.write("cfg", chunks(&["old"]), &guard).await.unwrap();

        let written = store
            .replace("cfg", chunks(&["new ", "content"]), &guard)
            .await
            .unwrap();

        assert_eq!(written, 11);
        assert_eq!(read_all(&store, "cfg").await, b"new content");
        assert_eq!(std::fs::read_dir(store.root()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_replace_missing_file() {
        let (_temp_dir, store) = setup_store();

        store
            .replace("fresh.txt", chunks(&["hi"]), &SizeGuard::new(8))
            .await
            .unwrap();

        assert_eq!(read_all(&store, "fresh.txt").await, b"hi");
    }

    #[tokio::test]
    async fn test_replace_too_large_keeps_existing() {
        let (_temp_dir, store) = setup_store();
        let guard = SizeGuard::new(8);
        store.write("cfg", chunks(&["keep me"]), &guard).await.unwrap();

        let result = store
            .replace("cfg", chunks(&["12345", "67890"]), &guard)
            .await;

        assert!(matches!(result, Err(GodwError::TooLarge { .. })));
        assert_eq!(read_all(&store, "cfg").await, b"keep me");
        // No staging file is left behind.
        assert_eq!(std::fs::read_dir(store.root()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_replace_stream_error_keeps_existing() {
        let (_temp_dir, store) = setup_store();
        store
            .write("cfg", chunks(&["keep me"]), &SizeGuard::new(64))
            .await
            .unwrap();
        let source = stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "client gone")),
        ]);

        let result = store.replace("cfg", source, &SizeGuard::new(64)).await;

        assert!(matches!(result, Err(GodwError::Io(_))));
        assert_eq!(read_all(&store, "cfg").await, b"keep me");
        assert_eq!(std::fs::read_dir(store.root()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_replace_directory_fails_and_cleans_up() {
        let (_temp_dir, store) = setup_store();
        std::fs::create_dir(store.root().join("sub")).unwrap();

        let result = store
            .replace("sub", chunks(&["data"]), &SizeGuard::new(64))
            .await;

        assert!(matches!(result, Err(GodwError::Io(_))));
        assert!(store.root().join("sub").is_dir());
        assert_eq!(std::fs::read_dir(store.root()).unwrap().count(), 1);
    }

    #[test]
    fn test_staging_names_are_unique() {
        let a = staging_name();
        let b = staging_name();

        assert_ne!(a, b);
        assert!(is_staging_name(&a));
        assert!(!is_staging_name("x"));
    }
}
