//! File name validation and collision resolution.

use std::path::Path;

use tokio::fs;

use super::storage::is_staging_name;
use crate::{GodwError, Result};

/// Maximum number of numeric suffixes probed in [`CollisionPolicy::AutoSuffix`] mode.
pub const MAX_SUFFIX_ATTEMPTS: u32 = 100;

/// Rule deciding the final on-disk name when the requested one is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Reuse the requested name; the store replaces the existing file once
    /// the new content is complete.
    Overwrite,
    /// Append `.1`, `.2`, ... until a free name is found.
    #[default]
    AutoSuffix,
}

/// Outcome of name resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Final on-disk name.
    pub name: String,
    /// Whether the final name differs from the requested one.
    pub renamed: bool,
}

/// Validate a client-supplied file name.
///
/// Returns the trimmed name. Blank names, `.`/`..` and anything that could
/// address a path outside the store root are rejected.
pub fn validate_name(name: &str) -> Result<&str> {
    let name = name.trim();

    if name.is_empty() {
        return Err(GodwError::InvalidInput("file name is blank".to_string()));
    }
    if name == "." || name == ".." {
        return Err(GodwError::InvalidInput(format!(
            "[{name}] is not a file name"
        )));
    }
    if name
        .chars()
        .any(|c| c == '/' || c == '\\' || c.is_control())
    {
        return Err(GodwError::InvalidInput(format!(
            "[{name}] must not contain path separators or control characters"
        )));
    }
    if is_staging_name(name) {
        return Err(GodwError::InvalidInput(format!(
            "[{name}] uses a reserved prefix"
        )));
    }
    if Path::new(name).is_absolute() {
        return Err(GodwError::InvalidInput(format!(
            "[{name}] must not be an absolute path"
        )));
    }

    Ok(name)
}

/// Decide the final name for `requested` inside `dir`.
///
/// `requested` must already have passed [`validate_name`]. Nothing on disk
/// is modified here.
pub async fn resolve(dir: &Path, requested: &str, policy: CollisionPolicy) -> Result<Resolved> {
    let unchanged = Resolved {
        name: requested.to_string(),
        renamed: false,
    };

    match policy {
        CollisionPolicy::Overwrite => Ok(unchanged),
        CollisionPolicy::AutoSuffix => {
            if !fs::try_exists(dir.join(requested)).await? {
                return Ok(unchanged);
            }
            for attempt in 1..=MAX_SUFFIX_ATTEMPTS {
                let candidate = format!("{requested}.{attempt}");
                if !fs::try_exists(dir.join(&candidate)).await? {
                    return Ok(Resolved {
                        name: candidate,
                        renamed: true,
                    });
                }
            }
            Err(GodwError::ExhaustedNamespace(requested.to_string()))
        }
    }
}
