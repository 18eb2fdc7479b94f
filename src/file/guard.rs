//! Upload size enforcement.

use crate::{GodwError, Result};

/// Enforces the configured maximum upload size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeGuard {
    limit: u64,
}

impl SizeGuard {
    /// Create a guard allowing at most `limit` bytes.
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }

    /// The configured limit in bytes.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Check a declared or observed size of the upload `name` against the
    /// limit.
    pub fn check(&self, name: &str, size: u64) -> Result<()> {
        if size > self.limit {
            return Err(GodwError::TooLarge {
                name: name.to_string(),
                size,
                limit: self.limit,
            });
        }
        Ok(())
    }

    /// Check an optional declared size. Unknown sizes pass and are
    /// enforced while streaming instead.
    pub fn check_declared(&self, name: &str, declared: Option<u64>) -> Result<()> {
        match declared {
            Some(size) => self.check(name, size),
            None => Ok(()),
        }
    }
}
