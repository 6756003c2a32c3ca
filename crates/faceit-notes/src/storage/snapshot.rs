//! Last-search roster snapshot.
//!
//! Every successful lookup overwrites `match.json` with the roster that was
//! found. Nothing reads it back; it is there for the user to inspect.

use std::path::{Path, PathBuf};

use tracing::info;

use super::write_json_atomic;
use crate::error::Result;
use crate::faceit::Participant;

/// Writer for the roster snapshot document.
#[derive(Debug, Clone)]
pub struct SessionCache {
    path: PathBuf,
}

impl SessionCache {
    /// Create a cache writing to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the snapshot document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the snapshot with `participants`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    pub fn persist(&self, participants: &[Participant]) -> Result<()> {
        write_json_atomic(&self.path, participants)?;
        info!(
            "Wrote {} participants to {}",
            participants.len(),
            self.path.display()
        );
        Ok(())
    }
}
