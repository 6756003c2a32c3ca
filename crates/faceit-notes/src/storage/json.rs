//! JSON document note store.
//!
//! The whole mapping lives in one JSON object. A save reads the document,
//! updates one key and writes it back, all while holding the store's lock.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use super::{write_json_atomic, NoteStore, Notes};
use crate::error::{Error, Result};

/// Notes kept in a single JSON document.
#[derive(Debug)]
pub struct JsonNoteStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonNoteStore {
    /// Create a store backed by the document at `path`.
    ///
    /// Nothing is touched on disk until the first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document without taking the lock.
    fn read(&self) -> Result<Notes> {
        if !self.path.exists() {
            return Ok(Notes::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Notes::new());
        }

        Ok(serde_json::from_str(&content)?)
    }
}

impl NoteStore for JsonNoteStore {
    fn load(&self) -> Result<Notes> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| Error::LockPoisoned { store: "notes" })?;
        self.read()
    }

    fn get(&self, player_id: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(player_id))
    }

    fn save(&self, player_id: &str, note: &str) -> Result<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| Error::LockPoisoned { store: "notes" })?;

        let mut notes = self.read()?;
        notes.insert(player_id.to_string(), note.to_string());
        write_json_atomic(&self.path, &notes)?;

        debug!("Saved note for {player_id} ({} notes total)", notes.len());
        Ok(())
    }
}
