//! Local persistence for faceit-notes.
//!
//! Two things live on disk: the notes (player id → free text) and a snapshot
//! of the last roster that was looked up. Notes have two interchangeable
//! backends behind [`NoteStore`]: a flat JSON document (the default) and an
//! embedded `SQLite` database.

pub mod json;
pub mod schema;
pub mod snapshot;
pub mod sqlite;

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::config::{Config, NoteBackend};
use crate::error::{Error, Result};

pub use json::JsonNoteStore;
pub use snapshot::SessionCache;
pub use sqlite::SqliteNoteStore;

/// Player id → note.
pub type Notes = BTreeMap<String, String>;

/// Persistent notes keyed by player id.
///
/// Implementations serialise their own writes, so a store can be shared
/// between callers without extra locking.
pub trait NoteStore: Send + Sync + std::fmt::Debug {
    /// Load every note. A store with nothing saved yet returns an empty map.
    ///
    /// # Errors
    ///
    /// Returns an error if existing data cannot be read.
    fn load(&self) -> Result<Notes>;

    /// Look up one player's note.
    ///
    /// # Errors
    ///
    /// Returns an error if existing data cannot be read.
    fn get(&self, player_id: &str) -> Result<Option<String>>;

    /// Create or overwrite one player's note, leaving all others untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the note cannot be persisted.
    fn save(&self, player_id: &str, note: &str) -> Result<()>;
}

/// Open the note store selected by the configuration.
///
/// Neither backend touches the disk until it is first used.
#[must_use]
pub fn open_note_store(config: &Config) -> Box<dyn NoteStore> {
    let path = config.notes_path();
    match config.storage.backend {
        NoteBackend::Json => Box::new(JsonNoteStore::new(path)),
        NoteBackend::Sqlite => Box::new(SqliteNoteStore::new(path)),
    }
}

/// Create the parent directory of `path` if it doesn't exist.
pub(crate) fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}

/// Write `value` as 4-space indented UTF-8 JSON, replacing `path` atomically.
///
/// The document is written to a sibling temp file, synced, then renamed over
/// the target, so readers see either the old or the new document.
pub(crate) fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    ensure_parent(path)?;

    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;

    let tmp_path = temp_path(path);
    let written = File::create(&tmp_path)
        .and_then(|mut tmp_file| {
            tmp_file.write_all(&buf)?;
            tmp_file.sync_all()
        })
        .and_then(|()| fs::rename(&tmp_path, path));

    if let Err(e) = written {
        // The target is left as it was; don't leave the half-written copy beside it.
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_json_uses_four_space_indent_and_keeps_unicode() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        let mut notes = Notes::new();
        notes.insert("p1".to_string(), "тиммейт, играет за AWP".to_string());

        write_json_atomic(&path, &notes).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n    \"p1\": "));
        assert!(text.contains("тиммейт"));
        assert!(!dir.path().join("out.json.tmp").exists());
    }

    #[test]
    fn test_write_json_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/out.json");

        write_json_atomic(&path, &Notes::new()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_failed_write_removes_temp_file() {
        let dir = TempDir::new().unwrap();
        // A non-empty directory in the way makes the final rename fail.
        let path = dir.path().join("out.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let err = write_json_atomic(&path, &Notes::new()).unwrap_err();

        assert!(matches!(err, Error::Io(_)));
        assert!(!dir.path().join("out.json.tmp").exists());
        assert!(path.join("keep").exists());
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let tmp = temp_path(Path::new("/data/database.json"));
        assert_eq!(tmp, PathBuf::from("/data/database.json.tmp"));
    }

    #[test]
    fn test_open_note_store_json_default() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.storage.data_dir = Some(dir.path().to_path_buf());

        let store = open_note_store(&config);
        store.save("p1", "hello").unwrap();
        assert!(dir.path().join("database.json").exists());
    }

    #[test]
    fn test_open_note_store_sqlite() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.storage.data_dir = Some(dir.path().to_path_buf());
        config.storage.backend = NoteBackend::Sqlite;

        let store = open_note_store(&config);
        store.save("p1", "hello").unwrap();
        assert!(dir.path().join("notes.db").exists());
        assert_eq!(store.get("p1").unwrap().as_deref(), Some("hello"));
    }
}
