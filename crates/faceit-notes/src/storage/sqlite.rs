//! `SQLite` note store.
//!
//! Each note is its own row, so a save touches exactly one key. The database
//! is only created by the first save; reads against a database that doesn't
//! exist yet see no notes and leave the disk alone.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use super::schema::{SCHEMA_STATEMENTS, UPSERT_NOTE};
use super::{ensure_parent, NoteStore, Notes};
use crate::error::{Error, Result};

/// Notes kept in an embedded `SQLite` database.
#[derive(Debug)]
pub struct SqliteNoteStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection, opened on first use.
    conn: Mutex<Option<Connection>>,
}

impl SqliteNoteStore {
    /// Create a store for the database at the given path.
    ///
    /// Nothing is opened or created until the store is first used.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            conn: Mutex::new(None),
        }
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Mutex::new(Some(conn)),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When a player's note was last saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn updated_at(&self, player_id: &str) -> Result<Option<DateTime<Utc>>> {
        let value: Option<String> = self
            .with_conn(false, |conn| {
                Ok(conn
                    .query_row(
                        "SELECT updated_at FROM notes WHERE player_id = ?1",
                        [player_id],
                        |row| row.get(0),
                    )
                    .optional()?)
            })?
            .flatten();

        Ok(value
            .and_then(|v| DateTime::parse_from_rfc3339(&v).ok())
            .map(|dt| dt.with_timezone(&Utc)))
    }

    /// Run `f` against the connection, opening it first if needed.
    ///
    /// With `create == false` and no database on disk, returns `Ok(None)`
    /// without creating anything.
    fn with_conn<T>(
        &self,
        create: bool,
        f: impl FnOnce(&Connection) -> Result<T>,
    ) -> Result<Option<T>> {
        let mut guard = self
            .conn
            .lock()
            .map_err(|_| Error::LockPoisoned { store: "notes" })?;

        if guard.is_none() {
            if !create && !self.path.exists() {
                return Ok(None);
            }
            *guard = Some(open_file(&self.path)?);
        }

        match guard.as_ref() {
            Some(conn) => f(conn).map(Some),
            None => Ok(None),
        }
    }
}

fn open_file(path: &Path) -> Result<Connection> {
    ensure_parent(path)?;

    debug!("Opening notes database at {}", path.display());
    let conn = Connection::open(path).map_err(|source| Error::DatabaseOpen {
        path: path.to_path_buf(),
        source,
    })?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
    initialize_schema(&conn)?;

    info!("Notes database opened at {}", path.display());
    Ok(conn)
}

fn initialize_schema(conn: &Connection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, [])?;
    }
    Ok(())
}

impl NoteStore for SqliteNoteStore {
    fn load(&self) -> Result<Notes> {
        let notes = self.with_conn(false, |conn| {
            let mut stmt = conn.prepare("SELECT player_id, note FROM notes")?;
            let notes = stmt
                .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<std::result::Result<Notes, _>>()?;
            Ok(notes)
        })?;
        Ok(notes.unwrap_or_default())
    }

    fn get(&self, player_id: &str) -> Result<Option<String>> {
        let note = self.with_conn(false, |conn| {
            Ok(conn
                .query_row(
                    "SELECT note FROM notes WHERE player_id = ?1",
                    [player_id],
                    |row| row.get(0),
                )
                .optional()?)
        })?;
        Ok(note.flatten())
    }

    fn save(&self, player_id: &str, note: &str) -> Result<()> {
        self.with_conn(true, |conn| {
            conn.execute(
                UPSERT_NOTE,
                params![player_id, note, Utc::now().to_rfc3339()],
            )?;
            Ok(())
        })?;
        debug!("Saved note for {player_id}");
        Ok(())
    }
}
