//! `SQLite` schema for the notes database.

/// SQL statement to create the notes table.
pub const CREATE_NOTES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS notes (
    player_id TEXT PRIMARY KEY NOT NULL,
    note TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

/// Upsert one note, replacing any existing note for the player.
pub const UPSERT_NOTE: &str = r"
INSERT INTO notes (player_id, note, updated_at) VALUES (?1, ?2, ?3)
ON CONFLICT(player_id) DO UPDATE SET note = excluded.note, updated_at = excluded.updated_at
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_NOTES_TABLE];
