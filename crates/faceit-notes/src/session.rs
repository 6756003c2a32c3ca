//! One search cycle and the note-save handler.
//!
//! A search runs strictly in order: resolve the match id, fetch the record,
//! extract the roster, write the snapshot, then build the view. If any step
//! fails, the later ones don't run, so a failed lookup never touches the
//! snapshot and never yields a partial roster.

use tracing::{debug, info};

use crate::config::Config;
use crate::error::Result;
use crate::faceit::{extract_roster, match_id_from_url, FaceitClient, MatchSource, Roster};
use crate::storage::{open_note_store, NoteStore, SessionCache};
use crate::view::RosterView;

/// A user action on a rendered roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteEvent {
    /// Save the note typed for a participant.
    Save {
        /// Who the note is about.
        participant_id: String,
        /// The note text as entered.
        note: String,
    },
}

impl NoteEvent {
    /// Build a save event.
    #[must_use]
    pub fn save(participant_id: impl Into<String>, note: impl Into<String>) -> Self {
        Self::Save {
            participant_id: participant_id.into(),
            note: note.into(),
        }
    }
}

/// Result of a successful search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// The match id taken from the link.
    pub match_id: String,
    /// Extracted roster.
    pub roster: Roster,
    /// Rows ready to render.
    pub view: RosterView,
}

/// Ties the match source, note store and snapshot together.
#[derive(Debug)]
pub struct Session<S> {
    source: S,
    notes: Box<dyn NoteStore>,
    cache: SessionCache,
    placeholder: String,
}

impl Session<FaceitClient> {
    /// Build a session talking to the real Faceit API.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the HTTP client cannot
    /// be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            FaceitClient::new(&config.api)?,
            open_note_store(config),
            SessionCache::new(config.snapshot_path()),
            config.display.placeholder_avatar.clone(),
        ))
    }
}

impl<S: MatchSource> Session<S> {
    /// Assemble a session from its parts.
    #[must_use]
    pub fn new(
        source: S,
        notes: Box<dyn NoteStore>,
        cache: SessionCache,
        placeholder: impl Into<String>,
    ) -> Self {
        Self {
            source,
            notes,
            cache,
            placeholder: placeholder.into(),
        }
    }

    /// The note store.
    #[must_use]
    pub fn notes(&self) -> &dyn NoteStore {
        self.notes.as_ref()
    }

    /// The snapshot writer.
    #[must_use]
    pub fn cache(&self) -> &SessionCache {
        &self.cache
    }

    /// Look up a matchroom link and build the roster view.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::EmptyMatchUrl`] for blank input (nothing is
    /// fetched or written), a remote error if the lookup fails, or
    /// [`crate::Error::MalformedMatch`] if the record has no usable roster
    /// (no snapshot is written).
    pub async fn search(&self, input: &str) -> Result<SearchOutcome> {
        let match_id = match_id_from_url(input)?;
        debug!("Searching match {match_id}");

        let record = self.source.fetch_match(match_id).await?;
        let roster = extract_roster(&record)?;
        self.cache.persist(&roster.to_participants())?;

        let notes = self.notes.load()?;
        let view = RosterView::build(&roster, &notes, &self.placeholder);
        info!(
            "Match {match_id}: {} players in {} teams",
            roster.len(),
            roster.teams.len()
        );

        Ok(SearchOutcome {
            match_id: match_id.to_string(),
            roster,
            view,
        })
    }

    /// Apply a user action.
    ///
    /// Surrounding whitespace is stripped from notes before saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the note store cannot persist the change.
    pub fn handle(&self, event: NoteEvent) -> Result<()> {
        match event {
            NoteEvent::Save {
                participant_id,
                note,
            } => self.notes.save(&participant_id, note.trim()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::storage::JsonNoteStore;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    const PLACEHOLDER: &str = "https://placeholder/black.jpg";

    struct FakeSource {
        record: Value,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn new(record: Value) -> Self {
            Self {
                record,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl MatchSource for FakeSource {
        async fn fetch_match(&self, _match_id: &str) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.record.clone())
        }
    }

    fn session(dir: &TempDir, record: Value) -> Session<FakeSource> {
        crate::logging::init_test_logging();
        Session::new(
            FakeSource::new(record),
            Box::new(JsonNoteStore::new(dir.path().join("database.json"))),
            SessionCache::new(dir.path().join("match.json")),
            PLACEHOLDER,
        )
    }

    fn match_record() -> Value {
        json!({
            "teams": {
                "faction1": { "name": "alpha", "roster": [
                    { "player_id": "a1", "nickname": "Alpha1", "avatar": "" },
                    { "player_id": "a2", "nickname": "Alpha2", "avatar": "https://cdn/a2.png" }
                ]},
                "faction2": { "name": "bravo", "roster": [
                    { "player_id": "b1", "nickname": "Bravo1", "avatar": "https://cdn/b1.png" }
                ]}
            }
        })
    }

    #[tokio::test]
    async fn test_search_full_cycle() {
        let dir = TempDir::new().unwrap();
        let session = session(&dir, match_record());
        session.handle(NoteEvent::save("b1", "good comms")).unwrap();

        let outcome = session
            .search("https://www.faceit.com/en/cs2/room/1-abc")
            .await
            .unwrap();

        assert_eq!(outcome.match_id, "1-abc");
        assert_eq!(outcome.roster.len(), 3);
        assert_eq!(outcome.view.left.rows.len(), 2);
        assert_eq!(outcome.view.left.rows[0].avatar_url, PLACEHOLDER);
        assert_eq!(outcome.view.right.rows[0].note, "good comms");
        assert!(session.cache().path().exists());
    }

    #[tokio::test]
    async fn test_blank_search_fetches_nothing_and_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let session = session(&dir, match_record());

        let err = session.search(" \t ").await.unwrap_err();

        assert!(matches!(err, Error::EmptyMatchUrl));
        assert!(err.is_warning());
        assert_eq!(session.source.calls.load(Ordering::SeqCst), 0);
        assert!(!session.cache().path().exists());
        assert!(!dir.path().join("database.json").exists());
    }

    #[tokio::test]
    async fn test_missing_teams_writes_no_snapshot() {
        let dir = TempDir::new().unwrap();
        let session = session(&dir, json!({ "match_id": "1-abc" }));

        let err = session.search("1-abc").await.unwrap_err();

        assert!(matches!(err, Error::MalformedMatch { .. }));
        assert!(!session.cache().path().exists());
    }

    #[tokio::test]
    async fn test_failed_extraction_keeps_previous_snapshot() {
        let dir = TempDir::new().unwrap();
        let good = session(&dir, match_record());
        good.search("1-abc").await.unwrap();
        let before = std::fs::read_to_string(good.cache().path()).unwrap();

        let bad = session(&dir, json!({ "teams": { "faction1": {} } }));
        assert!(bad.search("1-def").await.is_err());

        let after = std::fs::read_to_string(bad.cache().path()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_handle_trims_note() {
        let dir = TempDir::new().unwrap();
        let session = session(&dir, match_record());

        session.handle(NoteEvent::save("a1", "  lurker\n\n")).unwrap();
        assert_eq!(session.notes().get("a1").unwrap().as_deref(), Some("lurker"));
    }
}
