//! Presentation model for a looked-up roster.
//!
//! The roster is laid out in two columns. The first team goes left and every
//! other team goes right, so uneven teams stay with their own side. Each row
//! carries the note to pre-fill and the avatar URL to show.

use std::fmt::Write as _;

use serde::Serialize;

use crate::faceit::{AvatarImage, AvatarSource, Participant, Roster};
use crate::storage::Notes;

/// One player row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    /// The player.
    #[serde(flatten)]
    pub participant: Participant,
    /// Saved note, empty if none.
    pub note: String,
    /// Avatar to display; the placeholder when the player has none.
    pub avatar_url: String,
}

/// One side of the roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Column {
    /// Team name(s) shown above the column.
    pub title: String,
    /// Rows in roster order.
    pub rows: Vec<Row>,
}

/// The two-column roster view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RosterView {
    /// First team.
    pub left: Column,
    /// Remaining teams.
    pub right: Column,
}

/// The avatar URL to render for a participant.
///
/// Players without an avatar get `placeholder`; an empty URL is never
/// returned (as long as the placeholder isn't empty).
#[must_use]
pub fn resolve_avatar<'a>(participant: &'a Participant, placeholder: &'a str) -> &'a str {
    if participant.has_avatar() {
        participant.avatar_ref.trim()
    } else {
        placeholder
    }
}

impl Row {
    fn new(participant: &Participant, notes: &Notes, placeholder: &str) -> Self {
        Self {
            participant: participant.clone(),
            note: notes.get(&participant.id).cloned().unwrap_or_default(),
            avatar_url: resolve_avatar(participant, placeholder).to_string(),
        }
    }
}

impl RosterView {
    /// Lay out `roster`, pre-filling notes from `notes`.
    #[must_use]
    pub fn build(roster: &Roster, notes: &Notes, placeholder: &str) -> Self {
        let mut teams = roster.teams.iter();
        let mut view = Self::default();

        if let Some(first) = teams.next() {
            view.left.title.clone_from(&first.name);
            view.left.rows = first
                .players
                .iter()
                .map(|p| Row::new(p, notes, placeholder))
                .collect();
        }

        let mut titles = Vec::new();
        for team in teams {
            titles.push(team.name.as_str());
            view.right
                .rows
                .extend(team.players.iter().map(|p| Row::new(p, notes, placeholder)));
        }
        view.right.title = titles.join(" / ");

        view
    }

    /// All rows, left column first.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.left.rows.iter().chain(self.right.rows.iter())
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.left.rows.len() + self.right.rows.len()
    }

    /// Whether there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Plain-text rendering for the terminal.
    #[must_use]
    pub fn render_plain(&self) -> String {
        let mut out = String::new();
        for (side, column) in [("left", &self.left), ("right", &self.right)] {
            if column.rows.is_empty() && column.title.is_empty() {
                continue;
            }
            let title = if column.title.is_empty() {
                side
            } else {
                column.title.as_str()
            };
            let _ = writeln!(out, "== {title} ==");
            for row in &column.rows {
                let _ = writeln!(out, "  {}  [{}]", row.participant.display_name, row.participant.id);
                let _ = writeln!(out, "    avatar: {}", row.avatar_url);
                if row.note.is_empty() {
                    let _ = writeln!(out, "    note:   -");
                } else {
                    for (i, line) in row.note.lines().enumerate() {
                        let label = if i == 0 { "note:  " } else { "       " };
                        let _ = writeln!(out, "    {label} {line}");
                    }
                }
            }
            out.push('\n');
        }
        out
    }
}

/// Fetch every row's avatar, one at a time, in row order.
///
/// Returns the player id with whatever was fetched; failures are `None`.
pub async fn fetch_avatars(
    view: &RosterView,
    source: &dyn AvatarSource,
) -> Vec<(String, Option<AvatarImage>)> {
    let mut images = Vec::with_capacity(view.len());
    for row in view.rows() {
        let image = source.fetch_avatar(&row.avatar_url).await;
        images.push((row.participant.id.clone(), image));
    }
    images
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faceit::Team;
    use async_trait::async_trait;
    use std::sync::Mutex;

    const PLACEHOLDER: &str = "https://placeholder/black.jpg";

    fn team(name: &str, ids: &[&str]) -> Team {
        Team {
            key: name.to_string(),
            name: name.to_string(),
            players: ids
                .iter()
                .map(|id| Participant::new(*id, id.to_uppercase(), format!("https://cdn/{id}.png")))
                .collect(),
        }
    }

    #[test]
    fn test_resolve_avatar_uses_placeholder_for_empty() {
        let p = Participant::new("x", "X", "");
        assert_eq!(resolve_avatar(&p, PLACEHOLDER), PLACEHOLDER);

        let blank = Participant::new("y", "Y", "   ");
        assert_eq!(resolve_avatar(&blank, PLACEHOLDER), PLACEHOLDER);

        let with = Participant::new("z", "Z", "https://cdn/z.png");
        assert_eq!(resolve_avatar(&with, PLACEHOLDER), "https://cdn/z.png");
    }

    #[test]
    fn test_build_splits_by_team_not_midpoint() {
        let roster = Roster {
            teams: vec![team("alpha", &["a1", "a2"]), team("bravo", &["b1", "b2", "b3", "b4"])],
        };

        let view = RosterView::build(&roster, &Notes::new(), PLACEHOLDER);
        assert_eq!(view.left.title, "alpha");
        assert_eq!(view.left.rows.len(), 2);
        assert_eq!(view.right.title, "bravo");
        assert_eq!(view.right.rows.len(), 4);
    }

    #[test]
    fn test_build_prefills_notes() {
        let roster = Roster {
            teams: vec![team("alpha", &["a1"]), team("bravo", &["b1"])],
        };
        let mut notes = Notes::new();
        notes.insert("b1".to_string(), "rage quits".to_string());

        let view = RosterView::build(&roster, &notes, PLACEHOLDER);
        assert_eq!(view.left.rows[0].note, "");
        assert_eq!(view.right.rows[0].note, "rage quits");
    }

    #[test]
    fn test_build_more_than_two_teams_go_right() {
        let roster = Roster {
            teams: vec![team("a", &["a1"]), team("b", &["b1"]), team("c", &["c1"])],
        };
        let view = RosterView::build(&roster, &Notes::new(), PLACEHOLDER);
        assert_eq!(view.right.title, "b / c");
        let ids: Vec<_> = view.rows().map(|r| r.participant.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "b1", "c1"]);
    }

    #[test]
    fn test_build_empty_roster() {
        let view = RosterView::build(&Roster::default(), &Notes::new(), PLACEHOLDER);
        assert!(view.is_empty());
        assert_eq!(view.render_plain(), "");
    }

    #[test]
    fn test_render_plain_shows_names_notes_and_avatars() {
        let mut alpha = team("alpha", &["a1"]);
        alpha.players[0].avatar_ref = String::new();
        let roster = Roster {
            teams: vec![alpha, team("bravo", &["b1"])],
        };
        let mut notes = Notes::new();
        notes.insert("a1".to_string(), "line one\nline two".to_string());

        let text = RosterView::build(&roster, &notes, PLACEHOLDER).render_plain();
        assert!(text.contains("== alpha =="));
        assert!(text.contains("A1  [a1]"));
        assert!(text.contains(PLACEHOLDER));
        assert!(text.contains("line two"));
        assert!(text.contains("note:   -"));
    }

    #[derive(Default)]
    struct RecordingSource {
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl AvatarSource for RecordingSource {
        async fn fetch_avatar(&self, url: &str) -> Option<AvatarImage> {
            self.requested.lock().unwrap().push(url.to_string());
            if url.contains("broken") {
                None
            } else {
                Some(AvatarImage {
                    bytes: vec![1, 2, 3],
                    content_type: "image/png".to_string(),
                })
            }
        }
    }

    #[tokio::test]
    async fn test_fetch_avatars_never_requests_empty_url() {
        let roster = Roster {
            teams: vec![Team {
                key: "f1".to_string(),
                name: "f1".to_string(),
                players: vec![
                    Participant::new("a", "A", ""),
                    Participant::new("b", "B", "https://cdn/broken.png"),
                    Participant::new("c", "C", "https://cdn/c.png"),
                ],
            }],
        };
        let view = RosterView::build(&roster, &Notes::new(), PLACEHOLDER);
        let source = RecordingSource::default();

        let images = fetch_avatars(&view, &source).await;

        let requested = source.requested.lock().unwrap().clone();
        assert_eq!(requested[0], PLACEHOLDER);
        assert!(requested.iter().all(|u| !u.is_empty()));
        assert_eq!(images.len(), 3);
        assert!(images[1].1.is_none());
        assert!(images[2].1.is_some());
    }

    #[test]
    fn test_row_serializes_flat() {
        let roster = Roster {
            teams: vec![team("alpha", &["a1"])],
        };
        let view = RosterView::build(&roster, &Notes::new(), PLACEHOLDER);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["left"]["rows"][0]["cs2_id"], "a1");
        assert_eq!(json["left"]["rows"][0]["note"], "");
    }
}
