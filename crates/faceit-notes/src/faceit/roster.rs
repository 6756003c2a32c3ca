//! Roster extraction from Faceit match records.
//!
//! A match record carries a `teams` field holding one entry per faction,
//! each with a `roster` array of players. Extraction is all-or-nothing: if
//! any required field is missing the whole roster is rejected.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// One player in a fetched match's roster.
///
/// Field names on disk follow the snapshot format (`cs2_id`, `nickname`,
/// `avatar`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Opaque platform identifier, the key notes are stored under.
    #[serde(rename = "cs2_id")]
    pub id: String,
    /// Nickname shown in the roster.
    #[serde(rename = "nickname")]
    pub display_name: String,
    /// Avatar URL; empty when the player has none.
    #[serde(rename = "avatar", default)]
    pub avatar_ref: String,
}

impl Participant {
    /// Create a participant.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        avatar_ref: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            avatar_ref: avatar_ref.into(),
        }
    }

    /// Whether the player has an avatar reference.
    #[must_use]
    pub fn has_avatar(&self) -> bool {
        !self.avatar_ref.trim().is_empty()
    }
}

/// One faction of a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    /// Key of the team in the record (`faction1`, `faction2`, or the index).
    pub key: String,
    /// Team name, falling back to the key.
    pub name: String,
    /// Players in record order.
    pub players: Vec<Participant>,
}

/// All teams of a match, in record order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    /// Teams in record order.
    pub teams: Vec<Team>,
}

impl Roster {
    /// Iterate over every participant, team by team.
    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.teams.iter().flat_map(|team| team.players.iter())
    }

    /// Flatten the roster into a participant list.
    #[must_use]
    pub fn to_participants(&self) -> Vec<Participant> {
        self.participants().cloned().collect()
    }

    /// Total number of participants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.teams.iter().map(|team| team.players.len()).sum()
    }

    /// Whether the roster has no participants.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Extract the roster from a raw match record.
///
/// `teams` may be an object (iterated in record order) or an array.
///
/// # Errors
///
/// Returns [`Error::MalformedMatch`] if `teams`, any team's `roster`, or any
/// player's `player_id`/`nickname` is missing or has the wrong type.
pub fn extract_roster(record: &Value) -> Result<Roster> {
    let teams = record
        .get("teams")
        .ok_or_else(|| Error::malformed("missing field `teams`"))?;

    let entries: Vec<(String, &Value)> = match teams {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => return Err(Error::malformed("`teams` is not an object or array")),
    };

    let teams = entries
        .into_iter()
        .map(|(key, team)| extract_team(key, team))
        .collect::<Result<Vec<_>>>()?;

    Ok(Roster { teams })
}

fn extract_team(key: String, team: &Value) -> Result<Team> {
    let roster = team
        .get("roster")
        .ok_or_else(|| Error::malformed(format!("team `{key}` has no `roster`")))?
        .as_array()
        .ok_or_else(|| Error::malformed(format!("team `{key}` roster is not an array")))?;

    let players = roster
        .iter()
        .enumerate()
        .map(|(index, player)| extract_player(&key, index, player))
        .collect::<Result<Vec<_>>>()?;

    let name = team
        .get("name")
        .and_then(Value::as_str)
        .map_or_else(|| key.clone(), str::to_string);

    Ok(Team { key, name, players })
}

fn extract_player(team: &str, index: usize, player: &Value) -> Result<Participant> {
    let field = |name: &str| {
        player.get(name).and_then(Value::as_str).ok_or_else(|| {
            Error::malformed(format!(
                "player {index} of team `{team}` has no string `{name}`"
            ))
        })
    };

    let id = field("player_id")?;
    let nickname = field("nickname")?;
    // Faceit sends "" or omits the field for players without a picture.
    let avatar = player.get("avatar").and_then(Value::as_str).unwrap_or("");

    Ok(Participant::new(id, nickname, avatar))
}
