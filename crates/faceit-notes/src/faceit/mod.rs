//! Talking to Faceit: the match lookup, roster extraction, and avatar
//! downloads.

pub mod avatar;
pub mod client;
pub mod roster;

pub use avatar::{AvatarFetcher, AvatarImage, AvatarSource};
pub use client::{match_id_from_url, FaceitClient, MatchSource};
pub use roster::{extract_roster, Participant, Roster, Team};
