//! `faceit-notes` - look up Faceit match rosters and keep notes on players
//!
//! This library fetches a match record from the Faceit Data API, extracts
//! the players of both teams, and keeps free-text notes per player id in a
//! local store that survives across searches.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod faceit;
pub mod logging;
pub mod session;
pub mod storage;
pub mod view;

pub use config::Config;
pub use error::{Error, Result};
pub use faceit::{FaceitClient, MatchSource, Participant, Roster};
pub use logging::init_logging;
pub use session::{NoteEvent, SearchOutcome, Session};
pub use storage::{NoteStore, Notes, SessionCache};
pub use view::RosterView;
