//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Search command arguments.
#[derive(Debug, Args)]
pub struct SearchCommand {
    /// Faceit matchroom link (or bare match id)
    pub url: String,

    /// Download avatar thumbnails into the data directory
    #[arg(long)]
    pub avatars: bool,

    /// Prompt for a note on each player after showing the roster
    #[arg(short, long)]
    pub annotate: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Note commands.
#[derive(Debug, Subcommand)]
pub enum NoteCommand {
    /// Save a note for a player, replacing any existing one
    Set {
        /// Player id (as shown in brackets by `search`)
        player_id: String,
        /// Note text
        text: String,
    },

    /// Show one player's note
    Get {
        /// Player id
        player_id: String,
    },

    /// List every saved note
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_search_command_debug() {
        let cmd = SearchCommand {
            url: "https://www.faceit.com/en/cs2/room/1-abc".to_string(),
            avatars: false,
            annotate: true,
            format: OutputFormat::Json,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("1-abc"));
        assert!(debug_str.contains("annotate: true"));
    }

    #[test]
    fn test_note_command_debug() {
        let cmd = NoteCommand::Set {
            player_id: "p1".to_string(),
            text: "hello".to_string(),
        };
        assert!(format!("{cmd:?}").contains("Set"));
    }
}
