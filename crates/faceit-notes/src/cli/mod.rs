//! Command-line interface for faceit-notes.
//!
//! This module provides the CLI structure for the `fcnotes` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, NoteCommand, OutputFormat, SearchCommand};

/// fcnotes - Look up a Faceit match and keep notes on the players
///
/// Paste a matchroom link to see both teams with any notes you saved on
/// those players before. Notes are stored locally, keyed by player id.
#[derive(Debug, Parser)]
#[command(name = "fcnotes")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up a matchroom and show the roster with notes
    Search(SearchCommand),

    /// Read or write player notes
    #[command(subcommand)]
    Note(NoteCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Verbosity;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "fcnotes");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(parse(&["fcnotes", "-q", "note", "list"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["fcnotes", "note", "list"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["fcnotes", "-v", "note", "list"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["fcnotes", "-vv", "note", "list"]).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_search() {
        let cli = parse(&["fcnotes", "search", "https://www.faceit.com/en/cs2/room/1-abc", "--avatars"]);
        match cli.command {
            Command::Search(cmd) => {
                assert_eq!(cmd.url, "https://www.faceit.com/en/cs2/room/1-abc");
                assert!(cmd.avatars);
                assert!(!cmd.annotate);
                assert_eq!(cmd.format, OutputFormat::Plain);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_search_json() {
        let cli = parse(&["fcnotes", "search", "1-abc", "--format", "json"]);
        assert!(matches!(
            cli.command,
            Command::Search(SearchCommand { format: OutputFormat::Json, .. })
        ));
    }

    #[test]
    fn test_parse_search_accepts_blank_url() {
        // Blank input is rejected with a warning later, not by clap.
        let cli = parse(&["fcnotes", "search", "  "]);
        assert!(matches!(cli.command, Command::Search(_)));
    }

    #[test]
    fn test_parse_note_set() {
        let cli = parse(&["fcnotes", "note", "set", "p1", "plays A site"]);
        match cli.command {
            Command::Note(NoteCommand::Set { player_id, text }) => {
                assert_eq!(player_id, "p1");
                assert_eq!(text, "plays A site");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["fcnotes", "-c", "/custom/config.toml", "config", "show"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        assert!(matches!(cli.command, Command::Config(ConfigCommand::Show { json: false })));
    }

    #[test]
    fn test_search_requires_url() {
        assert!(Cli::try_parse_from(["fcnotes", "search"]).is_err());
    }
}
