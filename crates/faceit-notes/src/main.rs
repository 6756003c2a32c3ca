//! `fcnotes` - CLI for faceit-notes
//!
//! Looks up a matchroom, shows both teams with saved notes, and reads or
//! writes notes per player.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use faceit_notes::cli::{Cli, Command, ConfigCommand, NoteCommand, OutputFormat, SearchCommand};
use faceit_notes::faceit::AvatarFetcher;
use faceit_notes::storage::open_note_store;
use faceit_notes::view::fetch_avatars;
use faceit_notes::{init_logging, Config, Error, NoteEvent, RosterView, Session};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<Error>() {
            Some(e) if e.is_warning() => {
                eprintln!("warning: {e}");
                ExitCode::from(2)
            }
            _ => {
                eprintln!("error: {err:#}");
                ExitCode::FAILURE
            }
        },
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Search(search_cmd) => handle_search(&config, &search_cmd).await,
        Command::Note(note_cmd) => handle_note(&config, note_cmd),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

async fn handle_search(config: &Config, cmd: &SearchCommand) -> anyhow::Result<()> {
    // Blank input is a warning before anything else is set up.
    if cmd.url.trim().is_empty() {
        return Err(Error::EmptyMatchUrl.into());
    }

    let session = Session::from_config(config)?;
    let outcome = session.search(&cmd.url).await?;

    match cmd.format {
        OutputFormat::Plain => {
            println!("Match {}", outcome.match_id);
            println!();
            print!("{}", outcome.view.render_plain());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&outcome.view)?);
        }
    }

    if cmd.avatars {
        save_avatars(config, &outcome.view).await?;
    }

    if cmd.annotate {
        annotate(&session, &outcome.view)?;
    }

    Ok(())
}

async fn save_avatars(config: &Config, view: &RosterView) -> anyhow::Result<()> {
    let fetcher = AvatarFetcher::new(&config.api)?;
    let dir = config.avatar_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating avatar directory {}", dir.display()))?;

    let mut saved = 0usize;
    for (player_id, image) in fetch_avatars(view, &fetcher).await {
        let Some(image) = image else { continue };
        let path = dir.join(format!("{}.{}", sanitize(&player_id), image.extension()));
        // A thumbnail that can't be written is skipped like one that can't be fetched.
        match std::fs::write(&path, &image.bytes) {
            Ok(()) => saved += 1,
            Err(e) => debug!("Skipping avatar {}: {e}", path.display()),
        }
    }

    eprintln!("Saved {saved}/{} avatars to {}", view.len(), dir.display());
    Ok(())
}

fn sanitize(player_id: &str) -> String {
    player_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

/// Prompt for a note per row; an empty line keeps the current note.
fn annotate<S: faceit_notes::MatchSource>(
    session: &Session<S>,
    view: &RosterView,
) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut stdout = io::stdout();

    for row in view.rows() {
        print!("note for {} [{}]: ", row.participant.display_name, row.participant.id);
        stdout.flush()?;

        let Some(line) = lines.next().transpose()? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        session.handle(NoteEvent::save(row.participant.id.clone(), line))?;
    }
    Ok(())
}

fn handle_note(config: &Config, cmd: NoteCommand) -> anyhow::Result<()> {
    let store = open_note_store(config);

    match cmd {
        NoteCommand::Set { player_id, text } => {
            store.save(&player_id, text.trim())?;
            eprintln!("Saved note for {player_id}");
        }
        NoteCommand::Get { player_id } => match store.get(&player_id)? {
            Some(note) => println!("{note}"),
            None => eprintln!("No note for {player_id}"),
        },
        NoteCommand::List { json } => {
            let notes = store.load()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&notes)?);
            } else if notes.is_empty() {
                eprintln!("No notes saved yet ({})", config.notes_path().display());
            } else {
                for (player_id, note) in &notes {
                    println!("{player_id}: {note}");
                }
            }
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                let mut shown = config.clone();
                shown.api.api_key = shown.api.api_key.map(|_| "<redacted>".to_string());
                println!("{}", serde_json::to_string_pretty(&shown)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[API]");
                println!("  Base URL:           {}", config.api.base_url);
                println!(
                    "  API key:            {}",
                    if config.api.api_key().is_some() { "set" } else { "not set" }
                );
                println!("  Match timeout (s):  {}", config.api.match_timeout_secs);
                println!("  Avatar timeout (s): {}", config.api.avatar_timeout_secs);
                println!();
                println!("[Storage]");
                println!("  Backend:            {:?}", config.storage.backend);
                println!("  Notes:              {}", config.notes_path().display());
                println!("  Snapshot:           {}", config.snapshot_path().display());
                println!("  Avatars:            {}", config.avatar_dir().display());
                println!();
                println!("[Display]");
                println!("  Placeholder avatar: {}", config.display.placeholder_avatar);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            validate_file(&path)?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}

fn validate_file(path: &Path) -> anyhow::Result<()> {
    Config::load_from(Some(path.to_path_buf()))
        .with_context(|| format!("validating {}", path.display()))?;
    Ok(())
}
