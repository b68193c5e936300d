//! # Cadence - Weighted Playlist Builder
//!
//! Builds playlists from a JSON song library by drawing songs in proportion
//! to their score: user rating, closeness to a target tempo, and a penalty
//! for running the same genre or artist back to back.
//!
//! ## Usage
//!
//! ```bash
//! # Show the library with indices
//! cadence list library.json
//!
//! # Five hours (the default target) after two queued songs
//! cadence build library.json --queued 4 --queued 9
//!
//! # Twenty-odd songs, reproducible, with score breakdowns
//! cadence build library.json -n 20 --no-length-limit --seed 7 --debug
//! ```

use anyhow::Result;
use cadence::config::PlaylistConfig;
use cadence::diagnostics::SelectionRecord;
use cadence::item::{self, Item, Song};
use cadence::library::{format_length, load_library, resolve_queue};
use cadence::playlist::{PlaylistResult, RatedLibrary, StopReason};
use cadence::{cli, completion};
use clap::{CommandFactory, Parser};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// JSON shape of `cadence build --json`.
#[derive(Serialize)]
struct BuildReport<'a> {
    queued: Vec<&'a Song>,
    playlist: Vec<&'a Song>,
    total_length: f64,
    stop: StopReason,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    diagnostics: Vec<SelectionRecord>,
}

struct BuildOptions {
    library: PathBuf,
    config: Option<PathBuf>,
    num_items: Option<usize>,
    play_length: Option<f64>,
    no_length_limit: bool,
    queued: Vec<usize>,
    seed: Option<u64>,
    debug: bool,
    json: bool,
}

fn build(options: BuildOptions) -> Result<()> {
    let config = PlaylistConfig::load_or_default(options.config.as_deref())?;
    let songs = load_library(&options.library)?;
    let queue = resolve_queue(&songs, &options.queued)?;

    let mut request = config.request().with_debug(options.debug);
    if let Some(num_items) = options.num_items {
        request.num_items = Some(num_items);
    }
    if options.no_length_limit {
        request.play_length = None;
    } else if let Some(play_length) = options.play_length {
        request.play_length = Some(play_length);
    }
    debug!("Build request: {request:?}");

    let rated = RatedLibrary::new(&songs, config.build_scorer()?);
    let result = match options.seed {
        Some(seed) => {
            info!("Using random seed {seed}");
            rated.create_playlist(&queue, &request, &mut StdRng::seed_from_u64(seed))?
        }
        None => rated.create_playlist_default(&queue, &request)?,
    };

    if options.json {
        print_json(queue, result)
    } else {
        print_text(&queue, &result);
        Ok(())
    }
}

fn print_json(queued: Vec<&Song>, result: PlaylistResult<'_, Song>) -> Result<()> {
    let report = BuildReport {
        queued,
        playlist: result.items,
        total_length: result.total_length,
        stop: result.stop,
        diagnostics: result.diagnostics.into_records(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_text(queued: &[&Song], result: &PlaylistResult<'_, Song>) {
    if !queued.is_empty() {
        println!("Queued:");
        for song in queued {
            println!("   {} ({})", song.label(), format_length(song.length));
        }
    }

    println!("Playlist:");
    for (position, song) in result.items.iter().enumerate() {
        println!(
            "{:>3}. {} ({})",
            position + 1,
            song.label(),
            format_length(song.length)
        );
    }
    println!(
        "{} songs, {} total with queue ({})",
        result.len(),
        format_length(result.total_length),
        result.stop
    );

    for record in result.diagnostics.records() {
        println!("{record}");
    }
}

fn list(path: &Path) -> Result<()> {
    let songs = load_library(path)?;
    for (index, song) in songs.iter().enumerate() {
        let bpm = song
            .number(item::TEMPO)
            .map_or_else(|| "-".to_string(), |bpm| format!("{bpm:.0}"));
        let rating = song
            .number(item::RATING)
            .map_or_else(|| "-".to_string(), |rating| format!("{rating:.2}"));
        println!(
            "{index:>5}  {}  [{} bpm, rating {}, {}]",
            song.label(),
            bpm,
            rating,
            format_length(song.length)
        );
    }
    Ok(())
}

/// Main entry point for the Cadence application.
///
/// Initializes logging, parses command-line arguments, and routes commands.
///
/// # Logging
///
/// Controlled via `RUST_LOG`:
/// - `RUST_LOG=debug cadence build library.json` - Selection breakdowns
/// - `RUST_LOG=cadence::scorer=trace cadence build library.json` - Veto decisions
fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();

    match args.command {
        cli::Command::Build {
            library,
            config,
            num_items,
            play_length,
            no_length_limit,
            queued,
            seed,
            debug,
            json,
        } => build(BuildOptions {
            library,
            config,
            num_items,
            play_length,
            no_length_limit,
            queued,
            seed,
            debug,
            json,
        })?,
        cli::Command::List { library } => list(&library)?,
        cli::Command::DefaultConfig => {
            println!("{}", serde_json::to_string_pretty(&PlaylistConfig::default())?);
        }
        cli::Command::Completion { shell } => {
            let mut cmd = cli::Args::command();
            completion::generate_completions(completion::shell_to_completion_shell(shell), &mut cmd);
        }
    }

    Ok(())
}
