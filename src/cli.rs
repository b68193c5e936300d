//! # Command-Line Interface Module
//!
//! Clap definitions for the `cadence` binary. The binary is a thin host around
//! the library: it reads a JSON song library, builds a weighted playlist and
//! prints it.
//!
//! ## Commands
//!
//! - `build`: Build a playlist from a library file
//! - `list`: Show the library with the indices `--queued` refers to
//! - `default-config`: Print the default configuration as JSON
//! - `completion`: Generate shell completions
//!
//! ## Examples
//!
//! ```bash
//! cadence list ~/music/library.json
//! cadence build ~/music/library.json --queued 3 --queued 17 --play-length 3600
//! cadence build ~/music/library.json -n 20 --seed 42 --debug
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Main application arguments structure.
#[derive(Parser, Debug)]
#[command(name = "cadence")]
#[command(about = "Cadence: weighted, tempo-aware playlists built from rated songs")]
#[command(version)]
pub struct Args {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Enumeration of all available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a weighted playlist from a song library
    ///
    /// Songs are drawn one at a time with probability proportional to their
    /// score against the playlist so far. Queued songs are excluded from the
    /// draw but their length counts toward the target.
    Build {
        /// JSON file holding an array of songs
        #[arg(value_hint = clap::ValueHint::FilePath)]
        library: PathBuf,

        /// Scorer configuration file (defaults to the platform config file)
        #[arg(short, long, env = "CADENCE_CONFIG", value_hint = clap::ValueHint::FilePath)]
        config: Option<PathBuf>,

        /// Stop once the playlist holds more than this many songs
        ///
        /// The limit is inclusive: `-n 10` can produce 11 songs.
        #[arg(short = 'n', long)]
        num_items: Option<usize>,

        /// Target length in seconds, queued songs included
        #[arg(short = 'l', long, conflicts_with = "no_length_limit")]
        play_length: Option<f64>,

        /// Ignore any configured target length
        #[arg(long)]
        no_length_limit: bool,

        /// Library index of a song already queued (repeatable, in queue order)
        #[arg(short, long = "queued", value_name = "INDEX")]
        queued: Vec<usize>,

        /// Seed the random generator for a reproducible playlist
        #[arg(long)]
        seed: Option<u64>,

        /// Print the score breakdown of every selected song
        #[arg(short, long)]
        debug: bool,

        /// Emit the playlist as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the songs of a library with their indices
    List {
        /// JSON file holding an array of songs
        #[arg(value_hint = clap::ValueHint::FilePath)]
        library: PathBuf,
    },

    /// Print the default scorer configuration as JSON
    ///
    /// Usage: cadence default-config > ~/.config/cadence/config.json
    DefaultConfig,

    /// Generate shell completions
    ///
    /// Usage: cadence completion bash > ~/.local/share/bash-completion/completions/cadence
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_build_arguments_parse() {
        let args = Args::try_parse_from([
            "cadence", "build", "songs.json", "-n", "12", "--queued", "3", "-q", "7", "--seed", "42",
            "--debug",
        ])
        .unwrap();

        match args.command {
            Command::Build {
                library,
                num_items,
                queued,
                seed,
                debug,
                json,
                play_length,
                ..
            } => {
                assert_eq!(library, PathBuf::from("songs.json"));
                assert_eq!(num_items, Some(12));
                assert_eq!(queued, vec![3, 7]);
                assert_eq!(seed, Some(42));
                assert!(debug);
                assert!(!json);
                assert_eq!(play_length, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_length_flags_conflict() {
        let result = Args::try_parse_from([
            "cadence",
            "build",
            "songs.json",
            "--play-length",
            "600",
            "--no-length-limit",
        ]);
        assert!(result.is_err());
    }
}
