//! Weighted, tempo-aware playlist construction.
//!
//! Core modules:
//! - [`item`] - The attribute capability songs are read through
//! - [`scorer`] - Tempo, preference and repetition scorers
//! - [`composite`] - Weighted additive/multiplicative score composition
//! - [`playlist`] - Roulette-wheel playlist construction
//! - [`diagnostics`] - Per-selection score records
//!
//! ### Supporting Modules
//!
//! - [`config`] - Scorer configuration and platform config location
//! - [`library`] - JSON song library loading
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//! - [`error`] - Library error type
//!
//! ## Quick Start Example
//!
//! ```
//! use cadence::composite::CompositeScorer;
//! use cadence::item::Song;
//! use cadence::playlist::{PlaylistRequest, RatedLibrary};
//! use cadence::scorer::{PreferenceScorer, RepetitionScorer, TempoScorer};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let songs = vec![
//!     Song::new("Blue in Green", 337.0).with_genre("Jazz").with_bpm(62.0).with_rating(0.9),
//!     Song::new("So What", 562.0).with_genre("Jazz").with_bpm(136.0).with_rating(0.8),
//!     Song::new("Harvest Moon", 303.0).with_genre("Folk").with_bpm(70.0).with_rating(0.7),
//! ];
//!
//! let scorer = CompositeScorer::new()
//!     .with_scorer(100.0, PreferenceScorer::default())
//!     .with_scorer(30.0, TempoScorer::new(80.0, 20.0))
//!     .with_modifier(3.0, RepetitionScorer::default());
//!
//! let rated = RatedLibrary::new(&songs, scorer);
//! let queue = [&songs[0]];
//! let request = PlaylistRequest::default().with_play_length(15.0 * 60.0);
//!
//! let result = rated.create_playlist(&queue, &request, &mut StdRng::seed_from_u64(42))?;
//! assert!(result.items.iter().all(|song| !std::ptr::eq(*song, &songs[0])));
//! # Ok::<(), cadence::error::PlaylistError>(())
//! ```
//!
//! ## Algorithm Details
//!
//! ### Scoring
//! - Base scorers are weighted and summed; the sum is clamped at zero
//! - Modifiers are weighted and multiplied in, in registration order
//! - A repetition modifier can veto a song outright by scoring 0
//!
//! ### Selection
//! - Every remaining song is rated against the playlist built so far
//! - One song is drawn with probability proportional to its score
//! - The build stops when the pool is empty, the item limit is passed,
//!   the target length is reached, or no song scores above zero
//!
//! ## Error Handling
//!
//! Scoring never fails: missing attributes fall back to fixed scores.
//! [`playlist::RatedLibrary::create_playlist`] returns
//! [`error::PlaylistError`] only for a broken selection invariant.
//! Configuration and file loading return `anyhow::Result`.
//!
//! ## Logging
//!
//! Uses the `log` facade; the binary installs `env_logger`:
//! - `RUST_LOG=info cadence build library.json` - Build summary
//! - `RUST_LOG=cadence::playlist=trace cadence build library.json` - Every candidate score

pub mod cli;
pub mod completion;
pub mod composite;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod item;
pub mod library;
pub mod playlist;
pub mod scorer;
