//! Reading song libraries from JSON files.
//!
//! A library file is a JSON array of [`Song`] objects. Only `title` is
//! required; other well-known fields and free-form `tags` are optional.

use crate::item::Song;
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::Path;

/// Load a song library from `path`.
///
/// # Errors
///
/// Fails if the file cannot be read or is not a JSON array of songs.
pub fn load_library(path: &Path) -> Result<Vec<Song>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read library file {}", path.display()))?;
    let songs: Vec<Song> = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid library file {}", path.display()))?;

    log::info!("Loaded {} songs from {}", songs.len(), path.display());
    Ok(songs)
}

/// Resolve queued library indices to songs, keeping queue order.
///
/// # Errors
///
/// Fails on an index outside the library.
pub fn resolve_queue<'a>(songs: &'a [Song], indices: &[usize]) -> Result<Vec<&'a Song>> {
    indices
        .iter()
        .map(|&index| {
            songs.get(index).ok_or_else(|| {
                anyhow!(
                    "Queued index {index} is out of range, the library has {} songs",
                    songs.len()
                )
            })
        })
        .collect()
}

/// `m:ss` rendering of a length in seconds.
#[must_use]
pub fn format_length(seconds: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total = seconds.max(0.0).round() as u64;
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}
