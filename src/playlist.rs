//! Weighted random playlist construction.
//!
//! A [`RatedLibrary`] pairs a song library with a [`CompositeScorer`]. Each
//! step rates every remaining candidate against the playlist built so far,
//! draws one with probability proportional to its score (roulette wheel),
//! and removes it from the pool. The build stops when the pool is empty, the
//! item limit is passed, the target length is reached, or nothing left has a
//! positive score.
//!
//! ## Walk order
//!
//! Candidates are walked in pool order: library order with selected songs
//! removed in place. The same seed and the same library order reproduce the
//! same playlist; reordering the library changes the outcome even with an
//! identical seed.
//!
//! ## Prefix handling
//!
//! Songs already queued (the prefix) are taken out of the pool and their
//! length counts toward the target, but they are not part of the returned
//! playlist. Callers append the result to their queue themselves.

use crate::composite::CompositeScorer;
use crate::diagnostics::Diagnostics;
use crate::error::{PlaylistError, Result};
use crate::item::{self, Item};
use log::{debug, info, trace, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Stopping limits and options for one build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistRequest {
    /// Item limit. Inclusive: the loop keeps going while the playlist holds
    /// at most this many songs, so a limit of `n` can yield `n + 1` songs.
    pub num_items: Option<usize>,
    /// Target length in seconds, prefix included. The song that crosses the
    /// target is kept.
    pub play_length: Option<f64>,
    /// Collect a [`Diagnostics`] record for every selection.
    pub debug: bool,
    /// Attribute holding each song's length in seconds.
    pub duration_attribute: String,
}

impl Default for PlaylistRequest {
    fn default() -> Self {
        Self {
            num_items: None,
            play_length: None,
            debug: false,
            duration_attribute: item::DURATION.to_string(),
        }
    }
}

impl PlaylistRequest {
    #[must_use]
    pub fn with_num_items(mut self, num_items: usize) -> Self {
        self.num_items = Some(num_items);
        self
    }

    #[must_use]
    pub fn with_play_length(mut self, seconds: f64) -> Self {
        self.play_length = Some(seconds);
        self
    }

    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn with_duration_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.duration_attribute = attribute.into();
        self
    }
}

/// Why a build ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Every candidate has been placed.
    PoolExhausted,
    /// The playlist grew past `num_items`.
    ItemLimit,
    /// The cumulative length reached `play_length`.
    LengthReached,
    /// All remaining candidates scored zero.
    NothingAcceptable,
    /// The cancellation flag was raised between two selections.
    Cancelled,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PoolExhausted => "no candidates left",
            Self::ItemLimit => "item limit reached",
            Self::LengthReached => "target length reached",
            Self::NothingAcceptable => "no acceptable candidate",
            Self::Cancelled => "cancelled",
        })
    }
}

/// Output of one build. The prefix is not included in `items`.
#[derive(Debug, Clone)]
pub struct PlaylistResult<'a, I> {
    pub items: Vec<&'a I>,
    /// Cumulative length in seconds, prefix included.
    pub total_length: f64,
    pub stop: StopReason,
    pub diagnostics: Diagnostics,
}

impl<'a, I> PlaylistResult<'a, I> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A song library together with the scorer that ranks it.
pub struct RatedLibrary<'a, I: Item> {
    library: &'a [I],
    scorer: CompositeScorer<I>,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a, I: Item> RatedLibrary<'a, I> {
    #[must_use]
    pub fn new(library: &'a [I], scorer: CompositeScorer<I>) -> Self {
        Self {
            library,
            scorer,
            cancel: None,
        }
    }

    /// Stop between selections once `flag` is set, returning what was built.
    #[must_use]
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    #[must_use]
    pub fn library(&self) -> &'a [I] {
        self.library
    }

    #[must_use]
    pub fn scorer(&self) -> &CompositeScorer<I> {
        &self.scorer
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&'a I> {
        self.library.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'a, I> {
        self.library.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.library.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.library.is_empty()
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Build a playlist using the thread-local random generator.
    pub fn create_playlist_default(
        &self,
        prefix: &[&'a I],
        request: &PlaylistRequest,
    ) -> Result<PlaylistResult<'a, I>> {
        self.create_playlist(prefix, request, &mut rand::thread_rng())
    }

    /// Build a playlist following `prefix`.
    ///
    /// `prefix` holds songs already queued. They are matched against the
    /// library by identity; prefix songs that are not in the library, or that
    /// appear twice, are skipped.
    ///
    /// # Errors
    ///
    /// [`PlaylistError::SelectionFailed`] if the weighted walk cannot find a
    /// winner despite a positive total score. Ordinary stopping conditions
    /// are reported through [`PlaylistResult::stop`] instead.
    pub fn create_playlist<R: Rng + ?Sized>(
        &self,
        prefix: &[&'a I],
        request: &PlaylistRequest,
        rng: &mut R,
    ) -> Result<PlaylistResult<'a, I>> {
        let mut total_length: f64 = prefix
            .iter()
            .map(|song| self.length_of(*song, &request.duration_attribute))
            .sum();

        match request.play_length {
            Some(goal) => info!("Total length in queue: {total_length:.0}s, goal: {goal:.0}s"),
            None => info!("Total length in queue: {total_length:.0}s, no length goal"),
        }

        let mut pool: Vec<&'a I> = self.library.iter().collect();
        for queued in prefix {
            match pool.iter().position(|candidate| std::ptr::eq(*candidate, *queued)) {
                Some(index) => {
                    pool.remove(index);
                }
                None => warn!("Queued song `{}' is not in the candidate pool, ignoring", queued.label()),
            }
        }

        let mut playlist: Vec<&'a I> = Vec::new();
        let mut diagnostics = Diagnostics::new(request.debug);

        let stop = loop {
            if pool.is_empty() {
                break StopReason::PoolExhausted;
            }
            if request.num_items.is_some_and(|limit| playlist.len() > limit) {
                break StopReason::ItemLimit;
            }
            if request.play_length.is_some_and(|goal| total_length >= goal) {
                break StopReason::LengthReached;
            }
            if self.is_cancelled() {
                break StopReason::Cancelled;
            }

            let mut scores = Vec::with_capacity(pool.len());
            let mut total_score = 0.0;
            for candidate in &pool {
                let score = self.scorer.rate_with_breakdown(*candidate, &playlist);
                trace!("`{}' scored {:.4}", candidate.label(), score.score);
                total_score += score.score;
                scores.push(score);
            }

            if total_score.is_nan() || total_score <= 0.0 {
                break StopReason::NothingAcceptable;
            }

            let threshold = rng.gen::<f64>() * total_score;
            let index = select_index(scores.iter().map(|s| s.score), threshold).ok_or(
                PlaylistError::SelectionFailed {
                    threshold,
                    total: total_score,
                    candidates: pool.len(),
                },
            )?;

            let chosen = pool.remove(index);
            let score = scores.swap_remove(index);
            total_length += self.length_of(chosen, &request.duration_attribute);

            if diagnostics.is_enabled() {
                let record_position = playlist.len();
                debug!(
                    "#{record_position} `{}': {:.4} [{}]",
                    chosen.label(),
                    score.score,
                    score
                        .breakdown
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                diagnostics.record(record_position, chosen.label(), score);
            }

            playlist.push(chosen);
        };

        info!(
            "Built playlist of {} songs ({total_length:.0}s including queue): {stop}",
            playlist.len()
        );

        Ok(PlaylistResult {
            items: playlist,
            total_length,
            stop,
            diagnostics,
        })
    }

    fn length_of(&self, song: &I, attribute: &str) -> f64 {
        song.number(attribute).unwrap_or_else(|| {
            trace!("`{}' has no usable `{attribute}', counting 0s", song.label());
            0.0
        })
    }
}

/// Roulette-wheel walk: index of the first positive score at which the
/// running sum reaches `threshold`.
///
/// Zero scores never win, even when `threshold` is exactly 0.
fn select_index(scores: impl IntoIterator<Item = f64>, threshold: f64) -> Option<usize> {
    let mut running = 0.0;
    for (index, score) in scores.into_iter().enumerate() {
        running += score;
        if score > 0.0 && running >= threshold {
            return Some(index);
        }
    }
    None
}
