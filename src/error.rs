//! Error types for playlist construction.
//!
//! Running out of candidates, reaching a limit, or finding nothing worth
//! playing are ordinary stopping conditions and are reported through
//! [`crate::playlist::StopReason`]. Only broken internal invariants end up here.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlaylistError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaylistError {
    /// The weighted walk finished without reaching the drawn threshold even
    /// though the candidates had a positive total score.
    #[error(
        "weighted selection found no winner: threshold {threshold} of total {total} over {candidates} candidates"
    )]
    SelectionFailed {
        threshold: f64,
        total: f64,
        candidates: usize,
    },
}
