//! Song scorers for weighted playlist construction.
//!
//! A scorer maps a candidate and the playlist built so far to a number.
//! Scorers are total: a missing or malformed attribute degrades to a fixed
//! fallback score instead of failing the build.

use crate::item::{self, AttributeValue, Item};
use log::trace;
use serde::{Deserialize, Serialize};

/// Rates a candidate against the playlist committed so far.
///
/// `context` is the ordered output playlist at the time of the call, oldest
/// first. Implementations must not keep state between calls.
pub trait Scorer<I: Item + ?Sized> {
    fn rate(&self, item: &I, context: &[&I]) -> f64;

    /// Identity used in score breakdowns and diagnostics tags.
    fn name(&self) -> &str;
}

/// Favors songs whose tempo is at or below a target.
///
/// ```text
/// rate = max(0, 1 - (bpm - target) / (2 * spread))
/// ```
///
/// There is no upper clamp, so songs well below the target rate above 1.
#[derive(Debug, Clone, PartialEq)]
pub struct TempoScorer {
    pub target: f64,
    pub spread: f64,
    pub attribute: String,
}

impl TempoScorer {
    #[must_use]
    pub fn new(target: f64, spread: f64) -> Self {
        Self {
            target,
            spread,
            attribute: item::TEMPO.to_string(),
        }
    }
}

impl Default for TempoScorer {
    fn default() -> Self {
        Self::new(80.0, 20.0)
    }
}

impl<I: Item + ?Sized> Scorer<I> for TempoScorer {
    fn rate(&self, item: &I, _context: &[&I]) -> f64 {
        let Some(bpm) = item.number(&self.attribute) else {
            return 0.0;
        };

        let raw = 1.0 - (bpm - self.target) / (2.0 * self.spread);
        if raw.is_nan() {
            return 0.0;
        }
        raw.max(0.0)
    }

    fn name(&self) -> &str {
        "tempo"
    }
}

/// Passes the host's own rating through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceScorer {
    pub attribute: String,
}

impl Default for PreferenceScorer {
    fn default() -> Self {
        Self {
            attribute: item::RATING.to_string(),
        }
    }
}

impl<I: Item + ?Sized> Scorer<I> for PreferenceScorer {
    fn rate(&self, item: &I, _context: &[&I]) -> f64 {
        item.number(&self.attribute).unwrap_or(0.0)
    }

    fn name(&self) -> &str {
        "preference"
    }
}

/// How often one attribute may repeat back to back, and what it is worth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepetitionRule {
    pub attribute: String,
    /// Consecutive repeats tolerated: 0, 1 or 2.
    pub allowed: u8,
    pub weight: f64,
}

impl RepetitionRule {
    #[must_use]
    pub fn new(attribute: impl Into<String>, allowed: u8, weight: f64) -> Self {
        Self {
            attribute: attribute.into(),
            allowed,
            weight,
        }
    }
}

/// Penalizes runs of songs sharing an attribute (genre, artist, ...).
///
/// For each rule the candidate is compared with the last two playlist
/// entries. Exceeding the allowed repeat count vetoes the candidate (score 0);
/// hitting it exactly earns the full rule weight; staying under earns half.
/// With fewer than two songs of history the scorer returns a neutral 1.
#[derive(Debug, Clone, PartialEq)]
pub struct RepetitionScorer {
    pub rules: Vec<RepetitionRule>,
}

impl RepetitionScorer {
    #[must_use]
    pub fn new(rules: Vec<RepetitionRule>) -> Self {
        Self { rules }
    }
}

impl Default for RepetitionScorer {
    fn default() -> Self {
        Self::new(vec![
            RepetitionRule::new(item::GENRE, 1, 1.0),
            RepetitionRule::new(item::ARTIST, 0, 0.0),
        ])
    }
}

/// Number of back-to-back repeats `this` would create.
fn count_repetitions(
    this: Option<&AttributeValue>,
    previous: Option<&AttributeValue>,
    prepre: Option<&AttributeValue>,
) -> u8 {
    if this != previous {
        0
    } else if previous == prepre {
        2
    } else {
        1
    }
}

impl<I: Item + ?Sized> Scorer<I> for RepetitionScorer {
    fn rate(&self, item: &I, context: &[&I]) -> f64 {
        let [.., prelast, last] = context else {
            return 1.0;
        };

        let mut total = 0.0;
        for rule in &self.rules {
            let this = item.attribute(&rule.attribute);
            let previous = last.attribute(&rule.attribute);
            let prepre = prelast.attribute(&rule.attribute);

            let repetitions = count_repetitions(this.as_ref(), previous.as_ref(), prepre.as_ref());

            match repetitions.cmp(&rule.allowed) {
                std::cmp::Ordering::Greater => {
                    trace!(
                        "`{}' repeats {} {repetitions} times (allowed {}), vetoed",
                        item.label(),
                        rule.attribute,
                        rule.allowed
                    );
                    return 0.0;
                }
                std::cmp::Ordering::Equal => total += rule.weight,
                std::cmp::Ordering::Less => total += rule.weight / 2.0,
            }
        }

        total
    }

    fn name(&self) -> &str {
        "repetition"
    }
}
