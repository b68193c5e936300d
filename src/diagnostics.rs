//! Per-selection score records for inspecting a playlist build.
//!
//! Collected only when a build asks for it; recording never influences which
//! song gets picked.

use crate::composite::{Breakdown, CompositeScore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Why the chosen song scored what it did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionRecord {
    /// Zero-based position in the returned playlist.
    pub position: usize,
    pub title: String,
    pub score: f64,
    pub breakdown: Breakdown,
}

impl SelectionRecord {
    /// Flat numeric tags in the form hosts store them on the song:
    /// `score_<scorer>` for every contribution plus `score_total`.
    #[must_use]
    pub fn score_tags(&self) -> BTreeMap<String, f64> {
        let mut tags: BTreeMap<String, f64> = self
            .breakdown
            .iter()
            .map(|c| (format!("score_{}", c.scorer.to_lowercase()), c.value))
            .collect();
        tags.insert("score_total".to_string(), self.score);
        tags
    }
}

impl fmt::Display for SelectionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.4}", self.title, self.score)?;
        for contribution in &self.breakdown {
            write!(f, "\n    {contribution}")?;
        }
        Ok(())
    }
}

/// Ordered selection records of one build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    enabled: bool,
    records: Vec<SelectionRecord>,
}

impl Diagnostics {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            records: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record the winning score of one step. A no-op when disabled.
    pub fn record(&mut self, position: usize, title: String, score: CompositeScore) {
        if !self.enabled {
            return;
        }
        self.records.push(SelectionRecord {
            position,
            title,
            score: score.score,
            breakdown: score.breakdown,
        });
    }

    #[must_use]
    pub fn records(&self) -> &[SelectionRecord] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<SelectionRecord> {
        self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
