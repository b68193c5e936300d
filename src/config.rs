//! # Configuration Module
//!
//! Scorer wiring and default build limits, read from a JSON document.
//!
//! ## Location
//!
//! Without an explicit path Cadence looks in the platform config directory:
//! - Linux: `~/.config/cadence/config.json`
//! - macOS: `~/Library/Application Support/cadence/config.json`
//! - Windows: `%APPDATA%\cadence\config.json`
//!
//! A missing file means defaults. The defaults rate songs by user rating
//! (weight 100) and tempo around 80 BPM (weight 30), gated by a repetition
//! modifier (weight 3), and aim for five hours of music.
//!
//! ## Format
//!
//! ```json
//! {
//!   "base": [
//!     { "weight": 100.0, "kind": "preference", "attribute": "rating" },
//!     { "weight": 30.0, "kind": "tempo", "target": 80.0, "spread": 20.0 }
//!   ],
//!   "modifiers": [
//!     { "weight": 3.0, "kind": "repetition",
//!       "rules": [{ "attribute": "genre", "allowed": 1, "weight": 1.0 }] }
//!   ],
//!   "play_length": 18000.0
//! }
//! ```

use crate::composite::{CompositeScorer, WeightedScorer};
use crate::item::{self, Item};
use crate::playlist::PlaylistRequest;
use crate::scorer::{PreferenceScorer, RepetitionRule, RepetitionScorer, Scorer, TempoScorer};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Five hours, in seconds.
pub const DEFAULT_PLAY_LENGTH: f64 = 5.0 * 60.0 * 60.0;

fn default_tempo_attribute() -> String {
    item::TEMPO.to_string()
}

fn default_rating_attribute() -> String {
    item::RATING.to_string()
}

fn default_duration_attribute() -> String {
    item::DURATION.to_string()
}

/// One scorer kind and its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScorerConfig {
    Tempo {
        target: f64,
        spread: f64,
        #[serde(default = "default_tempo_attribute")]
        attribute: String,
    },
    Preference {
        #[serde(default = "default_rating_attribute")]
        attribute: String,
    },
    Repetition {
        rules: Vec<RepetitionRule>,
    },
}

impl ScorerConfig {
    fn validate(&self) -> Result<()> {
        match self {
            Self::Tempo { target, spread, .. } => {
                if !target.is_finite() {
                    bail!("tempo target must be a finite number, got {target}");
                }
                if !spread.is_finite() || *spread <= 0.0 {
                    bail!("tempo spread must be a positive number, got {spread}");
                }
            }
            Self::Preference { .. } => {}
            Self::Repetition { rules } => {
                for rule in rules {
                    if rule.allowed > 2 {
                        bail!(
                            "repetition rule for `{}' allows {} repeats, at most 2 are supported",
                            rule.attribute,
                            rule.allowed
                        );
                    }
                    if !rule.weight.is_finite() {
                        bail!("repetition rule for `{}' has a non-finite weight", rule.attribute);
                    }
                }
            }
        }
        Ok(())
    }

    /// Instantiate the scorer this entry describes.
    #[must_use]
    pub fn build<I: Item + ?Sized>(&self) -> Box<dyn Scorer<I>> {
        match self {
            Self::Tempo {
                target,
                spread,
                attribute,
            } => Box::new(TempoScorer {
                target: *target,
                spread: *spread,
                attribute: attribute.clone(),
            }),
            Self::Preference { attribute } => Box::new(PreferenceScorer {
                attribute: attribute.clone(),
            }),
            Self::Repetition { rules } => Box::new(RepetitionScorer::new(rules.clone())),
        }
    }
}

/// A weight plus the scorer it applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedScorerConfig {
    pub weight: f64,
    #[serde(flatten)]
    pub scorer: ScorerConfig,
}

impl WeightedScorerConfig {
    #[must_use]
    pub fn new(weight: f64, scorer: ScorerConfig) -> Self {
        Self { weight, scorer }
    }
}

/// Full build configuration: scorer wiring plus default limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistConfig {
    pub base: Vec<WeightedScorerConfig>,
    pub modifiers: Vec<WeightedScorerConfig>,
    pub normalize_weights: bool,
    #[serde(default = "default_duration_attribute")]
    pub duration_attribute: String,
    pub num_items: Option<usize>,
    /// Seconds.
    pub play_length: Option<f64>,
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        Self {
            base: vec![
                WeightedScorerConfig::new(
                    100.0,
                    ScorerConfig::Preference {
                        attribute: default_rating_attribute(),
                    },
                ),
                WeightedScorerConfig::new(
                    30.0,
                    ScorerConfig::Tempo {
                        target: 80.0,
                        spread: 20.0,
                        attribute: default_tempo_attribute(),
                    },
                ),
            ],
            modifiers: vec![WeightedScorerConfig::new(
                3.0,
                ScorerConfig::Repetition {
                    rules: RepetitionScorer::default().rules,
                },
            )],
            normalize_weights: false,
            duration_attribute: default_duration_attribute(),
            num_items: None,
            play_length: Some(DEFAULT_PLAY_LENGTH),
        }
    }
}

impl PlaylistConfig {
    /// Read and validate a config file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, is not valid JSON for this schema,
    /// or carries out-of-range parameters.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid settings in {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` when given, else the platform config file when present,
    /// else the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match config_path() {
            Ok(default_path) if default_path.is_file() => Self::load(&default_path),
            Ok(_) => {
                log::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
            Err(e) => {
                log::warn!("{e:#}; using default configuration");
                Ok(Self::default())
            }
        }
    }

    /// Check weights and scorer parameters.
    pub fn validate(&self) -> Result<()> {
        for (set, entries) in [("base", &self.base), ("modifier", &self.modifiers)] {
            for (index, entry) in entries.iter().enumerate() {
                if !entry.weight.is_finite() {
                    bail!("{set} scorer #{index} has a non-finite weight");
                }
                entry
                    .scorer
                    .validate()
                    .with_context(|| format!("{set} scorer #{index}"))?;
            }
        }
        if let Some(length) = self.play_length {
            if length.is_nan() {
                bail!("play_length must be a number");
            }
        }
        Ok(())
    }

    /// Assemble the composite scorer described by this config.
    pub fn build_scorer<I: Item + ?Sized>(&self) -> Result<CompositeScorer<I>> {
        self.validate()?;

        let mut scorer = CompositeScorer::new().normalized(self.normalize_weights);
        for entry in &self.base {
            scorer.push_scorer(WeightedScorer {
                weight: entry.weight,
                scorer: entry.scorer.build(),
            });
        }
        for entry in &self.modifiers {
            scorer.push_modifier(WeightedScorer {
                weight: entry.weight,
                scorer: entry.scorer.build(),
            });
        }
        Ok(scorer)
    }

    /// Build limits taken from this config.
    #[must_use]
    pub fn request(&self) -> PlaylistRequest {
        PlaylistRequest {
            num_items: self.num_items,
            play_length: self.play_length,
            debug: false,
            duration_attribute: self.duration_attribute.clone(),
        }
    }
}

/// Returns the platform-appropriate config file path.
///
/// The file itself may not exist.
///
/// # Errors
///
/// Fails when the platform has no config directory.
pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| {
        anyhow::anyhow!(
            "Could not determine system config directory. Pass --config to choose a file explicitly."
        )
    })?;

    Ok(config_dir.join("cadence").join("config.json"))
}
