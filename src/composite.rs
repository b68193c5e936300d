//! Weighted composition of scorers.
//!
//! A [`CompositeScorer`] adds up weighted *base* scorers, clamps the sum at
//! zero, then multiplies it by each weighted *modifier* in registration order:
//!
//! ```text
//! score = max(0, Σ wᵢ·baseᵢ) · Π wⱼ·modifierⱼ
//! ```
//!
//! Every call returns a new [`Breakdown`] describing how the score was
//! reached. Nothing from one call is visible to the next.

use crate::item::Item;
use crate::scorer::Scorer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a contribution was folded into the final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    #[serde(rename = "+")]
    Additive,
    #[serde(rename = "*")]
    Multiplicative,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Additive => "+",
            Self::Multiplicative => "*",
        })
    }
}

/// One scorer's weighted share of a composite score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub scorer: String,
    pub operation: Operation,
    pub value: f64,
}

impl fmt::Display for Contribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}{:.4}", self.scorer, self.operation, self.value)
    }
}

/// Contributions in evaluation order: base scorers first, then modifiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Breakdown(Vec<Contribution>);

impl Breakdown {
    fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    fn push(&mut self, scorer: &str, operation: Operation, value: f64) {
        self.0.push(Contribution {
            scorer: scorer.to_string(),
            operation,
            value,
        });
    }

    /// First contribution recorded under `scorer`.
    #[must_use]
    pub fn get(&self, scorer: &str) -> Option<&Contribution> {
        self.0.iter().find(|c| c.scorer == scorer)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contribution> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'b> IntoIterator for &'b Breakdown {
    type Item = &'b Contribution;
    type IntoIter = std::slice::Iter<'b, Contribution>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Final score of one candidate plus how it was reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeScore {
    pub score: f64,
    pub breakdown: Breakdown,
}

/// A scorer paired with the weight it carries in a composite.
pub struct WeightedScorer<I: Item + ?Sized> {
    pub weight: f64,
    pub scorer: Box<dyn Scorer<I>>,
}

impl<I: Item + ?Sized> WeightedScorer<I> {
    pub fn new(weight: f64, scorer: impl Scorer<I> + 'static) -> Self {
        Self {
            weight,
            scorer: Box::new(scorer),
        }
    }
}

impl<I: Item + ?Sized> fmt::Debug for WeightedScorer<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeightedScorer")
            .field("weight", &self.weight)
            .field("scorer", &self.scorer.name())
            .finish()
    }
}

/// Additive base scorers gated by multiplicative modifiers.
#[derive(Debug)]
pub struct CompositeScorer<I: Item + ?Sized> {
    base: Vec<WeightedScorer<I>>,
    modifiers: Vec<WeightedScorer<I>>,
    normalize_weights: bool,
}

impl<I: Item + ?Sized> Default for CompositeScorer<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Item + ?Sized> CompositeScorer<I> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            base: Vec::new(),
            modifiers: Vec::new(),
            normalize_weights: false,
        }
    }

    /// Divide each base weight by the sum of base weights before applying it.
    ///
    /// Off by default; weights then scale contributions as given.
    #[must_use]
    pub fn normalized(mut self, normalize: bool) -> Self {
        self.normalize_weights = normalize;
        self
    }

    pub fn add_scorer(&mut self, weight: f64, scorer: impl Scorer<I> + 'static) -> &mut Self {
        self.base.push(WeightedScorer::new(weight, scorer));
        self
    }

    pub fn add_modifier(&mut self, weight: f64, scorer: impl Scorer<I> + 'static) -> &mut Self {
        self.modifiers.push(WeightedScorer::new(weight, scorer));
        self
    }

    #[must_use]
    pub fn with_scorer(mut self, weight: f64, scorer: impl Scorer<I> + 'static) -> Self {
        self.add_scorer(weight, scorer);
        self
    }

    #[must_use]
    pub fn with_modifier(mut self, weight: f64, scorer: impl Scorer<I> + 'static) -> Self {
        self.add_modifier(weight, scorer);
        self
    }

    pub fn push_scorer(&mut self, entry: WeightedScorer<I>) {
        self.base.push(entry);
    }

    pub fn push_modifier(&mut self, entry: WeightedScorer<I>) {
        self.modifiers.push(entry);
    }

    #[must_use]
    pub fn base(&self) -> &[WeightedScorer<I>] {
        &self.base
    }

    #[must_use]
    pub fn modifiers(&self) -> &[WeightedScorer<I>] {
        &self.modifiers
    }

    fn base_factor(&self) -> f64 {
        if !self.normalize_weights {
            return 1.0;
        }
        let weight_sum: f64 = self.base.iter().map(|entry| entry.weight).sum();
        if weight_sum == 0.0 {
            1.0
        } else {
            weight_sum.recip()
        }
    }

    /// Score `item` against `context`, returning the contributions as well.
    pub fn rate_with_breakdown(&self, item: &I, context: &[&I]) -> CompositeScore {
        let mut breakdown = Breakdown::with_capacity(self.base.len() + self.modifiers.len());
        let factor = self.base_factor();

        let mut sum = 0.0;
        for entry in &self.base {
            let contribution = entry.weight * factor * entry.scorer.rate(item, context);
            breakdown.push(entry.scorer.name(), Operation::Additive, contribution);
            sum += contribution;
        }

        // f64::max maps NaN to the other operand, so a NaN sum becomes 0.
        let mut score = sum.max(0.0);

        for entry in &self.modifiers {
            let contribution = entry.weight * entry.scorer.rate(item, context);
            breakdown.push(entry.scorer.name(), Operation::Multiplicative, contribution);
            score *= contribution;
        }

        CompositeScore {
            score: score.max(0.0),
            breakdown,
        }
    }
}

impl<I: Item + ?Sized> Scorer<I> for CompositeScorer<I> {
    fn rate(&self, item: &I, context: &[&I]) -> f64 {
        self.rate_with_breakdown(item, context).score
    }

    fn name(&self) -> &str {
        "composite"
    }
}
