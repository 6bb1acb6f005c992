//! Per-rule summaries for inspecting and plotting search results.

use super::runner::BeamResult;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::preference::{compute_pm, PreferenceMatrix, ScoringContext};
use crate::rule::Rule;

/// What a rule's subgroup looks like next to the population.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubgroupSummary {
    /// Canonical string of the rule.
    pub rule: String,
    pub score: f64,
    /// Number of subjects in the subgroup.
    pub size: usize,
    /// Subgroup preference matrix; `None` for an empty subgroup.
    pub matrix: Option<PreferenceMatrix>,
    /// `½·(global − subgroup)`; `None` for an empty subgroup.
    pub relative: Option<PreferenceMatrix>,
    /// Row sums of `matrix`, one per item (empty for an empty subgroup).
    pub preference_totals: Vec<f64>,
}

impl SubgroupSummary {
    /// Summarises one rule.
    pub fn new(rule: &Rule, dataset: &Dataset) -> Result<Self> {
        let context = ScoringContext::from_population(dataset.ranks())?;
        Self::with_context(rule, dataset, &context)
    }

    fn with_context(rule: &Rule, dataset: &Dataset, context: &ScoringContext) -> Result<Self> {
        let subset = rule.get_subset(dataset)?;
        let matrix = compute_pm(&subset);
        let relative = matrix
            .as_ref()
            .map(|pm| pm.relative_to(context.global()))
            .transpose()?;
        let preference_totals = matrix
            .as_ref()
            .map(PreferenceMatrix::preference_totals)
            .unwrap_or_default();
        Ok(Self {
            rule: rule.key(),
            score: rule.score,
            size: subset.n_rows(),
            matrix,
            relative,
            preference_totals,
        })
    }
}

impl BeamResult {
    /// Summaries of the `n` best rules, best first.
    pub fn summaries(&self, dataset: &Dataset, n: usize) -> Result<Vec<SubgroupSummary>> {
        let context = ScoringContext::from_population(dataset.ranks())?;
        self.top(n)
            .map(|rule| SubgroupSummary::with_context(rule, dataset, &context))
            .collect()
    }
}
