//! Exceptionality scores over subgroup rankings.

use std::fmt;
use std::str::FromStr;

use super::matrix::{compute_pm, PreferenceMatrix};
use crate::dataset::RankMatrix;
use crate::error::{Result, SubgroupError};

/// How the deviation between a subgroup PM and the global PM is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoreMethod {
    /// Frobenius norm of the difference matrix.
    #[default]
    Norm,
    /// Largest absolute entry of the difference matrix: the single item
    /// pair on which the subgroup departs most from the population.
    MaxAbs,
}

impl ScoreMethod {
    pub fn name(self) -> &'static str {
        match self {
            ScoreMethod::Norm => "norm",
            ScoreMethod::MaxAbs => "max-abs",
        }
    }
}

impl fmt::Display for ScoreMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScoreMethod {
    type Err = SubgroupError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "norm" | "frobenius" => Ok(ScoreMethod::Norm),
            "max-abs" | "maxabs" | "max" => Ok(ScoreMethod::MaxAbs),
            _ => Err(SubgroupError::UnsupportedMethod {
                method: s.to_string(),
            }),
        }
    }
}

/// Scores a subgroup's rankings against the global preference matrix.
///
/// The raw deviation (per `method`) is weighted by `sqrt(n / population)`,
/// where `n` is the subgroup size, so deviations found in tiny subgroups
/// count for less. An empty subgroup scores exactly 0.0.
///
/// # Examples
///
/// ```
/// use u_subgroup::dataset::RankMatrix;
/// use u_subgroup::preference::{compute_pm, compute_pm_score, ScoreMethod};
///
/// let all = RankMatrix::from_rows(2, &[vec![1, 2], vec![2, 1]]).unwrap();
/// let global = compute_pm(&all).unwrap();
/// let score = compute_pm_score(&all, &global, 2, ScoreMethod::Norm).unwrap();
/// assert_eq!(score, 0.0);
/// ```
pub fn compute_pm_score(
    ranks: &RankMatrix,
    global: &PreferenceMatrix,
    population: usize,
    method: ScoreMethod,
) -> Result<f64> {
    let Some(pm) = compute_pm(ranks) else {
        return Ok(0.0);
    };
    if population < ranks.n_rows() {
        return Err(SubgroupError::ShapeMismatch {
            reason: format!(
                "subgroup of {} subjects exceeds population of {population}",
                ranks.n_rows()
            ),
        });
    }
    let diff = pm.difference(global)?;
    let criterion = match method {
        ScoreMethod::Norm => diff.frobenius_norm(),
        ScoreMethod::MaxAbs => diff.max_abs(),
    };
    Ok(criterion * (ranks.n_rows() as f64 / population as f64).sqrt())
}

/// Population-level reference a subgroup is scored against.
#[derive(Debug, Clone)]
pub struct ScoringContext {
    global: PreferenceMatrix,
    population: usize,
}

impl ScoringContext {
    /// Builds the context from the full population's rankings.
    ///
    /// # Errors
    ///
    /// [`SubgroupError::EmptyDataset`] if there are no rankings.
    pub fn from_population(ranks: &RankMatrix) -> Result<Self> {
        let global = compute_pm(ranks).ok_or(SubgroupError::EmptyDataset)?;
        Ok(Self {
            global,
            population: ranks.n_rows(),
        })
    }

    /// The population's preference matrix.
    pub fn global(&self) -> &PreferenceMatrix {
        &self.global
    }

    /// Number of subjects in the population.
    pub fn population(&self) -> usize {
        self.population
    }
}

/// A quality measure for the subgroups explored by the search.
///
/// Higher is more exceptional. Implementations must be pure: the search
/// may call `score` from several threads for different candidates.
pub trait QualityMeasure: Send + Sync {
    /// Scores the rankings of one subgroup.
    fn score(&self, subset: &RankMatrix, context: &ScoringContext) -> Result<f64>;
}

/// Preference-matrix deviation, the default exceptionality measure.
#[derive(Debug, Clone, Copy, Default)]
pub struct PmScore {
    pub method: ScoreMethod,
}

impl PmScore {
    pub fn new(method: ScoreMethod) -> Self {
        Self { method }
    }
}

impl QualityMeasure for PmScore {
    fn score(&self, subset: &RankMatrix, context: &ScoringContext) -> Result<f64> {
        compute_pm_score(subset, &context.global, context.population, self.method)
    }
}

/// Standard deviation of the ranks given to one item.
///
/// A quick disagreement measure that ignores the population reference.
/// Empty subgroups score 0.0.
#[derive(Debug, Clone, Copy)]
pub struct RankSpread {
    pub item: usize,
}

impl QualityMeasure for RankSpread {
    fn score(&self, subset: &RankMatrix, _context: &ScoringContext) -> Result<f64> {
        if self.item >= subset.n_items() {
            return Err(SubgroupError::ShapeMismatch {
                reason: format!("item {} out of range for {} items", self.item, subset.n_items()),
            });
        }
        let n = subset.n_rows();
        if n == 0 {
            return Ok(0.0);
        }
        let mean = subset.column(self.item).map(f64::from).sum::<f64>() / n as f64;
        let var = subset
            .column(self.item)
            .map(|r| (f64::from(r) - mean).powi(2))
            .sum::<f64>()
            / n as f64;
        Ok(var.sqrt())
    }
}

/// Adapts a plain function over subgroup rankings into a [`QualityMeasure`].
///
/// ```
/// use u_subgroup::preference::ScoreFn;
///
/// let by_size = ScoreFn(|ranks: &u_subgroup::dataset::RankMatrix| ranks.n_rows() as f64);
/// # let _ = by_size;
/// ```
pub struct ScoreFn<F>(pub F);

impl<F> QualityMeasure for ScoreFn<F>
where
    F: Fn(&RankMatrix) -> f64 + Send + Sync,
{
    fn score(&self, subset: &RankMatrix, _context: &ScoringContext) -> Result<f64> {
        Ok((self.0)(subset))
    }
}
