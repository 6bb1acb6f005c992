//! Conjunctions of conditions.

use std::fmt;

use super::condition::Condition;
use crate::dataset::{Dataset, RankMatrix};
use crate::error::Result;

/// Separator between conditions in a rule's canonical string.
pub const CONDITION_SEPARATOR: &str = " & ";

/// A conjunction of [`Condition`]s defining a subgroup, with its quality score.
///
/// A rule constrains each attribute at most once. Conditions are kept sorted
/// by attribute name, so the canonical string returned by [`Rule::key`]
/// does not depend on the order in which conditions were added. Two rules
/// are the same subgroup description exactly when their keys match.
///
/// Cloning a rule produces an independent copy; extending the copy never
/// affects the original.
///
/// # Examples
///
/// ```
/// use u_subgroup::rule::{Condition, Rule};
///
/// let mut rule = Rule::new();
/// assert!(rule.add(Condition::equal("sex", "f")));
/// assert!(rule.add(Condition::less_than("age", "3")));
/// // age is already constrained
/// assert!(!rule.add(Condition::equal("age", "1")));
/// assert_eq!(rule.key(), "[age < 3] & [sex = f]");
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    conditions: Vec<Condition>,
    /// Quality assigned by the search; 0.0 until scored.
    pub score: f64,
}

impl Rule {
    /// Creates the empty rule, which matches every subject.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a rule holding a single condition.
    pub fn with_condition(condition: Condition) -> Self {
        let mut rule = Self::new();
        rule.add(condition);
        rule
    }

    /// Adds a condition unless its attribute is already constrained.
    ///
    /// Returns `true` if the condition was added. On `false` the rule is
    /// left unchanged.
    pub fn add(&mut self, condition: Condition) -> bool {
        match self
            .conditions
            .binary_search_by(|c| c.attribute().cmp(condition.attribute()))
        {
            Ok(_) => false,
            Err(pos) => {
                self.conditions.insert(pos, condition);
                true
            }
        }
    }

    /// Returns a copy of this rule extended with `condition`, keeping the
    /// score, or `None` if the attribute is already constrained.
    pub fn extended(&self, condition: &Condition) -> Option<Rule> {
        if self.constrains(condition.attribute()) {
            return None;
        }
        let mut next = self.clone();
        next.add(condition.clone());
        Some(next)
    }

    /// Whether some condition already constrains `attribute`.
    pub fn constrains(&self, attribute: &str) -> bool {
        self.conditions
            .binary_search_by(|c| c.attribute().cmp(attribute))
            .is_ok()
    }

    /// Conditions in canonical (attribute-sorted) order.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Number of conditions.
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Whether the rule has no conditions and so matches every subject.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Canonical string identity, e.g. `"[age < 3] & [sex = f]"`.
    ///
    /// The empty rule has the empty key.
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Indices of the subjects satisfying every condition.
    ///
    /// # Errors
    ///
    /// Fails if a condition names an attribute the dataset lacks, or
    /// compares a numeric column against a non-integer value.
    pub fn matching_rows(&self, dataset: &Dataset) -> Result<Vec<usize>> {
        let predicates = self
            .conditions
            .iter()
            .map(|c| c.resolve(dataset))
            .collect::<Result<Vec<_>>>()?;
        Ok((0..dataset.n_subjects())
            .filter(|&row| predicates.iter().all(|p| p.matches(row)))
            .collect())
    }

    /// The rankings of the subgroup this rule selects.
    ///
    /// The empty rule yields the full ranking table. A rule that matches no
    /// subject yields a zero-row matrix.
    pub fn get_subset(&self, dataset: &Dataset) -> Result<RankMatrix> {
        if self.is_empty() {
            return Ok(dataset.ranks().clone());
        }
        let rows = self.matching_rows(dataset)?;
        Ok(dataset.ranks().select(&rows))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.conditions.iter().enumerate() {
            if i > 0 {
                f.write_str(CONDITION_SEPARATOR)?;
            }
            write!(f, "{c}")?;
        }
        Ok(())
    }
}
