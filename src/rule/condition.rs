//! Atomic attribute predicates.

use std::cmp::Ordering;
use std::fmt;

use crate::dataset::{parse_integer, AttributeColumn, Dataset, OrdinalScale};
use crate::error::{Result, SubgroupError};

/// Relation between an attribute and a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Relation {
    Equal,
    LessThan,
    GreaterThan,
}

impl Relation {
    /// The symbol used in canonical strings.
    pub fn symbol(self) -> &'static str {
        match self {
            Relation::Equal => "=",
            Relation::LessThan => "<",
            Relation::GreaterThan => ">",
        }
    }

    /// Whether `ord` (row value compared to condition value) satisfies the relation.
    fn holds(self, ord: Ordering) -> bool {
        match self {
            Relation::Equal => ord == Ordering::Equal,
            Relation::LessThan => ord == Ordering::Less,
            Relation::GreaterThan => ord == Ordering::Greater,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// An atomic predicate `attribute relation value`.
///
/// Construction does no validation. Names and values are checked when the
/// condition is applied to a [`Dataset`].
///
/// # Examples
///
/// ```
/// use u_subgroup::rule::Condition;
///
/// let c = Condition::less_than("age", "2");
/// assert_eq!(c.to_string(), "[age < 2]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Condition {
    attribute: String,
    relation: Relation,
    value: String,
}

impl Condition {
    /// Creates a condition from its parts.
    pub fn new(attribute: impl Into<String>, value: impl Into<String>, relation: Relation) -> Self {
        Self {
            attribute: attribute.into(),
            relation,
            value: value.into(),
        }
    }

    /// `attribute = value`
    pub fn equal(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(attribute, value, Relation::Equal)
    }

    /// `attribute < value`
    pub fn less_than(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(attribute, value, Relation::LessThan)
    }

    /// `attribute > value`
    pub fn greater_than(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(attribute, value, Relation::GreaterThan)
    }

    /// Name of the constrained attribute.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// The comparison applied.
    pub fn relation(&self) -> Relation {
        self.relation
    }

    /// The value compared against, as written.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Resolves the condition against a dataset's columns.
    ///
    /// # Errors
    ///
    /// [`SubgroupError::UnknownAttribute`] if the column does not exist, and
    /// [`SubgroupError::IncomparableValue`] if the value cannot be ordered
    /// against a numeric column.
    pub(crate) fn resolve<'d>(&self, dataset: &'d Dataset) -> Result<Predicate<'d, '_>> {
        let column = dataset.attribute(&self.attribute)?;
        if column.scale() == OrdinalScale::Numeric && parse_integer(&self.value).is_none() {
            return Err(SubgroupError::IncomparableValue {
                attribute: self.attribute.clone(),
                value: self.value.clone(),
            });
        }
        Ok(Predicate {
            column,
            relation: self.relation,
            value: &self.value,
        })
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {} {}]", self.attribute, self.relation, self.value)
    }
}

/// A condition bound to the column it filters.
pub(crate) struct Predicate<'d, 'c> {
    column: &'d AttributeColumn,
    relation: Relation,
    value: &'c str,
}

impl Predicate<'_, '_> {
    /// Whether subject `row` satisfies the condition.
    pub(crate) fn matches(&self, row: usize) -> bool {
        let token = &self.column.tokens()[row];
        self.column
            .scale()
            .compare(token, self.value)
            .is_some_and(|ord| self.relation.holds(ord))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset::new(
            &["x", "label"],
            &[
                vec!["0", "b"],
                vec!["1", "a"],
                vec!["2", "c"],
                vec!["10", "a"],
            ],
            &["i", "j"],
            &[vec![1, 2], vec![2, 1], vec![1, 2], vec![2, 1]],
        )
        .unwrap()
    }

    fn matching(cond: &Condition, data: &Dataset) -> Vec<usize> {
        let p = cond.resolve(data).unwrap();
        (0..data.n_subjects()).filter(|&r| p.matches(r)).collect()
    }

    #[test]
    fn test_display() {
        assert_eq!(Condition::equal("age", "0").to_string(), "[age = 0]");
        assert_eq!(Condition::greater_than("age", "3").to_string(), "[age > 3]");
    }

    #[test]
    fn test_equality_is_field_wise() {
        assert_eq!(Condition::equal("a", "1"), Condition::new("a", "1", Relation::Equal));
        assert_ne!(Condition::equal("a", "1"), Condition::less_than("a", "1"));
        assert_ne!(Condition::equal("a", "1"), Condition::equal("b", "1"));
    }

    #[test]
    fn test_numeric_relations() {
        let data = dataset();
        assert_eq!(matching(&Condition::equal("x", "1"), &data), vec![1]);
        assert_eq!(matching(&Condition::less_than("x", "2"), &data), vec![0, 1]);
        // "10" > "2" numerically even though it sorts before it lexically
        assert_eq!(matching(&Condition::greater_than("x", "2"), &data), vec![3]);
    }

    #[test]
    fn test_lexical_relations() {
        let data = dataset();
        assert_eq!(matching(&Condition::less_than("label", "b"), &data), vec![1, 3]);
        assert_eq!(matching(&Condition::equal("label", "z"), &data), Vec::<usize>::new());
    }

    #[test]
    fn test_unknown_attribute() {
        let err = Condition::equal("y", "0").resolve(&dataset()).err().unwrap();
        assert!(matches!(err, SubgroupError::UnknownAttribute { .. }));
    }

    #[test]
    fn test_incomparable_value() {
        let err = Condition::less_than("x", "high").resolve(&dataset()).err().unwrap();
        assert!(matches!(err, SubgroupError::IncomparableValue { .. }));
    }
}
