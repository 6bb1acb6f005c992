//! The move set explored at every refinement step.

use crate::dataset::Dataset;
use crate::rule::Condition;

/// Builds every condition the search may add to a rule.
///
/// For each attribute (in column order) and each distinct value (in
/// ascending ordinal order) an equality condition is emitted. Values that
/// are neither among the two smallest nor the two largest also get `<` and
/// `>` conditions; near the ends those would select almost nothing or
/// almost everything, or repeat an equality.
pub fn candidate_pool(dataset: &Dataset) -> Vec<Condition> {
    let mut pool = Vec::new();
    for column in dataset.attributes() {
        let values = column.distinct_sorted();
        let n = values.len();
        for (index, &value) in values.iter().enumerate() {
            pool.push(Condition::equal(column.name(), value));
            if index > 1 && index + 2 < n {
                pool.push(Condition::less_than(column.name(), value));
                pool.push(Condition::greater_than(column.name(), value));
            }
        }
    }
    pool
}
