//! Conversions from alternative ranking encodings.

use crate::error::{Result, SubgroupError};

/// Converts an ordering into a rank row.
///
/// `order[k]` is the id of the item placed at position `k` (best first).
/// The result holds, for every item id, its 1-based rank. Survey data such
/// as the sushi preference sets is distributed in the ordering form.
///
/// # Errors
///
/// [`SubgroupError::MalformedOrder`] if an id is out of range or repeated.
///
/// # Examples
///
/// ```
/// use u_subgroup::dataset::ranks_from_order;
///
/// // item 2 is best, then item 0, then item 1
/// assert_eq!(ranks_from_order(&[2, 0, 1]).unwrap(), vec![2, 3, 1]);
/// ```
pub fn ranks_from_order(order: &[usize]) -> Result<Vec<u32>> {
    let w = order.len();
    let mut ranks = vec![0u32; w];
    for (position, &item) in order.iter().enumerate() {
        if item >= w {
            return Err(SubgroupError::MalformedOrder {
                reason: format!("item id {item} out of range for {w} items"),
            });
        }
        if ranks[item] != 0 {
            return Err(SubgroupError::MalformedOrder {
                reason: format!("item id {item} appears more than once"),
            });
        }
        ranks[item] = (position + 1) as u32;
    }
    Ok(ranks)
}
