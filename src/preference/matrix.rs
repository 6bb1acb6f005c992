//! Pairwise preference matrices.

use crate::dataset::RankMatrix;
use crate::error::{Result, SubgroupError};

/// A `w × w` pairwise item-dominance summary of a set of rankings.
///
/// Entry `(i, j)` is the mean over subjects of `sign(rank_i − rank_j)`.
/// With rank 1 meaning "most preferred", a negative entry says item `i` is
/// generally preferred over item `j`. The matrix is skew-symmetric with a
/// zero diagonal and entries in `[−1, 1]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PreferenceMatrix {
    size: usize,
    values: Vec<f64>,
}

impl PreferenceMatrix {
    /// Number of items.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Entry `(i, j)`.
    ///
    /// # Panics
    /// Panics if `i` or `j` is out of range.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.size && j < self.size, "index out of range");
        self.values[i * self.size + j]
    }

    /// Row-major entries.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Entry-wise `self − other`.
    pub fn difference(&self, other: &PreferenceMatrix) -> Result<PreferenceMatrix> {
        if self.size != other.size {
            return Err(SubgroupError::ShapeMismatch {
                reason: format!(
                    "preference matrices of size {} and {}",
                    self.size, other.size
                ),
            });
        }
        Ok(PreferenceMatrix {
            size: self.size,
            values: self
                .values
                .iter()
                .zip(&other.values)
                .map(|(a, b)| a - b)
                .collect(),
        })
    }

    /// Frobenius norm: square root of the sum of squared entries.
    pub fn frobenius_norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Largest absolute entry.
    pub fn max_abs(&self) -> f64 {
        self.values.iter().fold(0.0, |m, v| m.max(v.abs()))
    }

    /// Half the difference `global − self`, which lies in `[−1, 1]`.
    ///
    /// This is the "relative" view used when displaying how a subgroup
    /// departs from the population.
    pub fn relative_to(&self, global: &PreferenceMatrix) -> Result<PreferenceMatrix> {
        let mut diff = global.difference(self)?;
        diff.values.iter_mut().for_each(|v| *v *= 0.5);
        Ok(diff)
    }

    /// Row sums: for each item, the net amount by which it is ranked below
    /// the others. Lower totals mean stronger overall preference.
    pub fn preference_totals(&self) -> Vec<f64> {
        self.values
            .chunks_exact(self.size.max(1))
            .map(|row| row.iter().sum())
            .collect()
    }

    /// Whether `M[i][j] == −M[j][i]` and the diagonal is zero, within `eps`.
    pub fn is_skew_symmetric(&self, eps: f64) -> bool {
        (0..self.size).all(|i| {
            (0..self.size).all(|j| (self.get(i, j) + self.get(j, i)).abs() <= eps)
        })
    }
}

/// Builds the preference matrix of a set of rankings.
///
/// Returns `None` when there are no rankings; an empty subgroup has no
/// matrix, which is different from an all-zero one.
///
/// # Examples
///
/// ```
/// use u_subgroup::dataset::RankMatrix;
/// use u_subgroup::preference::compute_pm;
///
/// let ranks = RankMatrix::from_rows(2, &[vec![1, 2], vec![2, 1]]).unwrap();
/// let pm = compute_pm(&ranks).unwrap();
/// assert_eq!(pm.values(), &[0.0, 0.0, 0.0, 0.0]);
///
/// assert!(compute_pm(&RankMatrix::empty(2)).is_none());
/// ```
pub fn compute_pm(ranks: &RankMatrix) -> Option<PreferenceMatrix> {
    let n = ranks.n_rows();
    if n == 0 {
        return None;
    }
    let w = ranks.n_items();
    let mut counts = vec![0i64; w * w];
    for row in ranks.rows() {
        for i in 0..w {
            for j in (i + 1)..w {
                let s = sign(row[i], row[j]);
                counts[i * w + j] += s;
                counts[j * w + i] -= s;
            }
        }
    }
    let n = n as f64;
    Some(PreferenceMatrix {
        size: w,
        values: counts.into_iter().map(|c| c as f64 / n).collect(),
    })
}

fn sign(a: u32, b: u32) -> i64 {
    match a.cmp(&b) {
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
        std::cmp::Ordering::Greater => 1,
    }
}
