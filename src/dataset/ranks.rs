//! Dense row-major storage for ranking rows.

use crate::error::{Result, SubgroupError};

/// An `(n, w)` matrix of integer ranks: row `s` holds the ranks subject `s`
/// gave to each of the `w` items.
///
/// A matrix may have zero rows (an empty subgroup) but always knows its
/// item count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankMatrix {
    n_items: usize,
    data: Vec<u32>,
}

impl RankMatrix {
    /// Creates an empty matrix over `n_items` items.
    pub fn empty(n_items: usize) -> Self {
        Self {
            n_items,
            data: Vec::new(),
        }
    }

    /// Builds a matrix from rows of equal length.
    ///
    /// No permutation check is done here; see [`Dataset`](crate::dataset::Dataset)
    /// for boundary validation.
    pub fn from_rows(n_items: usize, rows: &[Vec<u32>]) -> Result<Self> {
        let mut data = Vec::with_capacity(rows.len() * n_items);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_items {
                return Err(SubgroupError::ShapeMismatch {
                    reason: format!("row {i} has {} ranks, expected {n_items}", row.len()),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self { n_items, data })
    }

    /// Number of subjects (rows).
    pub fn n_rows(&self) -> usize {
        if self.n_items == 0 {
            0
        } else {
            self.data.len() / self.n_items
        }
    }

    /// Number of items (columns).
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Ranks given by subject `row`.
    ///
    /// # Panics
    /// Panics if `row >= self.n_rows()`.
    pub fn row(&self, row: usize) -> &[u32] {
        &self.data[row * self.n_items..(row + 1) * self.n_items]
    }

    /// Iterates over the rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> + '_ {
        // chunks_exact panics on a zero chunk size
        self.data.chunks_exact(self.n_items.max(1))
    }

    /// Ranks every subject gave to one item.
    pub fn column(&self, item: usize) -> impl Iterator<Item = u32> + '_ {
        self.rows().map(move |r| r[item])
    }

    /// Copies the rows at `indices`, in the given order.
    pub fn select(&self, indices: &[usize]) -> Self {
        let mut data = Vec::with_capacity(indices.len() * self.n_items);
        for &i in indices {
            data.extend_from_slice(self.row(i));
        }
        Self {
            n_items: self.n_items,
            data,
        }
    }
}
