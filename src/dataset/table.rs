//! The aligned attributes/rankings tables a search runs over.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt::Display;

use super::ordinal::OrdinalScale;
use super::ranks::RankMatrix;
use crate::error::{Result, SubgroupError};

/// One ordinal-coded attribute column.
#[derive(Debug, Clone)]
pub struct AttributeColumn {
    name: String,
    tokens: Vec<String>,
    scale: OrdinalScale,
}

impl AttributeColumn {
    fn new(name: String, tokens: Vec<String>) -> Self {
        let scale = OrdinalScale::infer(tokens.iter().map(String::as_str));
        Self {
            name,
            tokens,
            scale,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Per-subject tokens, in subject order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Ordering used for `<` / `>` comparisons on this column.
    pub fn scale(&self) -> OrdinalScale {
        self.scale
    }

    /// Distinct tokens in ascending ordinal order.
    pub fn distinct_sorted(&self) -> Vec<&str> {
        let mut values: Vec<&str> = self.tokens.iter().map(String::as_str).collect();
        // Tokens of a column always compare on their own scale.
        values.sort_by(|a, b| self.scale.compare(a, b).unwrap_or(Ordering::Equal));
        values.dedup_by(|a, b| self.scale.compare(a, b) == Some(Ordering::Equal));
        values
    }
}

/// Subject attributes and rankings sharing row identity.
///
/// Row `s` of every attribute column and row `s` of the rank matrix describe
/// the same subject. Both tables are validated on construction and never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct Dataset {
    attributes: Vec<AttributeColumn>,
    items: Vec<String>,
    ranks: RankMatrix,
}

impl Dataset {
    /// Builds a dataset from row-aligned tables.
    ///
    /// `attribute_rows[s][a]` is subject `s`'s token for `attribute_names[a]`;
    /// `rank_rows[s][i]` is the rank subject `s` gave to `items[i]`.
    ///
    /// # Errors
    ///
    /// Fails if the tables are misaligned or ragged, if there are no subjects
    /// or no items, if a name repeats, or if a rank row is not a permutation
    /// of `1..=items.len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_subgroup::dataset::Dataset;
    ///
    /// let data = Dataset::new(
    ///     &["age"],
    ///     &[vec!["0"], vec!["1"]],
    ///     &["tuna", "salmon"],
    ///     &[vec![1, 2], vec![2, 1]],
    /// )
    /// .unwrap();
    /// assert_eq!(data.n_subjects(), 2);
    /// ```
    pub fn new<S: AsRef<str>>(
        attribute_names: &[S],
        attribute_rows: &[Vec<S>],
        items: &[S],
        rank_rows: &[Vec<u32>],
    ) -> Result<Self> {
        if attribute_rows.len() != rank_rows.len() {
            return Err(SubgroupError::ShapeMismatch {
                reason: format!(
                    "{} attribute rows but {} ranking rows",
                    attribute_rows.len(),
                    rank_rows.len()
                ),
            });
        }
        if rank_rows.is_empty() {
            return Err(SubgroupError::EmptyDataset);
        }
        if items.is_empty() {
            return Err(SubgroupError::ShapeMismatch {
                reason: "no items to rank".into(),
            });
        }
        ensure_unique(attribute_names, "attribute")?;
        ensure_unique(items, "item")?;

        let mut columns: Vec<Vec<String>> =
            vec![Vec::with_capacity(attribute_rows.len()); attribute_names.len()];
        for (s, row) in attribute_rows.iter().enumerate() {
            if row.len() != attribute_names.len() {
                return Err(SubgroupError::ShapeMismatch {
                    reason: format!(
                        "attribute row {s} has {} values, expected {}",
                        row.len(),
                        attribute_names.len()
                    ),
                });
            }
            for (column, token) in columns.iter_mut().zip(row) {
                column.push(token.as_ref().to_string());
            }
        }

        let w = items.len();
        for (s, row) in rank_rows.iter().enumerate() {
            validate_permutation(s, row, w)?;
        }

        let attributes = attribute_names
            .iter()
            .zip(columns)
            .map(|(name, tokens)| AttributeColumn::new(name.as_ref().to_string(), tokens))
            .collect();

        Ok(Self {
            attributes,
            items: items.iter().map(|i| i.as_ref().to_string()).collect(),
            ranks: RankMatrix::from_rows(w, rank_rows)?,
        })
    }

    /// Builds a dataset from subject-keyed records.
    ///
    /// Subjects are ordered by key; attribute and item columns are ordered
    /// by name. Every subject must appear in both maps and carry a value for
    /// every attribute and item seen anywhere in its table.
    pub fn from_records<K>(
        attributes: &BTreeMap<K, BTreeMap<String, String>>,
        rankings: &BTreeMap<K, BTreeMap<String, u32>>,
    ) -> Result<Self>
    where
        K: Ord + Display,
    {
        for subject in rankings.keys() {
            if !attributes.contains_key(subject) {
                return Err(SubgroupError::MissingSubject {
                    subject: subject.to_string(),
                    table: "attributes",
                });
            }
        }

        let attribute_names: Vec<&String> = attributes
            .values()
            .flat_map(|m| m.keys())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let item_names: Vec<&String> = rankings
            .values()
            .flat_map(|m| m.keys())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut attribute_rows = Vec::with_capacity(attributes.len());
        let mut rank_rows = Vec::with_capacity(attributes.len());
        for (subject, values) in attributes {
            let ranks = rankings
                .get(subject)
                .ok_or_else(|| SubgroupError::MissingSubject {
                    subject: subject.to_string(),
                    table: "rankings",
                })?;

            let row = attribute_names
                .iter()
                .map(|&name| {
                    values
                        .get(name)
                        .map(String::as_str)
                        .ok_or_else(|| missing(subject, name))
                })
                .collect::<Result<Vec<&str>>>()?;
            attribute_rows.push(row);

            let row = item_names
                .iter()
                .map(|&name| ranks.get(name).copied().ok_or_else(|| missing(subject, name)))
                .collect::<Result<Vec<u32>>>()?;
            rank_rows.push(row);
        }

        let attribute_names: Vec<&str> = attribute_names.iter().map(|s| s.as_str()).collect();
        let item_names: Vec<&str> = item_names.iter().map(|s| s.as_str()).collect();
        Self::new(&attribute_names, &attribute_rows, &item_names, &rank_rows)
    }

    /// Number of subjects (rows).
    pub fn n_subjects(&self) -> usize {
        self.ranks.n_rows()
    }

    /// Number of ranked items.
    pub fn n_items(&self) -> usize {
        self.items.len()
    }

    /// Item names in ranking-column order.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Attribute columns in input order.
    pub fn attributes(&self) -> &[AttributeColumn] {
        &self.attributes
    }

    /// Looks up an attribute column by name.
    pub fn attribute(&self, name: &str) -> Result<&AttributeColumn> {
        self.attributes
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| SubgroupError::UnknownAttribute {
                attribute: name.to_string(),
            })
    }

    /// The full rankings table.
    pub fn ranks(&self) -> &RankMatrix {
        &self.ranks
    }
}

fn missing<K: Display>(subject: &K, column: &str) -> SubgroupError {
    SubgroupError::MissingValue {
        subject: subject.to_string(),
        column: column.to_string(),
    }
}

fn ensure_unique<S: AsRef<str>>(names: &[S], what: &str) -> Result<()> {
    let mut seen = HashSet::with_capacity(names.len());
    for name in names {
        if !seen.insert(name.as_ref()) {
            return Err(SubgroupError::ShapeMismatch {
                reason: format!("duplicate {what} name {:?}", name.as_ref()),
            });
        }
    }
    Ok(())
}

fn validate_permutation(row: usize, ranks: &[u32], w: usize) -> Result<()> {
    if ranks.len() != w {
        return Err(SubgroupError::MalformedRanking {
            row,
            reason: format!("{} ranks for {w} items", ranks.len()),
        });
    }
    let mut seen = vec![false; w];
    for &r in ranks {
        if r == 0 || r as usize > w {
            return Err(SubgroupError::MalformedRanking {
                row,
                reason: format!("rank {r} outside [1, {w}]"),
            });
        }
        if std::mem::replace(&mut seen[r as usize - 1], true) {
            return Err(SubgroupError::MalformedRanking {
                row,
                reason: format!("rank {r} given twice"),
            });
        }
    }
    Ok(())
}
