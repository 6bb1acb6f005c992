//! Preference matrices and the exceptionality scores built on them.
//!
//! A preference matrix (PM) summarises a set of rankings as pairwise item
//! dominance. A subgroup is exceptional when its PM is far from the PM of
//! the whole population; [`compute_pm_score`] measures that distance and
//! discounts it for small subgroups.
//!
//! # References
//!
//! - de Sá, Duivesteijn, Soares & Jorge (2016), "Exceptional Preferences
//!   Mining", *Discovery Science*.

mod matrix;
mod score;

pub use matrix::{compute_pm, PreferenceMatrix};
pub use score::{
    compute_pm_score, PmScore, QualityMeasure, RankSpread, ScoreFn, ScoreMethod, ScoringContext,
};
