//! Exceptional preference subgroup discovery.
//!
//! Given per-subject attributes and per-subject rankings over a fixed set of
//! items, finds conjunctions of attribute conditions whose subgroups rank
//! the items very differently from the population as a whole.
//!
//! - **Dataset**: aligned attributes and rankings tables, validated at the
//!   boundary.
//! - **Rules**: [`Condition`](rule::Condition) predicates (`=`, `<`, `>`)
//!   combined into [`Rule`](rule::Rule) conjunctions with a canonical
//!   string identity.
//! - **Preference matrices**: pairwise item-dominance summaries and the
//!   exceptionality scores comparing a subgroup against the population.
//! - **Beam search**: iterative one-condition refinement of a fixed-width
//!   beam of rules, with pluggable quality measures.
//!
//! # Example
//!
//! ```
//! use u_subgroup::beam::{BeamConfig, BeamRunner};
//! use u_subgroup::dataset::Dataset;
//! use u_subgroup::preference::PmScore;
//!
//! let data = Dataset::new(
//!     &["age", "region"],
//!     &[
//!         vec!["0", "n"],
//!         vec!["0", "s"],
//!         vec!["1", "n"],
//!         vec!["1", "s"],
//!         vec!["2", "n"],
//!     ],
//!     &["tuna", "salmon", "egg"],
//!     &[
//!         vec![1, 2, 3],
//!         vec![1, 3, 2],
//!         vec![3, 2, 1],
//!         vec![3, 1, 2],
//!         vec![2, 3, 1],
//!     ],
//! )
//! .unwrap();
//!
//! let config = BeamConfig::default().with_beam_width(3).with_seed(0);
//! let result = BeamRunner::run(&data, &PmScore::default(), &config).unwrap();
//! let best = result.best().unwrap();
//! assert!(best.score > 0.0);
//! ```

pub mod beam;
pub mod dataset;
pub mod error;
pub mod preference;
pub mod rule;

pub use error::{Result, SubgroupError};
