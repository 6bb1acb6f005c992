//! Beam search for exceptional preference subgroups.
//!
//! Keeps a fixed-width beam of the best [`Rule`](crate::rule::Rule)s found
//! so far and refines each of them by one condition per sweep, until a
//! sweep no longer changes the beam. The search is a heuristic: it does not
//! guarantee the globally best subgroup.
//!
//! # References
//!
//! - Lowerre, B. (1976). *The Harpy Speech Recognition System*, PhD thesis,
//!   Carnegie Mellon University.
//! - Duivesteijn, Feelders & Knobbe (2016). "Exceptional Model Mining",
//!   *Data Mining and Knowledge Discovery* 30(1), 47-98.

mod config;
mod pool;
mod report;
mod runner;

pub use config::BeamConfig;
pub use pool::candidate_pool;
pub use report::SubgroupSummary;
pub use runner::{BeamResult, BeamRunner};
