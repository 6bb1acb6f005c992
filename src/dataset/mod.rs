//! Input tables for subgroup discovery.
//!
//! A [`Dataset`] pairs an attributes table (ordinal-coded categorical
//! columns) with a rankings table (one permutation of `1..=w` per subject).
//! Loading and dataset-specific preprocessing live with the caller; this
//! module only validates the boundary and provides the row filtering the
//! search needs.

mod ordinal;
mod ranks;
mod table;
mod transform;

pub use ordinal::OrdinalScale;
pub(crate) use ordinal::parse_integer;
pub use ranks::RankMatrix;
pub use table::{AttributeColumn, Dataset};
pub use transform::ranks_from_order;
