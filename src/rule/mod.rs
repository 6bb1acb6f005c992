//! Subgroup descriptions.
//!
//! A [`Condition`] is an atomic predicate over one attribute; a [`Rule`] is
//! a conjunction of conditions with at most one condition per attribute.

mod condition;
mod conjunction;

pub use condition::{Condition, Relation};
pub use conjunction::{Rule, CONDITION_SEPARATOR};
