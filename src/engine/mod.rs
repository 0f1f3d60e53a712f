//! Deterministic recommendation engine
//!
//! Pure calculators used directly by the rule-based path and as context for
//! the generative prompts.

pub mod burn;
pub mod catalog;
pub mod composer;
pub mod energy;
pub mod fitness;
pub mod macros;
pub mod meals;
