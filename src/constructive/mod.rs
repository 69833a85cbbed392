//! Route construction from savings orderings.
//!
//! - [`RouteBuilder`]: directed Clarke-Wright merging for separate depots
//! - [`VariantGenerator`]: randomized re-runs producing a candidate pool

mod clarke_wright;
mod variants;

pub use clarke_wright::RouteBuilder;
pub use variants::{ShuffleMode, VariantGenerator};
