//! Route distance evaluation.

mod evaluator;

pub use evaluator::RouteEvaluator;
