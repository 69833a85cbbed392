//! Expansion of waypoint routes into graph edge paths.

mod expander;

pub use expander::{ExpandedRoute, RouteExpander};
