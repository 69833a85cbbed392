//! Directed savings between waypoint pairs.

use serde::{Deserialize, Serialize};

/// The benefit of visiting `to` immediately after `from` instead of
/// serving each through the depots separately.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectedSaving {
    /// Waypoint left.
    pub from: usize,
    /// Waypoint entered next.
    pub to: usize,
    /// Saving value; larger is better.
    pub value: f64,
}

impl DirectedSaving {
    /// Creates a saving.
    pub fn new(from: usize, to: usize, value: f64) -> Self {
        Self { from, to, value }
    }
}

/// Stable sort by value, descending. Equal values keep their input order.
pub fn sort_descending(savings: &mut [DirectedSaving]) {
    savings.sort_by(|a, b| b.value.total_cmp(&a.value));
}
