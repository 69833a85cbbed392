//! Savings computation for separate start and end depots.
//!
//! - [`SavingsFormula`]: which distance combination defines a saving
//! - [`SignFilter`]: beneficial-only or sign-agnostic lists
//! - [`SavingsComputer`]: produces the sorted [`DirectedSaving`](crate::models::DirectedSaving) list

mod computer;

pub use computer::{SavingsComputer, SavingsFormula, SignFilter};
