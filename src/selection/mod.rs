//! Candidate route selection.
//!
//! - [`top_routes`]: coverage first, distance second
//! - [`DiversitySelector`]: pairwise-distinct routes by hop-set Jaccard similarity

mod diversity;
mod ranking;

pub use diversity::{
    jaccard_similarity, route_similarity, Acceptance, DiversityConfig, DiversitySelector,
    SelectedRoute,
};
pub use ranking::{best_route, compare_routes, rank_routes, top_routes};
