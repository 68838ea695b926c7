//! Degree-constrained orientation counting on the d-cube.
//!
//! Purpose
//! - Vertices are constraints, edges are ±1 variables. Given a signed degree goal
//!   at every vertex (derived from two opposite-face colorings), count the edge
//!   orientations that meet all goals exactly.
//!
//! Layout
//! - `types.rs`: graph tables, live model, search configuration.
//! - `build.rs`: edge numbering and incidence.
//! - `search.rs`: backtracking with forced-edge propagation.
//! - `driver.rs`: exhaustive scan over coloring pairs.

mod build;
mod driver;
mod search;
mod types;

pub use build::build_graph;
pub use driver::{count_pair, sat_records, sat_scan, SatScanCfg, SatScanSummary, SAT_DIMS};
pub use search::{count_sat, count_sat_with_stats, SearchStats};
pub use types::{
    boundary_side, ConstraintGraph, ConstraintModel, EdgeId, Incidence, SearchCfg, VertexId,
};

#[cfg(test)]
mod tests;
