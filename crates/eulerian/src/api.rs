//! Curated surface used by the CLI and benches.

// Symmetry
pub use crate::symmetry::{apply as apply_automorphism, permutations, SymmetryGroup};
// Canonicalizer
pub use crate::canon::{canonical_records, BalancedSubsets, Canonicalizer, ScanSummary};
// Constraint counting
pub use crate::constraint::{
    build_graph, count_pair, count_sat, sat_scan, ConstraintGraph, ConstraintModel, SatScanCfg,
    SatScanSummary, SearchCfg, SAT_DIMS,
};
// Aggregation
pub use crate::aggregate::{total_orientations, Aggregator, FringeTable, TOTAL_DIMS};
// Records
pub use crate::records::{read_canonical, read_sat, CanonicalRecord, SatRecord};
