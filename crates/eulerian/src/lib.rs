//! Eulerian orientations of the d-cube, counted in three batch stages.
//!
//! 1. `canon`: balanced vertex colorings of the (d−1)-cube up to symmetry, each
//!    with its number of distinct automorphism images.
//! 2. `constraint`: for every pair of opposite-face colorings of the (d−2)-cube,
//!    the number of interior orientations meeting the induced degree goals.
//! 3. `aggregate`: glue (2) along complementary fringes and weight by (1).
//!
//! Stages exchange whitespace-separated text records (`records`); nothing is
//! shared in memory between them.

pub mod aggregate;
pub mod api;
pub mod canon;
pub mod constraint;
pub mod error;
pub mod records;
pub mod symmetry;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{Error, Result};
pub use num_bigint::BigUint;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::aggregate::{total_orientations, Aggregator};
    pub use crate::canon::{canonical_records, Canonicalizer};
    pub use crate::constraint::{sat_records, sat_scan, SatScanCfg, SearchCfg};
    pub use crate::records::{read_canonical, read_sat, CanonicalRecord, SatRecord};
    pub use crate::{BigUint, Error, Result};
}
