//! Canonical balanced colorings of the d-cube up to its automorphism group.
//!
//! A subset is canonical when it is numerically smallest in its orbit. For each
//! canonical subset the canonicalizer reports how many *distinct* images the
//! (2^d)·d! group elements produce; summed over all canonical subsets this equals
//! the number of subsets scanned, which the driver checks after the full scan.
//!
//! Only subsets with exactly 2^(d-1) vertices are scanned. The downstream
//! aggregation consumes balanced boundary colorings only.

use std::time::Instant;

use crate::error::{Error, Result, Stage};
use crate::records::CanonicalRecord;
use crate::symmetry::{SymmetryGroup, MAX_DIM};

pub const MIN_DIM: u32 = 1;

/// Next larger integer with the same popcount.
///
/// Pre: `v != 0`. The result may carry a bit above the scanned width; callers
/// stop there.
#[inline]
pub fn next_same_popcount(v: u64) -> u64 {
    let t = (v | (v - 1)) + 1;
    t | ((((t & t.wrapping_neg()) / (v & v.wrapping_neg())) >> 1) - 1)
}

/// All `n`-bit masks with exactly `n/2` bits set, ascending. Empty unless
/// `2 <= n <= 32`.
#[derive(Clone, Debug)]
pub struct BalancedSubsets {
    next: Option<u64>,
    n: u32,
}

impl BalancedSubsets {
    pub fn new(n: u32) -> Self {
        let next = (2..=32).contains(&n).then(|| (1u64 << (n / 2)) - 1);
        Self { next, n }
    }
}

impl Iterator for BalancedSubsets {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let v = self.next?;
        if v >> self.n != 0 {
            self.next = None;
            return None;
        }
        self.next = Some(next_same_popcount(v));
        Some(v)
    }
}

/// Counters from one full scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub scanned: u64,
    pub canonical: u64,
    pub orbit_sum: u64,
}

pub struct Canonicalizer {
    group: SymmetryGroup,
    images: Vec<u64>,
}

impl Canonicalizer {
    pub fn new(d: u32) -> Result<Self> {
        if !(MIN_DIM..=MAX_DIM).contains(&d) {
            return Err(Error::dimension(Stage::Canon, d, "1..=5"));
        }
        let group = SymmetryGroup::new(d)?;
        let images = Vec::with_capacity(group.order());
        Ok(Self { group, images })
    }

    pub fn group(&self) -> &SymmetryGroup {
        &self.group
    }

    /// `None` if some automorphism maps `v` below itself, otherwise the number of
    /// distinct images of `v`.
    pub fn is_canonical(&mut self, v: u64) -> Option<u64> {
        self.images.clear();
        for a in self.group.iter() {
            let w = a.apply(v);
            if w < v {
                return None;
            }
            self.images.push(w);
        }
        self.images.sort_unstable();
        self.images.dedup();
        Some(self.images.len() as u64)
    }

    /// Scan every balanced subset in increasing order and hand each canonical one
    /// to `emit`. Fails if the orbit sizes do not account for every subset.
    pub fn scan<F>(&mut self, mut emit: F) -> Result<ScanSummary>
    where
        F: FnMut(CanonicalRecord) -> std::io::Result<()>,
    {
        let n = self.group.vertices();
        let t0 = Instant::now();
        tracing::debug!(d = self.group.dim(), group_order = self.group.order(), "canon scan");
        let mut summary = ScanSummary::default();
        for v in BalancedSubsets::new(n) {
            if let Some(orbit) = self.is_canonical(v) {
                summary.canonical += 1;
                summary.orbit_sum += orbit;
                emit(CanonicalRecord { subset: v, orbit })?;
            }
            summary.scanned += 1;
        }
        tracing::info!(
            d = self.group.dim(),
            scanned = summary.scanned,
            canonical = summary.canonical,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "canon scan done"
        );
        if summary.orbit_sum != summary.scanned {
            return Err(Error::OrbitSumMismatch {
                orbit_sum: summary.orbit_sum,
                scanned: summary.scanned,
            });
        }
        Ok(summary)
    }
}

/// Collect all canonical records for dimension `d`.
pub fn canonical_records(d: u32) -> Result<Vec<CanonicalRecord>> {
    let mut out = Vec::new();
    Canonicalizer::new(d)?.scan(|r| {
        out.push(r);
        Ok(())
    })?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symmetry::apply;
    use proptest::prelude::*;

    fn binomial(n: u64, k: u64) -> u64 {
        (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
    }

    fn rec(subset: u64, orbit: u64) -> CanonicalRecord {
        CanonicalRecord { subset, orbit }
    }

    #[test]
    fn popcount_successor_walks_balanced_masks() {
        let all: Vec<u64> = BalancedSubsets::new(4).collect();
        assert_eq!(all, vec![3, 5, 6, 9, 10, 12]);
        for n in [2u32, 8, 16] {
            let v: Vec<u64> = BalancedSubsets::new(n).collect();
            assert_eq!(v.len() as u64, binomial(n as u64, n as u64 / 2));
            assert!(v.windows(2).all(|w| w[0] < w[1]));
        }
        assert_eq!(next_same_popcount(0b0111), 0b1011);
    }

    #[test]
    fn balanced_subsets_empty_outside_supported_widths() {
        for n in [0u32, 1, 33, 64, 100] {
            assert_eq!(BalancedSubsets::new(n).count(), 0, "n = {n}");
        }
        let mut it = BalancedSubsets::new(2);
        assert_eq!(it.by_ref().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(it.next(), None);
    }

    #[test]
    fn small_dimensions_match_hand_counts() {
        assert_eq!(canonical_records(1).unwrap(), vec![rec(1, 2)]);
        assert_eq!(canonical_records(2).unwrap(), vec![rec(3, 4), rec(6, 2)]);
        let d3 = canonical_records(3).unwrap();
        assert_eq!(d3.len(), 6);
        assert_eq!(
            &d3[..5],
            &[rec(15, 6), rec(23, 8), rec(27, 24), rec(30, 24), rec(60, 6)]
        );
    }

    #[test]
    fn orbit_sizes_cover_every_balanced_subset() {
        for d in 1..=4 {
            let n = 1u64 << d;
            let summary = Canonicalizer::new(d).unwrap().scan(|_| Ok(())).unwrap();
            assert_eq!(summary.scanned, binomial(n, n / 2));
            assert_eq!(summary.orbit_sum, summary.scanned);
        }
    }

    #[test]
    fn orbit_size_divides_group_order() {
        let mut c = Canonicalizer::new(4).unwrap();
        let order = c.group().order() as u64;
        c.scan(|r| {
            assert_eq!(order % r.orbit, 0, "subset {}", r.subset);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn largest_dimension_reports_facet_orbit() {
        let mut c = Canonicalizer::new(5).unwrap();
        // the 16 vertices with x4 = 0 form a facet; its orbit is the 2·5 facets
        assert_eq!(c.is_canonical(0xffff), Some(10));
        assert_eq!(c.is_canonical(0x5555_5555), None);
    }

    #[test]
    fn rejects_unsupported_dimensions() {
        assert!(matches!(
            Canonicalizer::new(0),
            Err(Error::InvalidDimension { d: 0, .. })
        ));
        assert!(Canonicalizer::new(6).is_err());
    }

    #[test]
    fn emit_failure_aborts_scan() {
        let mut c = Canonicalizer::new(3).unwrap();
        let err = c
            .scan(|_| Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed")))
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn scan_is_deterministic() {
        assert_eq!(canonical_records(3).unwrap(), canonical_records(3).unwrap());
    }

    proptest! {
        #[test]
        fn canonical_is_below_every_independent_image(idx in 0usize..12870) {
            let v = BalancedSubsets::new(16).nth(idx).unwrap();
            let mut c = Canonicalizer::new(4).unwrap();
            let perms = c.group().permutations().to_vec();
            let canonical = c.is_canonical(v).is_some();
            let min_image = (0..16u32)
                .flat_map(|r| perms.iter().map(move |p| apply(v, 4, r, p)))
                .min()
                .unwrap();
            prop_assert_eq!(canonical, min_image == v);
        }
    }
}
