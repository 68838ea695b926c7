//! Final count for dimension d from canonical colorings of the (d−1)-cube and
//! fringe counts of the (d−2)-cube.
//!
//! The d-cube is two (d−1)-cubes joined by a perfect matching, and each (d−1)-cube
//! is two (d−2)-cubes joined the same way. A canonical coloring `v` of the
//! (d−1)-cube fixes the orientation of the outer matching; its lower and upper
//! halves `lv`, `uv` are the boundary colorings of the two inner (d−2)-cubes.
//! Inner solutions glue across the inner matching exactly when their fringes are
//! bitwise complements, so
//!
//! `local(v) = Σ count_u · count_l` over `(f_u, count_u) ∈ T[uv]`,
//! `(f_l, count_l) ∈ T[lv]` with `f_u ^ f_l == all_ones`,
//!
//! and the total is `Σ orbit(v) · local(v)²` over canonical `v`.

use std::collections::BTreeMap;

use num_bigint::BigUint;
use num_traits::Zero;

use crate::error::{Error, Result, Stage};
use crate::records::{CanonicalRecord, SatRecord};

/// Even dimensions whose inputs the other two stages can produce.
pub const TOTAL_DIMS: [u32; 3] = [2, 4, 6];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FringeCount {
    pub fringe: u32,
    pub count: u64,
}

/// Fringe counts grouped by boundary coloring, each group sorted by fringe.
#[derive(Clone, Debug, Default)]
pub struct FringeTable {
    groups: BTreeMap<u32, Vec<FringeCount>>,
}

impl FringeTable {
    /// Index records by coloring. Repeated `(coloring, fringe)` pairs are merged
    /// by adding their counts.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = SatRecord>,
    {
        let mut groups: BTreeMap<u32, Vec<FringeCount>> = BTreeMap::new();
        for r in records {
            groups.entry(r.coloring).or_default().push(FringeCount {
                fringe: r.fringe,
                count: r.count,
            });
        }
        for list in groups.values_mut() {
            list.sort_by_key(|fc| fc.fringe);
            list.dedup_by(|next, kept| {
                if next.fringe == kept.fringe {
                    kept.count += next.count;
                    true
                } else {
                    false
                }
            });
        }
        Self { groups }
    }

    pub fn get(&self, coloring: u32) -> &[FringeCount] {
        self.groups
            .get(&coloring)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn colorings(&self) -> usize {
        self.groups.len()
    }

    /// Σ count_u · count_l over pairs of complementary fringes.
    pub fn glue(&self, upper: u32, lower: u32, all_ones: u32) -> BigUint {
        let lower = self.get(lower);
        let mut sum = BigUint::zero();
        for u in self.get(upper) {
            let want = u.fringe ^ all_ones;
            if let Ok(i) = lower.binary_search_by_key(&want, |fc| fc.fringe) {
                sum += BigUint::from(u.count) * lower[i].count;
            }
        }
        sum
    }
}

/// Streaming accumulator over canonical records.
pub struct Aggregator {
    d: u32,
    half_bits: u32,
    all_ones: u32,
    table: FringeTable,
    total: BigUint,
    records: u64,
}

impl Aggregator {
    pub fn new<I>(d: u32, sat: I) -> Result<Self>
    where
        I: IntoIterator<Item = SatRecord>,
    {
        if !TOTAL_DIMS.contains(&d) {
            return Err(Error::dimension(Stage::Total, d, "2, 4, 6"));
        }
        let half_bits = 1u32 << (d - 2);
        let table = FringeTable::from_records(sat);
        tracing::debug!(d, colorings = table.colorings(), "fringe table");
        Ok(Self {
            d,
            half_bits,
            all_ones: ((1u64 << half_bits) - 1) as u32,
            table,
            total: BigUint::zero(),
            records: 0,
        })
    }

    pub fn add(&mut self, rec: CanonicalRecord) {
        let mask = self.all_ones as u64;
        let lower = (rec.subset & mask) as u32;
        let upper = ((rec.subset >> self.half_bits) & mask) as u32;
        let local = self.table.glue(upper, lower, self.all_ones);
        if !local.is_zero() {
            self.total += &local * &local * rec.orbit;
        }
        self.records += 1;
    }

    pub fn finish(self) -> BigUint {
        tracing::info!(d = self.d, canonical = self.records, "aggregate done");
        self.total
    }
}

/// Number of Eulerian orientations of the d-cube.
pub fn total_orientations<S, C>(d: u32, sat: S, canon: C) -> Result<BigUint>
where
    S: IntoIterator<Item = SatRecord>,
    C: IntoIterator<Item = CanonicalRecord>,
{
    let mut agg = Aggregator::new(d, sat)?;
    for rec in canon {
        agg.add(rec);
    }
    Ok(agg.finish())
}
