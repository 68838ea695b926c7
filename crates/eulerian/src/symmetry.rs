//! Automorphism group of the d-cube: 2^d reflections times d! coordinate permutations.
//!
//! Purpose
//! - Enumerate every automorphism exactly once, in a fixed order (reflection mask
//!   outer, permutation inner), and act with it on vertex subsets.
//!
//! Conventions
//! - A vertex subset is a `u64` bitmask over the 2^d vertex labels.
//! - Reflections are not materialized: the masks `0..2^d` are used directly as
//!   XOR masks on vertex labels.
//! - The image of `v` under `(reflection, perm)` has bit `k` equal to bit
//!   `permute_label(k, perm) ^ reflection` of `v`.

use crate::error::{Error, Result, Stage};

/// Largest dimension whose subsets (plus one spare bit) fit a `u64`.
pub const MAX_DIM: u32 = 5;

/// Relabel vertex `k` by a coordinate permutation: bit `l` of the result is bit
/// `perm[l]` of `k`.
#[inline]
pub fn permute_label(k: u32, perm: &[u8]) -> u32 {
    perm.iter()
        .enumerate()
        .fold(0, |acc, (l, &p)| acc | (((k >> p) & 1) << l))
}

/// Image of subset `v` of the d-cube under "reflect by `reflection`, relabel by `perm`".
pub fn apply(v: u64, d: u32, reflection: u32, perm: &[u8]) -> u64 {
    debug_assert_eq!(perm.len(), d as usize);
    let n = 1u32 << d;
    (0..n).fold(0u64, |w, k| {
        let src = permute_label(k, perm) ^ reflection;
        w | (((v >> src) & 1) << k)
    })
}

/// All d! permutations of `0..d`, produced by in-place swapping.
///
/// The output list is threaded through the recursion; there is no shared cursor.
pub fn permutations(d: u32) -> Vec<Vec<u8>> {
    let mut out = Vec::with_capacity(factorial(d) as usize);
    let mut a: Vec<u8> = (0..d as u8).collect();
    permute_rec(&mut a, 0, &mut out);
    out
}

fn permute_rec(a: &mut [u8], i: usize, out: &mut Vec<Vec<u8>>) {
    if i == a.len() {
        out.push(a.to_vec());
        return;
    }
    for j in i..a.len() {
        a.swap(i, j);
        permute_rec(a, i + 1, out);
        a.swap(i, j);
    }
}

pub fn factorial(d: u32) -> u64 {
    (2..=d as u64).product()
}

/// One group element with its vertex relabeling precomputed.
#[derive(Clone, Debug)]
pub struct Automorphism {
    pub reflection: u32,
    /// Index into `SymmetryGroup::permutations`.
    pub perm: usize,
    source: Vec<u8>,
}

impl Automorphism {
    #[inline]
    pub fn apply(&self, v: u64) -> u64 {
        self.source
            .iter()
            .enumerate()
            .fold(0u64, |w, (k, &src)| w | (((v >> src) & 1) << k))
    }
}

/// Full automorphism group of the d-cube, order (2^d)·d!.
#[derive(Clone, Debug)]
pub struct SymmetryGroup {
    d: u32,
    permutations: Vec<Vec<u8>>,
    elements: Vec<Automorphism>,
}

impl SymmetryGroup {
    pub fn new(d: u32) -> Result<Self> {
        if d > MAX_DIM {
            return Err(Error::dimension(Stage::Canon, d, "0..=5"));
        }
        let n = 1u32 << d;
        let permutations = permutations(d);
        let mut elements = Vec::with_capacity(n as usize * permutations.len());
        for reflection in 0..n {
            for (pi, perm) in permutations.iter().enumerate() {
                let source = (0..n)
                    .map(|k| (permute_label(k, perm) ^ reflection) as u8)
                    .collect();
                elements.push(Automorphism {
                    reflection,
                    perm: pi,
                    source,
                });
            }
        }
        Ok(Self {
            d,
            permutations,
            elements,
        })
    }

    #[inline]
    pub fn dim(&self) -> u32 {
        self.d
    }

    /// Number of vertices, 2^d.
    #[inline]
    pub fn vertices(&self) -> u32 {
        1 << self.d
    }

    #[inline]
    pub fn order(&self) -> usize {
        self.elements.len()
    }

    pub fn permutations(&self) -> &[Vec<u8>] {
        &self.permutations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Automorphism> {
        self.elements.iter()
    }

    /// Images of `v` under every group element, duplicates included.
    pub fn images(&self, v: u64) -> impl Iterator<Item = u64> + '_ {
        self.elements.iter().map(move |a| a.apply(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    #[test]
    fn permutation_table_sizes_and_distinct() {
        for d in 0..=MAX_DIM {
            let ps = permutations(d);
            assert_eq!(ps.len() as u64, factorial(d));
            let set: BTreeSet<_> = ps.iter().cloned().collect();
            assert_eq!(set.len(), ps.len());
            assert!(ps.iter().all(|p| p.len() == d as usize));
        }
        // first produced permutation is the identity
        assert_eq!(permutations(3)[0], vec![0, 1, 2]);
    }

    #[test]
    fn group_order_is_reflections_times_permutations() {
        let expected = [1usize, 2, 8, 48, 384, 3840];
        for d in 0..=MAX_DIM {
            assert_eq!(SymmetryGroup::new(d).unwrap().order(), expected[d as usize]);
        }
        assert!(SymmetryGroup::new(6).is_err());
    }

    #[test]
    fn identity_element_fixes_subsets() {
        let g = SymmetryGroup::new(3).unwrap();
        let id = &g.iter().next().unwrap();
        assert_eq!((id.reflection, id.perm), (0, 0));
        for v in [0u64, 1, 0b1010_0101, 0xff] {
            assert_eq!(id.apply(v), v);
        }
    }

    #[test]
    fn square_reflections_and_swap() {
        // d=2, labels 0..4; v = {0} = 0b0001
        let v = 0b0001;
        assert_eq!(apply(v, 2, 0b01, &[0, 1]), 0b0010);
        assert_eq!(apply(v, 2, 0b11, &[0, 1]), 0b1000);
        // {1} = 0b0010 under coordinate swap becomes {2}
        assert_eq!(apply(0b0010, 2, 0, &[1, 0]), 0b0100);
    }

    #[test]
    fn precomputed_matches_direct_apply() {
        let g = SymmetryGroup::new(3).unwrap();
        for a in g.iter() {
            let perm = &g.permutations()[a.perm];
            for v in [0b1100_0011u64, 0b0001_0110, 0b1110_1000] {
                assert_eq!(a.apply(v), apply(v, 3, a.reflection, perm));
            }
        }
    }

    #[test]
    fn every_vertex_maps_to_every_vertex() {
        let g = SymmetryGroup::new(3).unwrap();
        let hit: BTreeSet<u64> = g.images(1).collect();
        assert_eq!(hit.len(), 8);
        assert!(hit.iter().all(|w| w.count_ones() == 1));
    }

    proptest! {
        #[test]
        fn images_preserve_popcount(v in 0u64..(1 << 16)) {
            let g = SymmetryGroup::new(4).unwrap();
            for w in g.images(v) {
                prop_assert_eq!(w.count_ones(), v.count_ones());
                prop_assert!(w < (1 << 16));
            }
        }

        #[test]
        fn images_preserve_adjacency(a in 0u32..16, b in 0u32..16) {
            // {a,b} is an edge iff its image is an edge
            let g = SymmetryGroup::new(4).unwrap();
            let v = (1u64 << a) | (1u64 << b);
            let adjacent = (a ^ b).count_ones() == 1;
            for w in g.images(v) {
                if a == b {
                    prop_assert_eq!(w.count_ones(), 1);
                    continue;
                }
                let lo = w.trailing_zeros();
                let hi = 63 - w.leading_zeros();
                prop_assert_eq!((lo ^ hi).count_ones() == 1, adjacent);
            }
        }
    }
}
