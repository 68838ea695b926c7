//! Constraint graph construction: consistent edge numbering and incidence tables.

use crate::error::{Error, Result, Stage};
use crate::symmetry::MAX_DIM;

use super::types::{ConstraintGraph, EdgeId, Incidence, VertexId};

/// Build the d-cube's incidence tables.
///
/// Edge ids are assigned in order of `(i, j)`, `i < j`, over vertex pairs at
/// Hamming distance 1, so there are exactly `2^d · d / 2` edges.
pub fn build_graph(d: u32) -> Result<ConstraintGraph> {
    if d > MAX_DIM {
        return Err(Error::dimension(Stage::Sat, d, "0..=5"));
    }
    let n = 1usize << d;
    let mut pair_to_edge = vec![None; n * n];
    let mut endpoints = Vec::with_capacity(n * d as usize / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            if (i ^ j).count_ones() == 1 {
                let id = EdgeId(endpoints.len());
                pair_to_edge[i * n + j] = Some(id);
                pair_to_edge[j * n + i] = Some(id);
                endpoints.push((VertexId(i), VertexId(j)));
            }
        }
    }
    let incidence = (0..n)
        .map(|i| {
            (0..n)
                .filter_map(|j| {
                    pair_to_edge[i * n + j].map(|edge| Incidence {
                        edge,
                        sign: if i < j { 1 } else { -1 },
                    })
                })
                .collect()
        })
        .collect();
    Ok(ConstraintGraph {
        d,
        pair_to_edge,
        endpoints,
        incidence,
    })
}
