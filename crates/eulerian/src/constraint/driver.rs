//! Exhaustive scan over pairs of opposite-face colorings.
//!
//! For every `(a, b)` in `[0, 2^n)²` the goals are set from the two colorings and
//! the orientations are counted; pairs with a nonzero count are emitted in
//! lexicographic `(a, b)` order. The parallel mode hands batches of outer
//! colorings to a rayon pool and emits each batch in order, so both modes
//! produce identical output.

use std::time::Instant;

use rayon::prelude::*;

use crate::error::{Error, Result, Stage};
use crate::records::SatRecord;

use super::build::build_graph;
use super::search::count_sat;
use super::types::{ConstraintGraph, ConstraintModel, SearchCfg};

/// Dimensions accepted by the scan.
pub const SAT_DIMS: [u32; 3] = [0, 2, 4];

#[derive(Clone, Copy, Debug)]
pub struct SatScanCfg {
    pub search: SearchCfg,
    pub parallel: bool,
    /// Outer colorings per parallel batch.
    pub batch: usize,
}

impl Default for SatScanCfg {
    fn default() -> Self {
        Self {
            search: SearchCfg::default(),
            parallel: true,
            batch: 64,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SatScanSummary {
    pub pairs: u64,
    pub feasible: u64,
}

/// Count orientations for one coloring pair. Leaves `model` unassigned.
pub fn count_pair(model: &mut ConstraintModel<'_>, a: u32, b: u32, cfg: SearchCfg) -> u64 {
    model.set_boundary(a, b);
    count_sat(model, cfg)
}

fn scan_row(
    model: &mut ConstraintModel<'_>,
    a: u32,
    colorings: u32,
    cfg: SearchCfg,
) -> Vec<SatRecord> {
    (0..colorings)
        .filter_map(|b| {
            let count = count_pair(model, a, b, cfg);
            (count > 0).then_some(SatRecord {
                coloring: a,
                fringe: b,
                count,
            })
        })
        .collect()
}

/// Run the full scan for dimension `d` and hand every feasible pair to `emit`.
pub fn sat_scan<F>(d: u32, cfg: SatScanCfg, mut emit: F) -> Result<SatScanSummary>
where
    F: FnMut(SatRecord) -> std::io::Result<()>,
{
    if !SAT_DIMS.contains(&d) {
        return Err(Error::dimension(Stage::Sat, d, "0, 2, 4"));
    }
    let graph = build_graph(d)?;
    let colorings = 1u32 << graph.vertex_count();
    let t0 = Instant::now();
    tracing::debug!(
        d,
        edges = graph.edge_count(),
        colorings,
        parallel = cfg.parallel,
        "sat scan"
    );
    let mut summary = SatScanSummary {
        pairs: colorings as u64 * colorings as u64,
        feasible: 0,
    };
    let mut emit_row = |row: Vec<SatRecord>, summary: &mut SatScanSummary| {
        summary.feasible += row.len() as u64;
        row.into_iter().try_for_each(&mut emit)
    };
    if cfg.parallel {
        let batch = cfg.batch.max(1) as u32;
        let mut start = 0u32;
        while start < colorings {
            let end = start.saturating_add(batch).min(colorings);
            let rows = parallel_rows(&graph, start..end, colorings, cfg.search);
            for row in rows {
                emit_row(row, &mut summary)?;
            }
            tracing::debug!(done = end, of = colorings, "sat batch");
            start = end;
        }
    } else {
        let mut model = ConstraintModel::new(&graph);
        for a in 0..colorings {
            let row = scan_row(&mut model, a, colorings, cfg.search);
            emit_row(row, &mut summary)?;
        }
    }
    tracing::info!(
        d,
        pairs = summary.pairs,
        feasible = summary.feasible,
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "sat scan done"
    );
    Ok(summary)
}

fn parallel_rows(
    graph: &ConstraintGraph,
    outer: std::ops::Range<u32>,
    colorings: u32,
    cfg: SearchCfg,
) -> Vec<Vec<SatRecord>> {
    outer
        .into_par_iter()
        .map_init(
            || ConstraintModel::new(graph),
            |model, a| scan_row(model, a, colorings, cfg),
        )
        .collect()
}

/// Collect every feasible record for dimension `d`.
pub fn sat_records(d: u32, cfg: SatScanCfg) -> Result<Vec<SatRecord>> {
    let mut out = Vec::new();
    sat_scan(d, cfg, |r| {
        out.push(r);
        Ok(())
    })?;
    Ok(out)
}
