//! Backtracking count of edge orientations meeting every vertex goal.
//!
//! Each step tries, in order:
//! 1. prune: some vertex has fewer unset edges than its remaining |goal| → 0;
//! 2. complete: no unset edge remains → 1;
//! 3. forced: some vertex needs all of its unset edges → set them all, recurse once;
//! 4. branch: lowest unset edge, both orientations, sum.
//!
//! Every mutation is undone before the step returns, so the model is left
//! exactly as it was passed in.

use super::types::{ConstraintModel, EdgeId, SearchCfg};

/// Number of ways to orient the model's unset edges so that every vertex goal is met.
pub fn count_sat(model: &mut ConstraintModel<'_>, cfg: SearchCfg) -> u64 {
    SatRunner::new(model, cfg).run().count
}

/// Same as `count_sat` and also reports how many search steps ran.
pub fn count_sat_with_stats(model: &mut ConstraintModel<'_>, cfg: SearchCfg) -> SearchStats {
    SatRunner::new(model, cfg).run()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub count: u64,
    pub nodes: u64,
    pub forced_steps: u64,
}

/// Runner carrying the borrowed model and counters.
struct SatRunner<'m, 'g> {
    model: &'m mut ConstraintModel<'g>,
    cfg: SearchCfg,
    nodes: u64,
    forced_steps: u64,
}

impl<'m, 'g> SatRunner<'m, 'g> {
    fn new(model: &'m mut ConstraintModel<'g>, cfg: SearchCfg) -> Self {
        Self {
            model,
            cfg,
            nodes: 0,
            forced_steps: 0,
        }
    }

    fn run(mut self) -> SearchStats {
        let count = self.recur();
        SearchStats {
            count,
            nodes: self.nodes,
            forced_steps: self.forced_steps,
        }
    }

    fn recur(&mut self) -> u64 {
        self.nodes += 1;
        if self.model.infeasible() {
            return 0;
        }
        let Some(e) = self.model.first_unset() else {
            return 1;
        };
        if self.cfg.propagate_forced {
            if let Some(v) = self.model.forced_vertex() {
                return self.recur_forced(v.0);
            }
        }
        self.model.assign(e, 1);
        let mut sum = self.recur();
        self.model.unassign(e);
        self.model.assign(e, -1);
        sum += self.recur();
        self.model.unassign(e);
        sum
    }

    /// Orient every unset edge at `v` toward its goal, recurse, then undo the batch.
    fn recur_forced(&mut self, v: usize) -> u64 {
        self.forced_steps += 1;
        let graph = self.model.graph;
        // effect each edge must have on goal[v]
        let dir = -self.model.goal[v].signum() as i8;
        let mut batch: Vec<EdgeId> = Vec::with_capacity(graph.d as usize);
        for inc in &graph.incidence[v] {
            if self.model.value[inc.edge.0] == 0 {
                self.model.assign(inc.edge, dir * inc.sign);
                batch.push(inc.edge);
            }
        }
        let sum = self.recur();
        for &e in batch.iter().rev() {
            self.model.unassign(e);
        }
        sum
    }
}
