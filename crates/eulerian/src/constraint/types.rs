//! Incidence structure of the d-cube and the live search state over it.
//!
//! Kept small and explicit so that `build` and `search` read easily.

/// Identifier types for clarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub usize);
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

/// One edge seen from one of its endpoints.
///
/// `sign` is +1 when the vertex is the smaller endpoint, −1 otherwise. Setting the
/// edge to value `x` moves that vertex's remaining goal by `sign * x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Incidence {
    pub edge: EdgeId,
    pub sign: i8,
}

/// Immutable incidence tables of the d-cube (vertices are constraints, edges are
/// binary variables). Built once per run.
#[derive(Clone, Debug)]
pub struct ConstraintGraph {
    pub d: u32,
    /// Dense n×n lookup; `None` unless the labels differ in exactly one bit.
    pub(super) pair_to_edge: Vec<Option<EdgeId>>,
    /// `(smaller, larger)` endpoint per edge.
    pub endpoints: Vec<(VertexId, VertexId)>,
    /// `d` incident edges per vertex, ascending by neighbor label.
    pub incidence: Vec<Vec<Incidence>>,
}

impl ConstraintGraph {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        1 << self.d
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.endpoints.len()
    }

    pub fn edge_between(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        let n = self.vertex_count();
        if a.0 >= n || b.0 >= n {
            return None;
        }
        self.pair_to_edge[a.0 * n + b.0]
    }
}

/// Search configuration.
#[derive(Clone, Copy, Debug)]
pub struct SearchCfg {
    /// Collapse forced edges into a single recursive step. Off yields the plain
    /// two-way branching search, kept for differential checks.
    pub propagate_forced: bool,
}

impl Default for SearchCfg {
    fn default() -> Self {
        Self {
            propagate_forced: true,
        }
    }
}

/// Live orientation state over a `ConstraintGraph`.
///
/// Invariants (between search steps):
/// - `slack[v]` is the number of unset edges at `v`.
/// - `goal[v]` is the signed degree still required at `v`; feasible only while
///   `slack[v] >= |goal[v]|`.
/// - `unset` is the number of edges with value 0.
#[derive(Clone, Debug)]
pub struct ConstraintModel<'g> {
    pub(super) graph: &'g ConstraintGraph,
    pub(super) value: Vec<i8>,
    pub(super) slack: Vec<i32>,
    pub(super) goal: Vec<i32>,
    pub(super) unset: usize,
}

impl<'g> ConstraintModel<'g> {
    /// Fresh model: every edge unset, every goal zero.
    pub fn new(graph: &'g ConstraintGraph) -> Self {
        let n = graph.vertex_count();
        Self {
            graph,
            value: vec![0; graph.edge_count()],
            slack: vec![graph.d as i32; n],
            goal: vec![0; n],
            unset: graph.edge_count(),
        }
    }

    pub fn graph(&self) -> &'g ConstraintGraph {
        self.graph
    }

    pub fn goals(&self) -> &[i32] {
        &self.goal
    }

    pub fn values(&self) -> &[i8] {
        &self.value
    }

    pub fn unset_edges(&self) -> usize {
        self.unset
    }

    /// Overwrite the per-vertex goals. Pre: no edge is assigned.
    pub fn set_goals(&mut self, goals: &[i32]) {
        debug_assert_eq!(goals.len(), self.goal.len());
        debug_assert_eq!(self.unset, self.value.len());
        self.goal.copy_from_slice(goals);
    }

    /// Goals induced by two opposite-face colorings: each coloring adds +1 at
    /// vertex `k` if its bit `k` is clear and −1 if it is set.
    pub fn set_boundary(&mut self, a: u32, b: u32) {
        debug_assert_eq!(self.unset, self.value.len());
        for (k, g) in self.goal.iter_mut().enumerate() {
            *g = boundary_side(a, k) + boundary_side(b, k);
        }
    }

    /// Set unset edge `e` to `x` (±1) and update both endpoints.
    #[inline]
    pub(super) fn assign(&mut self, e: EdgeId, x: i8) {
        debug_assert_eq!(self.value[e.0], 0);
        let (lo, hi) = self.graph.endpoints[e.0];
        self.value[e.0] = x;
        self.slack[lo.0] -= 1;
        self.slack[hi.0] -= 1;
        self.goal[lo.0] += x as i32;
        self.goal[hi.0] -= x as i32;
        self.unset -= 1;
    }

    /// Exact inverse of `assign`.
    #[inline]
    pub(super) fn unassign(&mut self, e: EdgeId) {
        let x = self.value[e.0];
        debug_assert_ne!(x, 0);
        let (lo, hi) = self.graph.endpoints[e.0];
        self.value[e.0] = 0;
        self.slack[lo.0] += 1;
        self.slack[hi.0] += 1;
        self.goal[lo.0] -= x as i32;
        self.goal[hi.0] += x as i32;
        self.unset += 1;
    }

    #[inline]
    pub(super) fn infeasible(&self) -> bool {
        self.slack
            .iter()
            .zip(&self.goal)
            .any(|(&s, &g)| s < g.abs())
    }

    /// First vertex whose remaining edges are all needed to reach its goal.
    #[inline]
    pub(super) fn forced_vertex(&self) -> Option<VertexId> {
        self.slack
            .iter()
            .zip(&self.goal)
            .position(|(&s, &g)| s != 0 && s == g.abs())
            .map(VertexId)
    }

    #[inline]
    pub(super) fn first_unset(&self) -> Option<EdgeId> {
        self.value.iter().position(|&x| x == 0).map(EdgeId)
    }
}

#[inline]
pub fn boundary_side(coloring: u32, k: usize) -> i32 {
    if (coloring >> k) & 1 == 0 {
        1
    } else {
        -1
    }
}
