//! Constraint graph shape, search against brute force, and the coloring-pair scan.

use super::*;
use proptest::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Enumerate all 2^e orientations and check the goals directly.
fn brute_force(graph: &ConstraintGraph, goals: &[i32]) -> u64 {
    let e = graph.edge_count();
    let mut count = 0;
    for mask in 0u64..(1 << e) {
        let mut g = goals.to_vec();
        for (i, &(lo, hi)) in graph.endpoints.iter().enumerate() {
            let x = if (mask >> i) & 1 == 1 { 1 } else { -1 };
            g[lo.0] += x;
            g[hi.0] -= x;
        }
        if g.iter().all(|&x| x == 0) {
            count += 1;
        }
    }
    count
}

fn dumb() -> SearchCfg {
    SearchCfg {
        propagate_forced: false,
    }
}

#[test]
fn graph_has_expected_edges_and_signs() {
    for d in 0..=4u32 {
        let g = build_graph(d).unwrap();
        let n = 1usize << d;
        assert_eq!(g.edge_count(), n * d as usize / 2);
        for (v, incs) in g.incidence.iter().enumerate() {
            assert_eq!(incs.len(), d as usize);
            for inc in incs {
                let (lo, hi) = g.endpoints[inc.edge.0];
                assert!(lo.0 == v || hi.0 == v);
                assert_eq!(inc.sign, if lo.0 == v { 1 } else { -1 });
            }
        }
        for (i, &(lo, hi)) in g.endpoints.iter().enumerate() {
            assert!(lo < hi);
            assert_eq!((lo.0 ^ hi.0).count_ones(), 1);
            assert_eq!(g.edge_between(lo, hi), Some(EdgeId(i)));
            assert_eq!(g.edge_between(hi, lo), Some(EdgeId(i)));
        }
    }
    let sq = build_graph(2).unwrap();
    assert_eq!(sq.edge_between(VertexId(0), VertexId(3)), None);
    assert_eq!(sq.edge_between(VertexId(0), VertexId(9)), None);
    // square edges in (i, j) order: 0-1, 0-2, 1-3, 2-3
    let ends: Vec<(usize, usize)> = sq.endpoints.iter().map(|(a, b)| (a.0, b.0)).collect();
    assert_eq!(ends, vec![(0, 1), (0, 2), (1, 3), (2, 3)]);
}

#[test]
fn square_with_zero_goals_has_two_orientations() {
    let g = build_graph(2).unwrap();
    let mut m = ConstraintModel::new(&g);
    for a in 0..16u32 {
        let b = !a & 0xf;
        let goals: Vec<i32> = (0..4).map(|k| boundary_side(a, k) + boundary_side(b, k)).collect();
        assert!(goals.iter().all(|&x| x == 0));
        assert_eq!(count_pair(&mut m, a, b, SearchCfg::default()), 2);
        assert_eq!(brute_force(&g, &goals), 2);
    }
}

#[test]
fn search_restores_model() {
    let g = build_graph(3).unwrap();
    let mut m = ConstraintModel::new(&g);
    let goals = [1, -1, -1, 1, -1, 1, 1, -1];
    m.set_goals(&goals);
    let before = (m.goals().to_vec(), m.values().to_vec(), m.unset_edges());
    let stats = count_sat_with_stats(&mut m, SearchCfg::default());
    assert_eq!(stats.count, 9);
    assert_eq!(stats.count, brute_force(&g, &goals));
    assert_eq!((m.goals().to_vec(), m.values().to_vec(), m.unset_edges()), before);
    assert!(m.slack.iter().all(|&s| s == 3));
}

#[test]
fn infeasible_goals_count_zero() {
    let g = build_graph(2).unwrap();
    let mut m = ConstraintModel::new(&g);
    m.set_goals(&[3, 0, 0, -3]);
    assert_eq!(count_sat(&mut m, SearchCfg::default()), 0);
    m.set_goals(&[2, 0, 0, 0]);
    assert_eq!(count_sat(&mut m, SearchCfg::default()), 0);
}

#[test]
fn forced_propagation_saves_steps() {
    let g = build_graph(3).unwrap();
    let mut m = ConstraintModel::new(&g);
    m.set_goals(&[3, -1, -1, 1, -1, 1, 1, -3]);
    let fast = count_sat_with_stats(&mut m, SearchCfg::default());
    let slow = count_sat_with_stats(&mut m, dumb());
    assert_eq!(fast.count, slow.count);
    assert_eq!(fast.count, 2);
    assert!(fast.forced_steps > 0);
    assert_eq!(slow.forced_steps, 0);
    assert!(fast.nodes <= slow.nodes);
}

#[test]
fn point_scan_matches_hand_result() {
    // d=0: a single vertex and no edges; only opposite colors cancel.
    let recs = sat_records(0, SatScanCfg::default()).unwrap();
    let triples: Vec<_> = recs.iter().map(|r| (r.coloring, r.fringe, r.count)).collect();
    assert_eq!(triples, vec![(0, 1, 1), (1, 0, 1)]);
}

#[test]
fn square_scan_matches_brute_force() {
    let g = build_graph(2).unwrap();
    let recs = sat_records(2, SatScanCfg::default()).unwrap();
    assert_eq!(recs.len(), 66);
    let head: Vec<_> = recs[..5].iter().map(|r| (r.coloring, r.fringe, r.count)).collect();
    assert_eq!(head, vec![(0, 15, 2), (1, 7, 1), (1, 11, 1), (1, 13, 1), (1, 14, 2)]);
    let mut expected = Vec::new();
    for a in 0..16u32 {
        for b in 0..16u32 {
            let goals: Vec<i32> = (0..4).map(|k| boundary_side(a, k) + boundary_side(b, k)).collect();
            let c = brute_force(&g, &goals);
            if c > 0 {
                expected.push((a, b, c));
            }
        }
    }
    let got: Vec<_> = recs.iter().map(|r| (r.coloring, r.fringe, r.count)).collect();
    assert_eq!(got, expected);
}

#[test]
fn serial_and_parallel_scans_agree() {
    let serial = SatScanCfg {
        parallel: false,
        ..SatScanCfg::default()
    };
    let parallel = SatScanCfg {
        batch: 3,
        ..SatScanCfg::default()
    };
    assert_eq!(
        sat_records(2, serial).unwrap(),
        sat_records(2, parallel).unwrap()
    );
}

#[test]
fn scan_rejects_odd_or_large_dimensions() {
    for d in [1u32, 3, 5, 6] {
        assert!(sat_records(d, SatScanCfg::default()).is_err());
    }
}

#[test]
fn tesseract_pairs_agree_with_plain_branching() {
    let g = build_graph(4).unwrap();
    let mut m = ConstraintModel::new(&g);
    // zero goals everywhere: the Eulerian orientations of the 4-cube itself
    assert_eq!(count_pair(&mut m, 0, 0xffff, SearchCfg::default()), 2970);
    let mut rng = StdRng::seed_from_u64(7);
    // the complementary pair has all-zero goals
    let mut pairs = vec![(0u32, 0xffffu32)];
    for _ in 0..4 {
        pairs.push((rng.gen_range(0..1 << 16), rng.gen_range(0..1 << 16)));
    }
    for (a, b) in pairs {
        let fast = count_pair(&mut m, a, b, SearchCfg::default());
        let slow = count_pair(&mut m, a, b, dumb());
        assert_eq!(fast, slow, "pair ({a}, {b})");
    }
}

proptest! {
    #[test]
    fn forced_search_equals_plain_search_and_brute_force(
        a in 0u32..256,
        b in 0u32..256,
    ) {
        let g = build_graph(3).unwrap();
        let mut m = ConstraintModel::new(&g);
        let goals: Vec<i32> = (0..8).map(|k| boundary_side(a, k) + boundary_side(b, k)).collect();
        let fast = count_pair(&mut m, a, b, SearchCfg::default());
        let slow = count_pair(&mut m, a, b, dumb());
        prop_assert_eq!(fast, slow);
        prop_assert_eq!(fast, brute_force(&g, &goals));
    }

    #[test]
    fn arbitrary_goals_match_brute_force(goals in prop::collection::vec(-3i32..=3, 8)) {
        let g = build_graph(3).unwrap();
        let mut m = ConstraintModel::new(&g);
        m.set_goals(&goals);
        let fast = count_sat(&mut m, SearchCfg::default());
        prop_assert_eq!(fast, count_sat(&mut m, dumb()));
        prop_assert_eq!(fast, brute_force(&g, &goals));
    }
}
