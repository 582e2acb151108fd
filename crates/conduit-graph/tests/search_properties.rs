//! search_properties.rs
//!
//! Property tests over random small graphs:
//! - Dijkstra cost equals BFS hop count under unit weights
//! - every reconstructed path sums to the recorded cost of its destination
//! - recorded costs satisfy the relaxation bound on every edge
//! - `build_paths` is idempotent

use proptest::prelude::*;

use conduit_graph::prelude::*;

#[derive(Debug, Clone, PartialEq)]
struct Hop {
    src: u8,
    dst: u8,
    weight: f64,
}

impl Edge<u8> for Hop {
    fn src(&self) -> &u8 {
        &self.src
    }
    fn dst(&self) -> &u8 {
        &self.dst
    }
}

struct HopWeight;

impl EdgeWeigher<Hop> for HopWeight {
    fn weight(&self, e: &Hop) -> f64 {
        e.weight
    }
}

fn arb_graph() -> impl Strategy<Value = Graph<u8, Hop>> {
    (2u8..10).prop_flat_map(|n| {
        prop::collection::vec((0..n, 0..n, 0u32..20), 0..40).prop_map(move |raw| {
            let hops = raw.into_iter().map(|(s, d, w)| Hop {
                src: s,
                dst: d,
                weight: f64::from(w),
            });
            Graph::new(0..n, hops)
        })
    })
}

proptest! {
    #[test]
    fn dijkstra_matches_bfs_hop_count(g in arb_graph(), dst in 0u8..10) {
        let d = DijkstraGraphSearch.search(&g, &0, Some(&dst), None).unwrap();
        let b = BreadthFirstSearch.search(&g, &0, Some(&dst), None).unwrap();
        prop_assert_eq!(d.cost(&dst), b.cost(&dst));
        prop_assert_eq!(d.paths().len(), b.paths().len());
    }

    #[test]
    fn path_weights_sum_to_recorded_cost(g in arb_graph()) {
        let r = DijkstraGraphSearch.search(&g, &0, None, Some(&HopWeight)).unwrap();
        for path in r.paths() {
            let sum: f64 = path.edges().iter().map(|e| e.weight).sum();
            prop_assert_eq!(sum, r.cost(path.dst()));
            prop_assert_eq!(path.cost(), r.cost(path.dst()));
            prop_assert_eq!(path.edges().first().map(|e| e.src), Some(0));
        }
    }

    #[test]
    fn recorded_costs_respect_every_edge(g in arb_graph()) {
        let r = DijkstraGraphSearch.search(&g, &0, None, Some(&HopWeight)).unwrap();
        for e in g.edges() {
            if r.has_cost(&e.src) {
                prop_assert!(r.cost(&e.dst) <= r.cost(&e.src) + e.weight);
            }
        }
    }

    #[test]
    fn build_paths_is_idempotent(g in arb_graph()) {
        let mut r = DijkstraGraphSearch.search(&g, &0, None, Some(&HopWeight)).unwrap();
        let before = r.paths().to_vec();
        r.build_paths();
        prop_assert_eq!(before, r.paths().to_vec());
    }
}

#[test]
fn scenario_line_graph_both_strategies() {
    let g = Graph::from_edges([
        Hop { src: 1, dst: 2, weight: 1.0 },
        Hop { src: 2, dst: 3, weight: 1.0 },
    ]);

    for alg in [SearchAlgorithm::BreadthFirst, SearchAlgorithm::Dijkstra] {
        let r = alg.search(&g, &1, Some(&3), Some(&HopWeight)).unwrap();
        let p = r.first_path().unwrap();
        assert_eq!(p.cost(), 2.0);
        let hops: Vec<(u8, u8)> = p.edges().iter().map(|e| (e.src, e.dst)).collect();
        assert_eq!(hops, vec![(1, 2), (2, 3)]);
    }
}
