//! Breadth-first search.
//!
//! Expands the graph one frontier at a time. A vertex takes the cost of its
//! first arrival and is finalized immediately; later arrivals are ignored even
//! if a weigher would make them cheaper. The search stops the moment the
//! destination is first reached. Edges weighing `UNREACHED` or more are not
//! traversed.

use std::collections::BTreeSet;

use crate::errors::GraphResult;
use crate::graph::{Edge, Graph, Vertex};
use crate::result::SearchResult;
use crate::search::{check_arguments, GraphPathSearch};
use crate::weight::{weight_of, EdgeWeigher};
use crate::UNREACHED;

/// Frontier-based search producing fewest-hop paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreadthFirstSearch;

impl<V: Vertex, E: Edge<V>> GraphPathSearch<V, E> for BreadthFirstSearch {
    fn search(
        &self,
        graph: &Graph<V, E>,
        src: &V,
        dst: Option<&V>,
        weigher: Option<&dyn EdgeWeigher<E>>,
    ) -> GraphResult<SearchResult<V, E>> {
        check_arguments(graph, src)?;

        let mut result = SearchResult::new(src.clone(), dst.cloned());
        result.update_vertex(src, None, 0.0, true);

        let mut reached_end = dst == Some(src);
        let mut frontier: BTreeSet<V> = BTreeSet::from([src.clone()]);

        while !reached_end && !frontier.is_empty() {
            let mut next = BTreeSet::new();

            'frontier: for vertex in &frontier {
                let cost = result.cost(vertex);
                for edge in graph.edges_from(vertex) {
                    let next_vertex = edge.dst();
                    if result.has_cost(next_vertex) {
                        continue;
                    }
                    let new_cost = cost + weight_of(weigher, edge);
                    if new_cost >= UNREACHED {
                        continue;
                    }
                    result.update_vertex(next_vertex, Some(edge.clone()), new_cost, true);
                    if dst == Some(next_vertex) {
                        reached_end = true;
                        break 'frontier;
                    }
                    next.insert(next_vertex.clone());
                }
            }

            frontier = next;
        }

        result.build_paths();
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::testing::{graph, weighted};

    #[test]
    fn line_graph_path() {
        let g = graph(&[('A', 'B', 1.0), ('B', 'C', 1.0)]);
        let r = BreadthFirstSearch.search(&g, &'A', Some(&'C'), None).unwrap();
        let p = r.first_path().unwrap();
        assert_eq!(p.cost(), 2.0);
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn fewest_hops_wins_over_cheaper_weights() {
        // A->C directly costs 10; A->B->C costs 2 but takes two hops.
        let g = graph(&[('A', 'C', 10.0), ('A', 'B', 1.0), ('B', 'C', 1.0)]);
        let r = BreadthFirstSearch.search(&g, &'A', Some(&'C'), weighted()).unwrap();
        let p = r.first_path().unwrap();
        assert_eq!(p.len(), 1);
        assert_eq!(p.cost(), 10.0);
    }

    #[test]
    fn stops_when_destination_first_reached() {
        let g = graph(&[('A', 'B', 1.0), ('B', 'C', 1.0), ('C', 'D', 1.0)]);
        let r = BreadthFirstSearch.search(&g, &'A', Some(&'B'), None).unwrap();
        assert!(!r.has_cost(&'C'));
        assert!(!r.has_cost(&'D'));
    }

    #[test]
    fn source_equals_destination() {
        let g = graph(&[('A', 'B', 1.0)]);
        let r = BreadthFirstSearch.search(&g, &'A', Some(&'A'), None).unwrap();
        let p = r.first_path().unwrap();
        assert!(p.is_empty());
        assert_eq!(p.cost(), 0.0);
        assert!(!r.has_cost(&'B'));
    }

    #[test]
    fn unreachable_destination() {
        let g = graph(&[('A', 'B', 1.0), ('C', 'D', 1.0)]);
        let r = BreadthFirstSearch.search(&g, &'A', Some(&'D'), None).unwrap();
        assert_eq!(r.cost(&'D'), UNREACHED);
        assert!(r.paths().is_empty());
    }

    #[test]
    fn excluded_edges_are_not_traversed() {
        let g = graph(&[('A', 'B', f64::INFINITY), ('A', 'C', 1.0), ('C', 'B', 1.0)]);
        let r = BreadthFirstSearch.search(&g, &'A', Some(&'B'), weighted()).unwrap();
        let p = r.first_path().unwrap();
        assert_eq!(p.len(), 2);
        assert_eq!(p.cost(), 2.0);
    }

    #[test]
    fn all_reachable_without_destination() {
        let g = graph(&[('A', 'B', 1.0), ('B', 'C', 1.0), ('A', 'D', 1.0), ('X', 'Y', 1.0)]);
        let r = BreadthFirstSearch.search(&g, &'A', None, None).unwrap();
        let dsts: Vec<char> = r.paths().iter().map(|p| *p.dst()).collect();
        assert_eq!(dsts, vec!['B', 'C', 'D']);
        assert_eq!(r.path_to(&'C').unwrap().cost(), 2.0);
    }
}
