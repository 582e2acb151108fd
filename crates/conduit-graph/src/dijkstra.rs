//! Dijkstra shortest-path search.
//!
//! Label-setting search over non-negative weights. The priority structure is a
//! binary heap with lazy decrease-key: whenever relaxation lowers a vertex's
//! cost the vertex is pushed again, and entries whose cost no longer matches
//! the result (or whose vertex is already settled) are skipped on extraction.
//!
//! Ties:
//! - among queued vertices of equal cost, the one queued first is settled first
//! - among equal-cost inbound edges, the first relaxation is kept
//!
//! Both rules make the reported path deterministic for a given graph and
//! edge order. Negative weights are not supported; results are undefined if a
//! weigher returns one.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::errors::GraphResult;
use crate::graph::{Edge, Graph, Vertex};
use crate::result::SearchResult;
use crate::search::{check_arguments, GraphPathSearch};
use crate::weight::EdgeWeigher;
use crate::UNREACHED;

/// Weighted shortest-path search.
#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraGraphSearch;

// Heap entry. `BinaryHeap` is a max-heap, so the ordering is reversed on both
// the cost and the insertion sequence.
#[derive(Debug)]
struct QueueEntry<V> {
    cost: f64,
    seq: u64,
    vertex: V,
}

impl<V> PartialEq for QueueEntry<V> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<V> Eq for QueueEntry<V> {}

impl<V> PartialOrd for QueueEntry<V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<V> Ord for QueueEntry<V> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

struct MinQueue<V> {
    heap: BinaryHeap<QueueEntry<V>>,
    next_seq: u64,
}

impl<V> MinQueue<V> {
    fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    fn push(&mut self, vertex: V, cost: f64) {
        self.heap.push(QueueEntry {
            cost,
            seq: self.next_seq,
            vertex,
        });
        self.next_seq += 1;
    }

    fn pop(&mut self) -> Option<QueueEntry<V>> {
        self.heap.pop()
    }
}

impl<V: Vertex, E: Edge<V>> GraphPathSearch<V, E> for DijkstraGraphSearch {
    fn search(
        &self,
        graph: &Graph<V, E>,
        src: &V,
        dst: Option<&V>,
        weigher: Option<&dyn EdgeWeigher<E>>,
    ) -> GraphResult<SearchResult<V, E>> {
        check_arguments(graph, src)?;

        let mut result = SearchResult::new(src.clone(), dst.cloned());
        result.update_vertex(src, None, 0.0, false);

        let mut queue = MinQueue::new();
        queue.push(src.clone(), 0.0);

        while let Some(entry) = queue.pop() {
            let nearest = entry.vertex;
            if result.is_finalized(&nearest) || entry.cost > result.cost(&nearest) {
                continue;
            }
            result.finalize(&nearest);

            if dst == Some(&nearest) {
                break;
            }

            let cost = result.cost(&nearest);
            if cost >= UNREACHED {
                break;
            }

            for edge in graph.edges_from(&nearest) {
                if result.is_finalized(edge.dst()) {
                    continue;
                }
                if result.relax_edge(edge, cost, weigher) {
                    let next = edge.dst();
                    queue.push(next.clone(), result.cost(next));
                }
            }
        }

        result.build_paths();
        Ok(result)
    }
}
