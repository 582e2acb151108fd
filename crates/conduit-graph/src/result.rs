//! Search result accumulator and path reconstruction.
//!
//! Both search strategies share one result type. During the search loop the
//! result only records, per vertex, the best known cumulative cost, the single
//! inbound edge that produced it and whether the vertex is finalized. Paths are
//! derived afterwards by `build_paths`, which walks the parent edges backwards.
//! Relaxation never touches paths.
//!
//! Storage is an arena: `records` holds one entry per reached vertex and
//! `index` maps a vertex to its slot. Slots are never removed.

use std::collections::BTreeMap;

use crate::graph::{Edge, Vertex};
use crate::weight::{weight_of, EdgeWeigher};
use crate::UNREACHED;

/// A path from a source to a destination.
///
/// Immutable once built. Empty when source and destination coincide.
#[derive(Debug, Clone, PartialEq)]
pub struct Path<V, E> {
    src: V,
    dst: V,
    edges: Vec<E>,
    cost: f64,
}

impl<V: Vertex, E: Edge<V>> Path<V, E> {
    pub fn new(src: V, dst: V, edges: Vec<E>, cost: f64) -> Self {
        Self {
            src,
            dst,
            edges,
            cost,
        }
    }

    pub fn src(&self) -> &V {
        &self.src
    }

    pub fn dst(&self) -> &V {
        &self.dst
    }

    pub fn edges(&self) -> &[E] {
        &self.edges
    }

    pub fn into_edges(self) -> Vec<E> {
        self.edges
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

#[derive(Debug, Clone)]
struct VertexRecord<V, E> {
    vertex: V,
    cost: f64,
    parent: Option<E>,
    finalized: bool,
}

/// Per-search accumulator of costs and parent edges.
#[derive(Debug, Clone)]
pub struct SearchResult<V: Vertex, E: Edge<V>> {
    src: V,
    dst: Option<V>,
    index: BTreeMap<V, usize>,
    records: Vec<VertexRecord<V, E>>,
    paths: Vec<Path<V, E>>,
}

impl<V: Vertex, E: Edge<V>> SearchResult<V, E> {
    /// Start a result for a search from `src`, optionally toward `dst`.
    ///
    /// With no destination, `build_paths` produces a path to every reached vertex.
    pub fn new(src: V, dst: Option<V>) -> Self {
        Self {
            src,
            dst,
            index: BTreeMap::new(),
            records: Vec::new(),
            paths: Vec::new(),
        }
    }

    pub fn src(&self) -> &V {
        &self.src
    }

    pub fn dst(&self) -> Option<&V> {
        self.dst.as_ref()
    }

    /// Record or overwrite the cost and inbound edge of `vertex`.
    pub fn update_vertex(&mut self, vertex: &V, edge: Option<E>, cost: f64, finalized: bool) {
        match self.index.get(vertex) {
            Some(&slot) => {
                let rec = &mut self.records[slot];
                rec.cost = cost;
                rec.parent = edge;
                rec.finalized = finalized;
            }
            None => {
                self.index.insert(vertex.clone(), self.records.len());
                self.records.push(VertexRecord {
                    vertex: vertex.clone(),
                    cost,
                    parent: edge,
                    finalized,
                });
            }
        }
    }

    /// Propose `base_cost + weight(edge)` for the edge's destination.
    ///
    /// The destination is updated only if it has no cost yet or the candidate is
    /// strictly cheaper; on a tie the earlier relaxation stays. A candidate of
    /// `UNREACHED` or more (an excluded edge) never records a cost. Returns true
    /// if the destination was updated.
    pub fn relax_edge(
        &mut self,
        edge: &E,
        base_cost: f64,
        weigher: Option<&dyn EdgeWeigher<E>>,
    ) -> bool {
        let candidate = base_cost + weight_of(weigher, edge);
        let dst = edge.dst();
        let improves = match self.index.get(dst) {
            Some(&slot) => candidate < self.records[slot].cost,
            None => candidate < UNREACHED,
        };
        if improves {
            self.update_vertex(dst, Some(edge.clone()), candidate, false);
        }
        improves
    }

    /// Mark a vertex as settled; its cost will no longer change.
    pub fn finalize(&mut self, vertex: &V) {
        if let Some(&slot) = self.index.get(vertex) {
            self.records[slot].finalized = true;
        }
    }

    /// Recorded cost of `vertex`, or `UNREACHED`.
    pub fn cost(&self, vertex: &V) -> f64 {
        self.index
            .get(vertex)
            .map(|&slot| self.records[slot].cost)
            .unwrap_or(UNREACHED)
    }

    pub fn has_cost(&self, vertex: &V) -> bool {
        self.index.contains_key(vertex)
    }

    pub fn is_finalized(&self, vertex: &V) -> bool {
        self.index
            .get(vertex)
            .map(|&slot| self.records[slot].finalized)
            .unwrap_or(false)
    }

    /// Inbound edge last used to reach `vertex`.
    pub fn parent(&self, vertex: &V) -> Option<&E> {
        self.index
            .get(vertex)
            .and_then(|&slot| self.records[slot].parent.as_ref())
    }

    /// Costs of all reached vertices, in vertex order.
    pub fn costs(&self) -> BTreeMap<V, f64> {
        self.index
            .iter()
            .map(|(v, &slot)| (v.clone(), self.records[slot].cost))
            .collect()
    }

    /// Rebuild the path set from the parent pointers.
    ///
    /// Call once after the search loop ends. Calling it again recomputes the
    /// same set.
    pub fn build_paths(&mut self) {
        let destinations: Vec<V> = match &self.dst {
            Some(d) => vec![d.clone()],
            None => self
                .records
                .iter()
                .map(|r| r.vertex.clone())
                .filter(|v| *v != self.src)
                .collect(),
        };

        let mut paths: Vec<Path<V, E>> = destinations
            .into_iter()
            .filter_map(|d| self.trace_back(&d))
            .collect();
        paths.sort_by(|a, b| a.dst.cmp(&b.dst));
        self.paths = paths;
    }

    // Walks parent edges from `dst` to the source. The walk is bounded by the
    // number of records so a corrupted parent chain cannot loop forever.
    fn trace_back(&self, dst: &V) -> Option<Path<V, E>> {
        let cost = self.cost(dst);
        if cost >= UNREACHED {
            return None;
        }
        if *dst == self.src {
            return Some(Path::new(self.src.clone(), dst.clone(), Vec::new(), cost));
        }

        let mut edges = Vec::new();
        let mut at = dst.clone();
        while at != self.src {
            if edges.len() > self.records.len() {
                tracing::debug!(?dst, "parent chain does not return to source");
                return None;
            }
            let edge = self.parent(&at)?.clone();
            at = edge.src().clone();
            edges.push(edge);
        }
        edges.reverse();

        Some(Path::new(self.src.clone(), dst.clone(), edges, cost))
    }

    /// Paths built by the last `build_paths` call, ordered by destination.
    pub fn paths(&self) -> &[Path<V, E>] {
        &self.paths
    }

    /// Built path ending at `dst`, if any.
    pub fn path_to(&self, dst: &V) -> Option<&Path<V, E>> {
        self.paths.iter().find(|p| p.dst == *dst)
    }

    /// First built path; the only one when a destination was given.
    pub fn first_path(&self) -> Option<&Path<V, E>> {
        self.paths.first()
    }

    pub fn into_paths(self) -> Vec<Path<V, E>> {
        self.paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::testing::{edge, weighted, TestEdge};

    #[test]
    fn unreached_cost_is_sentinel() {
        let r: SearchResult<char, TestEdge> = SearchResult::new('A', Some('B'));
        assert_eq!(r.cost(&'B'), UNREACHED);
        assert!(!r.has_cost(&'B'));
    }

    #[test]
    fn relax_updates_only_on_strict_improvement() {
        let mut r = SearchResult::new('A', None);
        r.update_vertex(&'A', None, 0.0, false);

        let first = edge('A', 'B', 2.0);
        let tie = edge('A', 'B', 2.0);
        let better = edge('A', 'B', 1.0);
        assert!(r.relax_edge(&first, 0.0, weighted()));
        assert!(!r.relax_edge(&tie, 0.0, weighted()));
        assert_eq!(r.parent(&'B'), Some(&first));

        assert!(r.relax_edge(&better, 0.0, weighted()));
        assert_eq!(r.cost(&'B'), 1.0);
        assert_eq!(r.parent(&'B'), Some(&better));

        let worse = edge('A', 'B', 5.0);
        assert!(!r.relax_edge(&worse, 0.0, weighted()));
        assert!(!r.relax_edge(&better, 0.5, weighted()));
        assert_eq!(r.cost(&'B'), 1.0);
        assert_eq!(r.parent(&'B'), Some(&better));
    }

    #[test]
    fn excluded_edge_never_reaches() {
        let mut r = SearchResult::new('A', None);
        r.update_vertex(&'A', None, 0.0, false);
        let blocked = |_: &TestEdge| f64::INFINITY;
        assert!(!r.relax_edge(&edge('A', 'B', 1.0), 0.0, Some(&blocked)));
        assert!(!r.has_cost(&'B'));
    }

    #[test]
    fn build_paths_walks_parents_backwards() {
        let mut r = SearchResult::new('A', Some('C'));
        r.update_vertex(&'A', None, 0.0, true);
        r.update_vertex(&'B', Some(edge('A', 'B', 1.0)), 1.0, true);
        r.update_vertex(&'C', Some(edge('B', 'C', 1.0)), 2.0, true);
        r.build_paths();

        let p = r.first_path().unwrap();
        assert_eq!(p.cost(), 2.0);
        let hops: Vec<(char, char)> = p.edges().iter().map(|e| (e.src, e.dst)).collect();
        assert_eq!(hops, vec![('A', 'B'), ('B', 'C')]);
    }

    #[test]
    fn build_paths_is_idempotent() {
        let mut r = SearchResult::new('A', None);
        r.update_vertex(&'A', None, 0.0, true);
        r.update_vertex(&'B', Some(edge('A', 'B', 1.0)), 1.0, true);
        r.update_vertex(&'C', Some(edge('A', 'C', 4.0)), 4.0, true);

        r.build_paths();
        let first = r.paths().to_vec();
        r.build_paths();
        assert_eq!(first, r.paths().to_vec());
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn source_destination_gives_empty_path() {
        let mut r: SearchResult<char, TestEdge> = SearchResult::new('A', Some('A'));
        r.update_vertex(&'A', None, 0.0, true);
        r.build_paths();
        let p = r.first_path().unwrap();
        assert!(p.is_empty());
        assert_eq!(p.cost(), 0.0);
    }

    #[test]
    fn unreachable_destination_has_no_path() {
        let mut r: SearchResult<char, TestEdge> = SearchResult::new('A', Some('Z'));
        r.update_vertex(&'A', None, 0.0, true);
        r.build_paths();
        assert!(r.paths().is_empty());
        assert!(r.path_to(&'Z').is_none());
    }
}
