//! Immutable directed graph view.
//!
//! A `Graph` is a snapshot: vertices, edges and an index from each vertex to
//! its outgoing edges. It is built once and never mutated, so any number of
//! searches can read the same snapshot concurrently.
//!
//! Ordering:
//! - vertices are kept in a `BTreeMap`/`BTreeSet`, so iteration is stable
//! - outgoing edges keep their insertion order, which decides which of several
//!   equal-cost edges a search relaxes first

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;

/// A graph vertex.
///
/// Vertices are opaque identifiers. `Ord` is required so that every structure
/// keyed by vertex iterates deterministically.
pub trait Vertex: Clone + Ord + Debug {}

impl<T: Clone + Ord + Debug> Vertex for T {}

/// A directed graph edge.
///
/// Parallel edges between the same pair of vertices are allowed; edges are
/// told apart by their own metadata.
pub trait Edge<V: Vertex>: Clone + Debug {
    /// Vertex the edge leaves.
    fn src(&self) -> &V;

    /// Vertex the edge enters.
    fn dst(&self) -> &V;
}

/// Read-only directed graph.
#[derive(Debug, Clone)]
pub struct Graph<V: Vertex, E: Edge<V>> {
    vertices: BTreeSet<V>,
    edges: Vec<E>,
    outgoing: BTreeMap<V, Vec<E>>,
}

impl<V: Vertex, E: Edge<V>> Graph<V, E> {
    /// Build a graph from a vertex set and an edge list.
    ///
    /// Endpoints of every edge are added to the vertex set, so a graph can be
    /// built from edges alone.
    pub fn new(vertices: impl IntoIterator<Item = V>, edges: impl IntoIterator<Item = E>) -> Self {
        let mut vertices: BTreeSet<V> = vertices.into_iter().collect();
        let edges: Vec<E> = edges.into_iter().collect();
        let mut outgoing: BTreeMap<V, Vec<E>> = BTreeMap::new();

        for e in &edges {
            vertices.insert(e.src().clone());
            vertices.insert(e.dst().clone());
            outgoing.entry(e.src().clone()).or_default().push(e.clone());
        }

        Self {
            vertices,
            edges,
            outgoing,
        }
    }

    /// Build a graph from edges only.
    pub fn from_edges(edges: impl IntoIterator<Item = E>) -> Self {
        Self::new(std::iter::empty(), edges)
    }

    pub fn vertices(&self) -> &BTreeSet<V> {
        &self.vertices
    }

    pub fn edges(&self) -> &[E] {
        &self.edges
    }

    pub fn contains_vertex(&self, v: &V) -> bool {
        self.vertices.contains(v)
    }

    /// Edges leaving `v`. Unknown vertices have no edges.
    pub fn edges_from(&self, v: &V) -> &[E] {
        self.outgoing.get(v).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
