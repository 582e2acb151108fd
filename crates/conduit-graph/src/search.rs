//! Search strategy seam.
//!
//! The strategies form a small closed set, so callers that pick one at runtime
//! use `SearchAlgorithm`; code that is generic over the strategy uses the
//! `GraphPathSearch` trait directly.

use crate::bfs::BreadthFirstSearch;
use crate::dijkstra::DijkstraGraphSearch;
use crate::errors::{GraphError, GraphResult};
use crate::graph::{Edge, Graph, Vertex};
use crate::result::SearchResult;
use crate::weight::EdgeWeigher;

/// A path search over a graph.
pub trait GraphPathSearch<V: Vertex, E: Edge<V>> {
    /// Search from `src`, toward `dst` when given or toward every reachable
    /// vertex otherwise. The returned result already has its paths built.
    fn search(
        &self,
        graph: &Graph<V, E>,
        src: &V,
        dst: Option<&V>,
        weigher: Option<&dyn EdgeWeigher<E>>,
    ) -> GraphResult<SearchResult<V, E>>;
}

/// Reject searches whose source is not part of the graph.
pub fn check_arguments<V: Vertex, E: Edge<V>>(graph: &Graph<V, E>, src: &V) -> GraphResult<()> {
    if !graph.contains_vertex(src) {
        return Err(GraphError::invalid_argument(format!(
            "source {src:?} is not in the graph"
        )));
    }
    Ok(())
}

/// Runtime choice of search strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum SearchAlgorithm {
    /// Weighted shortest path.
    #[default]
    Dijkstra,
    /// Fewest hops; weights accumulate but never reorder the frontier.
    BreadthFirst,
}

impl<V: Vertex, E: Edge<V>> GraphPathSearch<V, E> for SearchAlgorithm {
    fn search(
        &self,
        graph: &Graph<V, E>,
        src: &V,
        dst: Option<&V>,
        weigher: Option<&dyn EdgeWeigher<E>>,
    ) -> GraphResult<SearchResult<V, E>> {
        match self {
            Self::Dijkstra => DijkstraGraphSearch.search(graph, src, dst, weigher),
            Self::BreadthFirst => BreadthFirstSearch.search(graph, src, dst, weigher),
        }
    }
}
