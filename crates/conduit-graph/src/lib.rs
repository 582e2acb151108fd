//! conduit-graph
//!
//! Generic path-search primitives used by the conduit intent compilers:
//! - Immutable directed graph views (`Graph`, `Vertex`, `Edge`)
//! - Pluggable edge weighting (`EdgeWeigher`, unit cost by default)
//! - A shared search result that reconstructs paths from parent pointers
//! - Breadth-first and Dijkstra search strategies
//!
//! The crate performs no I/O and holds no global state. A graph is built once
//! and then only read; every search owns its own `SearchResult`.

pub mod bfs;
pub mod dijkstra;
pub mod errors;
pub mod graph;
pub mod result;
pub mod search;
pub mod weight;

pub use crate::bfs::BreadthFirstSearch;
pub use crate::dijkstra::DijkstraGraphSearch;
pub use crate::errors::{GraphError, GraphResult};
pub use crate::graph::{Edge, Graph, Vertex};
pub use crate::result::{Path, SearchResult};
pub use crate::search::{GraphPathSearch, SearchAlgorithm};
pub use crate::weight::{EdgeWeigher, UnitWeight};

/// Cost recorded for a vertex that has not been reached.
pub const UNREACHED: f64 = f64::MAX;

/// Convenience re-exports.
pub mod prelude {
    pub use crate::bfs::BreadthFirstSearch;
    pub use crate::dijkstra::DijkstraGraphSearch;
    pub use crate::graph::{Edge, Graph, Vertex};
    pub use crate::result::{Path, SearchResult};
    pub use crate::search::{GraphPathSearch, SearchAlgorithm};
    pub use crate::weight::{EdgeWeigher, UnitWeight};
    pub use crate::{GraphError, GraphResult, UNREACHED};
}
