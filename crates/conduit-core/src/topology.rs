//! Topology access for the compilers.
//!
//! Compilers see the network through the `Topology` trait: a read-only device
//! graph plus device availability and domain membership. `TopologySnapshot`
//! is the in-memory implementation; callers that already hold a topology
//! store implement the trait over it.

use std::collections::{BTreeMap, BTreeSet};

use conduit_graph::{EdgeWeigher, Graph, GraphPathSearch, Path, SearchAlgorithm};

use crate::errors::IntentResult;
use crate::model::net::{DeviceId, Link};

pub type DeviceGraph = Graph<DeviceId, Link>;
pub type DevicePath = Path<DeviceId, Link>;

pub trait Topology: Send + Sync {
    fn graph(&self) -> &DeviceGraph;

    fn is_device_available(&self, device: &DeviceId) -> bool;

    /// Administrative domain of a device, if it belongs to one.
    fn device_domain(&self, device: &DeviceId) -> Option<&str>;

    /// Best path from `src` to `dst` under `weigher`. Devices missing from the
    /// graph have no path.
    fn path(
        &self,
        src: &DeviceId,
        dst: &DeviceId,
        weigher: &dyn EdgeWeigher<Link>,
        algorithm: SearchAlgorithm,
    ) -> IntentResult<Option<DevicePath>> {
        let graph = self.graph();
        if !graph.contains_vertex(src) || !graph.contains_vertex(dst) {
            return Ok(None);
        }
        let result = algorithm.search(graph, src, Some(dst), Some(weigher))?;
        Ok(result.into_paths().into_iter().next())
    }
}

/// Immutable in-memory topology.
#[derive(Debug, Clone)]
pub struct TopologySnapshot {
    graph: DeviceGraph,
    unavailable: BTreeSet<DeviceId>,
    domains: BTreeMap<DeviceId, String>,
}

impl TopologySnapshot {
    /// All devices available, no domains.
    pub fn new(
        devices: impl IntoIterator<Item = DeviceId>,
        links: impl IntoIterator<Item = Link>,
    ) -> Self {
        Self {
            graph: Graph::new(devices, links),
            unavailable: BTreeSet::new(),
            domains: BTreeMap::new(),
        }
    }

    pub fn from_links(links: impl IntoIterator<Item = Link>) -> Self {
        Self::new(std::iter::empty(), links)
    }

    pub fn with_unavailable(mut self, device: impl Into<DeviceId>) -> Self {
        self.unavailable.insert(device.into());
        self
    }

    pub fn with_domain(mut self, device: impl Into<DeviceId>, domain: impl Into<String>) -> Self {
        self.domains.insert(device.into(), domain.into());
        self
    }
}

impl Topology for TopologySnapshot {
    fn graph(&self) -> &DeviceGraph {
        &self.graph
    }

    fn is_device_available(&self, device: &DeviceId) -> bool {
        self.graph.contains_vertex(device) && !self.unavailable.contains(device)
    }

    fn device_domain(&self, device: &DeviceId) -> Option<&str> {
        self.domains.get(device).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use conduit_graph::UnitWeight;

    use super::*;
    use crate::model::net::ConnectPoint;

    fn link(a: &str, b: &str) -> Link {
        Link::new(ConnectPoint::new(a, 2), ConnectPoint::new(b, 1))
    }

    #[test]
    fn availability_and_domains() {
        let topo = TopologySnapshot::from_links([link("A", "B")])
            .with_unavailable("B")
            .with_domain("A", "east");
        assert!(topo.is_device_available(&"A".into()));
        assert!(!topo.is_device_available(&"B".into()));
        assert!(!topo.is_device_available(&"Z".into()));
        assert_eq!(topo.device_domain(&"A".into()), Some("east"));
        assert_eq!(topo.device_domain(&"B".into()), None);
    }

    #[test]
    fn path_between_known_devices() {
        let topo = TopologySnapshot::from_links([link("A", "B"), link("B", "C")]);
        let path = topo
            .path(&"A".into(), &"C".into(), &UnitWeight, SearchAlgorithm::Dijkstra)
            .unwrap()
            .unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path.cost(), 2.0);
    }

    #[test]
    fn unknown_device_has_no_path() {
        let topo = TopologySnapshot::from_links([link("A", "B")]);
        let none = topo
            .path(&"Q".into(), &"B".into(), &UnitWeight, SearchAlgorithm::BreadthFirst)
            .unwrap();
        assert!(none.is_none());
    }
}
