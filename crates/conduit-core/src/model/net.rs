//! Network element identifiers and links.
//!
//! A `Link` connects two connection points. For path computation the graph is
//! built over devices, so `Link` implements `Edge<DeviceId>` through the
//! devices of its endpoints; the ports stay attached as edge metadata.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use conduit_graph::Edge;
use serde::{Deserialize, Serialize};

use crate::errors::{IntentError, IntentResult};
use crate::model::traffic::TrafficSelector;

/// Opaque device identifier, e.g. `of:0000000000000001`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DeviceId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for DeviceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortNumber(u64);

impl PortNumber {
    pub fn new(n: u64) -> Self {
        Self(n)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PortNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A (device, port) pair: where traffic enters or leaves the network.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConnectPoint {
    device: DeviceId,
    port: PortNumber,
}

impl ConnectPoint {
    pub fn new(device: impl Into<DeviceId>, port: u64) -> Self {
        Self {
            device: device.into(),
            port: PortNumber::new(port),
        }
    }

    /// Parse the `device/port` form. The device part may itself contain `/`;
    /// only the last separator counts.
    pub fn parse(s: &str) -> IntentResult<Self> {
        let (device, port) = s.rsplit_once('/').ok_or_else(|| {
            IntentError::invalid_argument(format!("connect point must be device/port: {s}"))
        })?;
        if device.is_empty() {
            return Err(IntentError::invalid_argument(format!(
                "connect point has an empty device: {s}"
            )));
        }
        let port: u64 = port.parse().map_err(|_| {
            IntentError::invalid_argument(format!("connect point has a bad port number: {s}"))
        })?;
        Ok(Self::new(device, port))
    }

    pub fn device(&self) -> &DeviceId {
        &self.device
    }

    pub fn port(&self) -> PortNumber {
        self.port
    }
}

impl fmt::Display for ConnectPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.device, self.port)
    }
}

/// A connection point plus the traffic it admits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FilteredConnectPoint {
    connect_point: ConnectPoint,
    #[serde(default)]
    selector: TrafficSelector,
}

impl FilteredConnectPoint {
    pub fn new(connect_point: ConnectPoint) -> Self {
        Self {
            connect_point,
            selector: TrafficSelector::default(),
        }
    }

    pub fn with_selector(mut self, selector: TrafficSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn connect_point(&self) -> &ConnectPoint {
        &self.connect_point
    }

    pub fn selector(&self) -> &TrafficSelector {
        &self.selector
    }
}

impl From<ConnectPoint> for FilteredConnectPoint {
    fn from(cp: ConnectPoint) -> Self {
        Self::new(cp)
    }
}

impl fmt::Display for FilteredConnectPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.selector.is_empty() {
            write!(f, "{}", self.connect_point)
        } else {
            write!(f, "{}[{}]", self.connect_point, self.selector)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    #[default]
    Direct,
    Indirect,
    Edge,
    Tunnel,
    Optical,
    Virtual,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkState {
    #[default]
    Active,
    Inactive,
}

/// Optional per-link measurements used by constraint weighting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkAnnotations {
    pub metric: Option<f64>,
    pub latency_micros: Option<u64>,
    pub available_bandwidth_bps: Option<u64>,
}

/// Directed infrastructure link between two connection points.
///
/// Identity is `(src, dst, link_type)`: state and annotations describe the
/// link but do not distinguish it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    src: ConnectPoint,
    dst: ConnectPoint,
    #[serde(default)]
    link_type: LinkType,
    #[serde(default)]
    state: LinkState,
    #[serde(default)]
    annotations: LinkAnnotations,
}

impl Link {
    /// An active direct link.
    pub fn new(src: ConnectPoint, dst: ConnectPoint) -> Self {
        Self {
            src,
            dst,
            link_type: LinkType::Direct,
            state: LinkState::Active,
            annotations: LinkAnnotations::default(),
        }
    }

    pub fn with_type(mut self, link_type: LinkType) -> Self {
        self.link_type = link_type;
        self
    }

    pub fn with_state(mut self, state: LinkState) -> Self {
        self.state = state;
        self
    }

    pub fn with_metric(mut self, metric: f64) -> Self {
        self.annotations.metric = Some(metric);
        self
    }

    pub fn with_latency_micros(mut self, latency: u64) -> Self {
        self.annotations.latency_micros = Some(latency);
        self
    }

    pub fn with_available_bandwidth(mut self, bps: u64) -> Self {
        self.annotations.available_bandwidth_bps = Some(bps);
        self
    }

    pub fn src(&self) -> &ConnectPoint {
        &self.src
    }

    pub fn dst(&self) -> &ConnectPoint {
        &self.dst
    }

    pub fn link_type(&self) -> LinkType {
        self.link_type
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == LinkState::Active
    }

    pub fn annotations(&self) -> &LinkAnnotations {
        &self.annotations
    }

    fn identity(&self) -> (&ConnectPoint, &ConnectPoint, LinkType) {
        (&self.src, &self.dst, self.link_type)
    }
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Link {}

impl PartialOrd for Link {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Link {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity().cmp(&other.identity())
    }
}

impl Hash for Link {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl Edge<DeviceId> for Link {
    fn src(&self) -> &DeviceId {
        self.src.device()
    }

    fn dst(&self) -> &DeviceId {
        self.dst.device()
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.src, self.dst)
    }
}
