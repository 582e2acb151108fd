//! Network and intent data models.
//!
//! - `net`: devices, ports, connection points, links
//! - `traffic`: selectors and treatments, carried opaquely
//! - `intent`: requests, keys, constraints
//! - `link_collection`: the compiled `LinkCollectionIntent`
//!
//! Models are plain data with serde support. Policy (limits, weighting,
//! failure handling) lives in `crate::compiler`.

pub mod intent;
pub mod link_collection;
pub mod net;
pub mod traffic;

pub use intent::{ApplicationId, Constraint, EncapsulationType, IntentRequest, Key, ResourceGroup};
pub use link_collection::{LinkCollectionIntent, LinkCollectionParams, NetworkResource};
pub use net::{
    ConnectPoint, DeviceId, FilteredConnectPoint, Link, LinkAnnotations, LinkState, LinkType,
    PortNumber,
};
pub use traffic::{Criterion, Instruction, TrafficSelector, TrafficTreatment};
