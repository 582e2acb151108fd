//! conduit-core
//!
//! Intent compilation on top of `conduit-graph`:
//! - network and intent models (`model`)
//! - topology access (`topology`) and bandwidth reservation (`resource`)
//! - constraint-driven weighting and the forwarding / drop-only compilers (`compiler`)
//! - explicit configuration (`config`) and typed errors (`errors`)
//!
//! The crate performs no I/O and installs no tracing subscriber.

pub mod compiler;
pub mod config;
pub mod errors;
pub mod hashing;
pub mod model;
pub mod resource;
pub mod topology;

pub use crate::errors::{IntentError, IntentResult};

/// Domain separation labels for hashing. These must remain stable.
pub mod domain {
    pub const INTENT_KEY: &str = "conduit.v1.intent-key";
    pub const PATH_TIE_BREAK: &str = "conduit.v1.path-tie-break";
}

pub mod defaults {
    /// Cost recorded on every compiled link collection.
    pub const LINK_COLLECTION_COST: f64 = 1.0;
    pub const INTENT_PRIORITY: u32 = 100;
}

/// Convenience re-exports.
pub mod prelude {
    pub use crate::compiler::{
        compile_all, compile_intent, CompileContext, CompileDiagnostic, CompileReport,
        CompileStats, DiagnosticLevel, FirewallIntentCompiler, IntentCompiler,
        LinkCollectionCompiler,
    };
    pub use crate::config::{validate_config, CompilerConfig, LimitsConfig};
    pub use crate::model::{
        ApplicationId, ConnectPoint, Constraint, Criterion, DeviceId, EncapsulationType,
        FilteredConnectPoint, Instruction, IntentRequest, Key, Link, LinkCollectionIntent,
        LinkCollectionParams, LinkState, LinkType, NetworkResource, PortNumber, ResourceGroup,
        TrafficSelector, TrafficTreatment,
    };
    pub use crate::resource::{BandwidthAllocator, LocalBandwidthPool};
    pub use crate::topology::{Topology, TopologySnapshot};
    pub use crate::{IntentError, IntentResult};
    pub use conduit_graph::SearchAlgorithm;
}
