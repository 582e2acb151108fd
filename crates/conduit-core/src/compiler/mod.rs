//! Intent compilation.
//!
//! Turns an `IntentRequest` into a `LinkCollectionIntent`:
//! - requests with an egress point go to `LinkCollectionCompiler`, which
//!   computes one path per ingress point and merges them into a tree
//!   converging on the egress device
//! - requests without one go to `FirewallIntentCompiler`, which drops the
//!   selected traffic at the ingress points and searches nothing
//!
//! Compilers are stateless. A compilation depends only on the request, the
//! topology snapshot in the context and the configuration; the bandwidth
//! allocator is its only side effect. Independent requests can therefore be
//! compiled concurrently with `compile_all`.
//!
//! Every compilation returns a `CompileReport`: the intent plus diagnostics
//! and stats for presentation.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::{validate_config, CompilerConfig};
use crate::errors::IntentResult;
use crate::model::intent::IntentRequest;
use crate::model::link_collection::LinkCollectionIntent;
use crate::resource::BandwidthAllocator;
use crate::topology::Topology;

pub mod firewall;
pub mod link_collection;
pub mod weigher;

pub use firewall::FirewallIntentCompiler;
pub use link_collection::LinkCollectionCompiler;
pub use weigher::ConstraintWeigher;

/// Collaborators and settings shared by every compilation.
#[derive(Clone, Copy)]
pub struct CompileContext<'a> {
    pub topology: &'a dyn Topology,
    pub allocator: Option<&'a dyn BandwidthAllocator>,
    pub config: &'a CompilerConfig,
}

impl<'a> CompileContext<'a> {
    pub fn new(topology: &'a dyn Topology, config: &'a CompilerConfig) -> Self {
        Self {
            topology,
            allocator: None,
            config,
        }
    }

    pub fn with_allocator(mut self, allocator: &'a dyn BandwidthAllocator) -> Self {
        self.allocator = Some(allocator);
        self
    }

    /// Configuration and request checks shared by all compilers.
    pub fn check(&self, request: &IntentRequest) -> IntentResult<()> {
        validate_config(self.config)?;
        request.validate(&self.config.limits)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Info,
    Warning,
}

/// A structured note emitted during compilation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompileDiagnostic {
    pub level: DiagnosticLevel,
    pub code: String,
    pub message: String,
    pub data: BTreeMap<String, String>,
}

/// Diagnostics collected over one compilation.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<CompileDiagnostic>,
}

impl Diagnostics {
    fn push(
        &mut self,
        level: DiagnosticLevel,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> &mut CompileDiagnostic {
        self.items.push(CompileDiagnostic {
            level,
            code: code.into(),
            message: message.into(),
            data: BTreeMap::new(),
        });
        let last = self.items.len() - 1;
        &mut self.items[last]
    }

    pub fn push_info(
        &mut self,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> &mut CompileDiagnostic {
        self.push(DiagnosticLevel::Info, code, message)
    }

    pub fn push_warning(
        &mut self,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> &mut CompileDiagnostic {
        self.push(DiagnosticLevel::Warning, code, message)
    }

    pub fn into_vec(self) -> Vec<CompileDiagnostic> {
        self.items
    }
}

impl CompileDiagnostic {
    pub fn with_data(&mut self, k: impl Into<String>, v: impl Into<String>) -> &mut Self {
        self.data.insert(k.into(), v.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompileStats {
    pub ingress_points: usize,
    pub connected: usize,
    pub missing: usize,
    pub links: usize,
}

/// Compiled intent plus diagnostics and stats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompileReport {
    pub intent: LinkCollectionIntent,
    pub diagnostics: Vec<CompileDiagnostic>,
    pub stats: CompileStats,
}

impl CompileReport {
    pub fn warnings(&self) -> impl Iterator<Item = &CompileDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Warning)
    }
}

/// A compiler from requests to link collections.
pub trait IntentCompiler {
    fn compile(
        &self,
        request: &IntentRequest,
        ctx: &CompileContext<'_>,
    ) -> IntentResult<CompileReport>;
}

/// Compile one request with the compiler its shape calls for: forwarding when
/// an egress point is present, drop-only otherwise.
pub fn compile_intent(
    request: &IntentRequest,
    ctx: &CompileContext<'_>,
) -> IntentResult<CompileReport> {
    if request.egress_point.is_some() {
        LinkCollectionCompiler.compile(request, ctx)
    } else {
        FirewallIntentCompiler.compile(request, ctx)
    }
}

/// Compile independent requests. Results keep the order of `requests`.
#[cfg(feature = "parallel")]
pub fn compile_all(
    requests: &[IntentRequest],
    ctx: &CompileContext<'_>,
) -> Vec<IntentResult<CompileReport>> {
    use rayon::prelude::*;

    requests.par_iter().map(|r| compile_intent(r, ctx)).collect()
}

/// Compile independent requests. Results keep the order of `requests`.
#[cfg(not(feature = "parallel"))]
pub fn compile_all(
    requests: &[IntentRequest],
    ctx: &CompileContext<'_>,
) -> Vec<IntentResult<CompileReport>> {
    requests.iter().map(|r| compile_intent(r, ctx)).collect()
}


#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::testing::*;
    use super::*;
    use crate::errors::IntentError;

    #[test]
    fn dispatch_by_egress_presence() {
        let topo = topo(&[("A", "B")]);
        let cfg = CompilerConfig::default();
        let ctx = CompileContext::new(&topo, &cfg);

        let fwd = IntentRequest::forwarding(app(), [host("A")], host("B"));
        let r = compile_intent(&fwd, &ctx).unwrap();
        assert!(!r.intent.is_filter_intent());
        assert_eq!(r.intent.links().len(), 1);

        let fw = IntentRequest::firewall(app(), [host("A")]);
        let r = compile_intent(&fw, &ctx).unwrap();
        assert!(r.intent.is_filter_intent());
        assert!(r.intent.links().is_empty());
    }

    #[test]
    fn invalid_config_rejected_before_search() {
        let topo = topo(&[("A", "B")]);
        let cfg = CompilerConfig::default().with_default_link_cost(-1.0);
        let ctx = CompileContext::new(&topo, &cfg);
        let req = IntentRequest::forwarding(app(), [host("A")], host("B"));
        assert_matches!(compile_intent(&req, &ctx), Err(IntentError::InvalidArgument(_)));
    }

    #[test]
    fn compile_all_keeps_order() {
        let topo = topo(&[("A", "C"), ("B", "C")]);
        let cfg = CompilerConfig::default();
        let ctx = CompileContext::new(&topo, &cfg);
        let reqs = vec![
            IntentRequest::forwarding(app(), [host("A")], host("C")),
            IntentRequest::forwarding(app(), [host("Z")], host("C")),
            IntentRequest::firewall(app(), [host("B")]),
        ];
        let out = compile_all(&reqs, &ctx);
        assert_eq!(out.len(), 3);
        assert!(out[0].is_ok());
        assert_matches!(out[1], Err(IntentError::NoConnectivity(_)));
        assert!(out[2].as_ref().unwrap().intent.is_filter_intent());
    }
}
