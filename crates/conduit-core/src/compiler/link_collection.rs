//! Multi-point to single-point compilation.
//!
//! One path is computed per ingress device toward the egress device and the
//! paths are merged into a tree converging on the egress device. The tree maps
//! every device to the one link it forwards on, keyed by the link's upstream
//! device. Merging walks a path from the ingress side and stops at the first
//! link whose downstream device already forwards: from there on the existing
//! tree already reaches the egress. The first path to claim a device keeps it.
//!
//! Failure handling:
//! - no ingress connected: `NoConnectivity`
//! - some ingress points missing: `PartialConnectivity`, unless the request
//!   carries a partial-failure constraint, in which case the tree covers the
//!   connected ones and a warning is recorded
//! - bandwidth that cannot be reserved: `ResourceAllocation`

use std::collections::{BTreeMap, BTreeSet};

use conduit_graph::Edge;
use tracing::{debug, info, warn};

use crate::compiler::{
    CompileContext, CompileReport, CompileStats, ConstraintWeigher, Diagnostics, IntentCompiler,
};
use crate::errors::{IntentError, IntentResult};
use crate::model::intent::IntentRequest;
use crate::model::link_collection::{LinkCollectionIntent, LinkCollectionParams};
use crate::model::net::{ConnectPoint, DeviceId, FilteredConnectPoint, Link};

#[derive(Debug, Clone, Copy, Default)]
pub struct LinkCollectionCompiler;

/// Forwarding tree under construction: device to the link it forwards on.
#[derive(Debug, Default)]
pub(crate) struct LinkTree {
    links: BTreeMap<DeviceId, Link>,
}

impl LinkTree {
    pub(crate) fn forwards(&self, device: &DeviceId) -> bool {
        self.links.contains_key(device)
    }

    /// Add `path` (ordered ingress to egress) up to its merge point.
    /// Returns the number of links added.
    pub(crate) fn merge(&mut self, path: &[Link]) -> IntentResult<usize> {
        let mut added = 0;
        for link in path {
            let src = Edge::src(link);
            if self.links.contains_key(src) {
                return Err(IntentError::invariant(format!(
                    "device {src} already forwards; path merged past its merge point"
                )));
            }
            self.links.insert(src.clone(), link.clone());
            added += 1;
            if self.forwards(Edge::dst(link)) {
                break;
            }
        }
        Ok(added)
    }

    pub(crate) fn len(&self) -> usize {
        self.links.len()
    }

    pub(crate) fn into_links(self) -> BTreeSet<Link> {
        self.links.into_values().collect()
    }
}

impl LinkCollectionCompiler {
    /// Connect one ingress point. `Ok(None)` means connected; `Ok(Some(reason))`
    /// means the ingress point is missing.
    fn connect(
        &self,
        ingress: &FilteredConnectPoint,
        egress_device: &DeviceId,
        weigher: &ConstraintWeigher<'_>,
        tree: &mut LinkTree,
        ctx: &CompileContext<'_>,
    ) -> IntentResult<Option<String>> {
        let device = ingress.connect_point().device();

        if device == egress_device {
            return Ok(if ctx.topology.is_device_available(device) {
                None
            } else {
                Some(format!("device {device} is unavailable"))
            });
        }

        if tree.forwards(device) {
            debug!(ingress = %ingress.connect_point(), "ingress already on the tree");
            return Ok(None);
        }

        let Some(path) = ctx
            .topology
            .path(device, egress_device, weigher, ctx.config.search)?
        else {
            return Ok(Some(format!("no path from {device} to {egress_device}")));
        };

        if let Err(reason) = weigher.check_path(&path) {
            return Ok(Some(reason));
        }

        let added = tree.merge(path.edges())?;
        debug!(
            ingress = %ingress.connect_point(),
            hops = path.len(),
            cost = path.cost(),
            added,
            "ingress path merged"
        );
        Ok(None)
    }

    fn reserve(
        &self,
        request: &IntentRequest,
        egress: &ConnectPoint,
        links: &BTreeSet<Link>,
        ctx: &CompileContext<'_>,
    ) -> IntentResult<()> {
        let Some(bps) = request.bandwidth() else {
            return Ok(());
        };
        let allocator = ctx.allocator.ok_or_else(|| {
            IntentError::resource_allocation("bandwidth requested but no allocator is configured")
        })?;

        let mut points: BTreeSet<ConnectPoint> = links
            .iter()
            .flat_map(|l| [l.src().clone(), l.dst().clone()])
            .collect();
        points.extend(request.ingress_points.iter().map(|p| p.connect_point().clone()));
        points.insert(egress.clone());

        allocator.allocate(&request.effective_key(), &points, bps)
    }
}

impl IntentCompiler for LinkCollectionCompiler {
    fn compile(
        &self,
        request: &IntentRequest,
        ctx: &CompileContext<'_>,
    ) -> IntentResult<CompileReport> {
        ctx.check(request)?;
        let egress = request.egress_point.as_ref().ok_or_else(|| {
            IntentError::invalid_argument("forwarding compilation requires an egress point")
        })?;
        let egress_device = egress.connect_point().device();

        let weigher = ConstraintWeigher::for_request(request, ctx.topology, ctx.config);
        let mut tree = LinkTree::default();
        let mut missing: Vec<(&FilteredConnectPoint, String)> = Vec::new();

        for ingress in &request.ingress_points {
            if let Some(reason) = self.connect(ingress, egress_device, &weigher, &mut tree, ctx)? {
                debug!(ingress = %ingress.connect_point(), %reason, "ingress not connected");
                missing.push((ingress, reason));
            }
        }

        let total = request.ingress_points.len();
        let connected = total - missing.len();
        let mut diagnostics = Diagnostics::default();

        if connected == 0 {
            return Err(IntentError::no_connectivity(format!(
                "none of {total} ingress points reach {}",
                egress.connect_point()
            )));
        }

        if !missing.is_empty() {
            let summary = missing
                .iter()
                .map(|(p, reason)| format!("{}: {reason}", p.connect_point()))
                .collect::<Vec<_>>()
                .join("; ");
            if !request.allows_partial_failure() {
                return Err(IntentError::partial_connectivity(format!(
                    "{} of {total} ingress points unreachable ({summary})",
                    missing.len()
                )));
            }
            warn!(
                missing = missing.len(),
                total,
                egress = %egress.connect_point(),
                "compiling with partial connectivity"
            );
            let d = diagnostics.push_warning("intent.partial_connectivity", summary);
            for (p, _) in &missing {
                d.with_data(p.connect_point().to_string(), "unreachable");
            }
        }

        let is_missing = |p: &ConnectPoint| missing.iter().any(|(m, _)| m.connect_point() == p);
        let local = request
            .ingress_points
            .iter()
            .map(FilteredConnectPoint::connect_point)
            .filter(|p| p.device() == egress_device && !is_missing(p));
        for point in local {
            diagnostics
                .push_info(
                    "intent.local_ingress",
                    format!("{point} shares the egress device; no links needed"),
                )
                .with_data(point.to_string(), "local");
        }

        let links = tree.into_links();
        self.reserve(request, egress.connect_point(), &links, ctx)?;

        let stats = CompileStats {
            ingress_points: total,
            connected,
            missing: missing.len(),
            links: links.len(),
        };

        let mut params = LinkCollectionParams::new(
            request.app_id.clone(),
            request.ingress_points.iter().cloned(),
        );
        params.key = request.key.clone();
        params.selector = request.selector.clone();
        params.treatment = request.treatment.clone();
        params.links = links;
        params.egress_points = BTreeSet::from([egress.clone()]);
        params.constraints = request.constraints.clone();
        params.priority = request.priority;
        params.apply_treatment_on_egress = request.apply_treatment_on_egress;
        params.resource_group = request.resource_group;
        let intent = LinkCollectionIntent::new(params)?;

        info!(
            key = %request.effective_key(),
            links = stats.links,
            connected,
            total,
            "link collection compiled"
        );

        Ok(CompileReport {
            intent,
            diagnostics: diagnostics.into_vec(),
            stats,
        })
    }
}
