//! Drop-only compilation.
//!
//! The selected traffic is dropped where it enters, so there is nothing to
//! route: no search, no links, no egress points.

use std::collections::BTreeSet;

use tracing::info;

use crate::compiler::{CompileContext, CompileReport, CompileStats, Diagnostics, IntentCompiler};
use crate::errors::{IntentError, IntentResult};
use crate::model::intent::IntentRequest;
use crate::model::link_collection::{LinkCollectionIntent, LinkCollectionParams};

#[derive(Debug, Clone, Copy, Default)]
pub struct FirewallIntentCompiler;

impl IntentCompiler for FirewallIntentCompiler {
    fn compile(
        &self,
        request: &IntentRequest,
        ctx: &CompileContext<'_>,
    ) -> IntentResult<CompileReport> {
        ctx.check(request)?;
        if let Some(egress) = &request.egress_point {
            return Err(IntentError::invalid_argument(format!(
                "drop-only request must not name an egress point (got {})",
                egress.connect_point()
            )));
        }

        let mut diagnostics = Diagnostics::default();
        if !request.treatment.is_drop() {
            diagnostics
                .push_warning(
                    "intent.filter_treatment",
                    "drop-only request carries instructions; they are kept as given",
                )
                .with_data("treatment", request.treatment.to_string());
        }

        let mut params = LinkCollectionParams::new(
            request.app_id.clone(),
            request.ingress_points.iter().cloned(),
        );
        params.key = request.key.clone();
        params.selector = request.selector.clone();
        params.treatment = request.treatment.clone();
        params.links = BTreeSet::new();
        params.constraints = request.constraints.clone();
        params.priority = request.priority;
        params.apply_treatment_on_egress = request.apply_treatment_on_egress;
        params.resource_group = request.resource_group;
        params.cost = crate::defaults::LINK_COLLECTION_COST;
        params.is_filter_intent = true;
        let intent = LinkCollectionIntent::new(params)?;

        let total = request.ingress_points.len();
        info!(key = %request.effective_key(), ingress = total, "filter intent compiled");

        Ok(CompileReport {
            intent,
            diagnostics: diagnostics.into_vec(),
            stats: CompileStats {
                ingress_points: total,
                connected: total,
                missing: 0,
                links: 0,
            },
        })
    }
}
