//! Intent requests and the metadata they carry.
//!
//! An `IntentRequest` is what an application asks for: connect a set of
//! filtered ingress points to one filtered egress point, or (with no egress
//! point) drop the selected traffic at the ingress points.

use std::collections::BTreeSet;
use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::config::LimitsConfig;
use crate::errors::{IntentError, IntentResult};
use crate::hashing::hash_parts_hex;
use crate::model::net::FilteredConnectPoint;
use crate::model::traffic::{TrafficSelector, TrafficTreatment};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApplicationId {
    pub id: u16,
    pub name: String,
}

impl ApplicationId {
    pub fn new(id: u16, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.id, self.name)
    }
}

/// Application-scoped intent key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(String);

impl Key {
    pub fn of(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Stable key for a request that did not name one: a digest over the
    /// application, the traffic it selects and treats, and the endpoints.
    pub fn derived(request: &IntentRequest) -> Self {
        let app = request.app_id.to_string();
        let selector = request.selector.to_string();
        let treatment = request.treatment.to_string();
        let ingress = request.ingress_points.iter().join(",");
        let egress = request
            .egress_point
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        let digest = hash_parts_hex(
            crate::domain::INTENT_KEY,
            &[
                app.as_bytes(),
                selector.as_bytes(),
                treatment.as_bytes(),
                ingress.as_bytes(),
                egress.as_bytes(),
            ],
        );
        Self(format!("0x{}", &digest[..16]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceGroup(u64);

impl ResourceGroup {
    pub fn of(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ResourceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncapsulationType {
    None,
    Vlan,
    Mpls,
}

/// Conditions attached to a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Constraint {
    /// Compile even if only some ingress points can be connected.
    PartialFailure,
    /// Paths may cross administrative domain boundaries.
    DomainDelegation,
    /// Every link must offer at least this bandwidth; it is reserved on success.
    Bandwidth { bps: u64 },
    /// Path latency ceiling; links are weighed by latency.
    Latency { max_micros: u64 },
    /// Carried through to the compiled intent for flow translation.
    Encapsulation { encapsulation: EncapsulationType },
    /// Break equal-cost ties per intent instead of globally.
    HashedPathSelection,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PartialFailure => f.write_str("PartialFailure"),
            Self::DomainDelegation => f.write_str("DomainDelegation"),
            Self::Bandwidth { bps } => write!(f, "Bandwidth({bps}bps)"),
            Self::Latency { max_micros } => write!(f, "Latency({max_micros}us)"),
            Self::Encapsulation { encapsulation } => write!(f, "Encapsulation({encapsulation:?})"),
            Self::HashedPathSelection => f.write_str("HashedPathSelection"),
        }
    }
}

/// Upstream request handed to the compilers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentRequest {
    pub app_id: ApplicationId,
    #[serde(default)]
    pub key: Option<Key>,
    #[serde(default)]
    pub selector: TrafficSelector,
    #[serde(default)]
    pub treatment: TrafficTreatment,
    pub ingress_points: BTreeSet<FilteredConnectPoint>,
    /// Absent for drop-only (firewall) requests.
    #[serde(default)]
    pub egress_point: Option<FilteredConnectPoint>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    #[serde(default = "default_priority")]
    pub priority: u32,
    #[serde(default)]
    pub resource_group: Option<ResourceGroup>,
    #[serde(default)]
    pub apply_treatment_on_egress: bool,
}

fn default_priority() -> u32 {
    crate::defaults::INTENT_PRIORITY
}

impl IntentRequest {
    /// Multi-point to single-point forwarding.
    pub fn forwarding(
        app_id: ApplicationId,
        ingress: impl IntoIterator<Item = FilteredConnectPoint>,
        egress: FilteredConnectPoint,
    ) -> Self {
        Self {
            egress_point: Some(egress),
            ..Self::firewall(app_id, ingress)
        }
    }

    /// Drop the selected traffic at every ingress point.
    pub fn firewall(
        app_id: ApplicationId,
        ingress: impl IntoIterator<Item = FilteredConnectPoint>,
    ) -> Self {
        Self {
            app_id,
            key: None,
            selector: TrafficSelector::default(),
            treatment: TrafficTreatment::drop_all(),
            ingress_points: ingress.into_iter().collect(),
            egress_point: None,
            constraints: Vec::new(),
            priority: crate::defaults::INTENT_PRIORITY,
            resource_group: None,
            apply_treatment_on_egress: false,
        }
    }

    pub fn with_key(mut self, key: Key) -> Self {
        self.key = Some(key);
        self
    }

    pub fn with_selector(mut self, selector: TrafficSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_treatment(mut self, treatment: TrafficTreatment) -> Self {
        self.treatment = treatment;
        self
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_resource_group(mut self, group: ResourceGroup) -> Self {
        self.resource_group = Some(group);
        self
    }

    pub fn with_treatment_on_egress(mut self, on_egress: bool) -> Self {
        self.apply_treatment_on_egress = on_egress;
        self
    }

    /// Structural checks done before any path computation.
    pub fn validate(&self, limits: &LimitsConfig) -> IntentResult<()> {
        if self.ingress_points.is_empty() {
            return Err(IntentError::invalid_argument(
                "at least one ingress point is required",
            ));
        }

        if self.ingress_points.len() > limits.max_ingress_points {
            return Err(IntentError::invalid_argument(format!(
                "too many ingress points ({} > {})",
                self.ingress_points.len(),
                limits.max_ingress_points
            )));
        }

        if let Some(egress) = &self.egress_point {
            let clash = self
                .ingress_points
                .iter()
                .any(|i| i.connect_point() == egress.connect_point());
            if clash {
                return Err(IntentError::invalid_argument(format!(
                    "egress point {} is also an ingress point",
                    egress.connect_point()
                )));
            }
        }

        let bandwidths = self
            .constraints
            .iter()
            .filter(|c| matches!(c, Constraint::Bandwidth { .. }))
            .count();
        if bandwidths > 1 {
            return Err(IntentError::invalid_argument(
                "at most one bandwidth constraint is allowed",
            ));
        }

        Ok(())
    }

    pub fn has_constraint(&self, pred: impl Fn(&Constraint) -> bool) -> bool {
        self.constraints.iter().any(pred)
    }

    pub fn allows_partial_failure(&self) -> bool {
        self.has_constraint(|c| matches!(c, Constraint::PartialFailure))
    }

    pub fn allows_domain_delegation(&self) -> bool {
        self.has_constraint(|c| matches!(c, Constraint::DomainDelegation))
    }

    pub fn bandwidth(&self) -> Option<u64> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::Bandwidth { bps } => Some(*bps),
            _ => None,
        })
    }

    pub fn max_latency_micros(&self) -> Option<u64> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::Latency { max_micros } => Some(*max_micros),
            _ => None,
        })
    }

    /// The request's key, or one derived from its content.
    pub fn effective_key(&self) -> Key {
        self.key.clone().unwrap_or_else(|| Key::derived(self))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::model::net::ConnectPoint;
    use crate::model::traffic::{Criterion, Instruction};

    fn fcp(dev: &str, port: u64) -> FilteredConnectPoint {
        ConnectPoint::new(dev, port).into()
    }

    fn app() -> ApplicationId {
        ApplicationId::new(1, "org.conduit.test")
    }

    #[test]
    fn empty_ingress_rejected() {
        let req = IntentRequest::forwarding(app(), Vec::new(), fcp("E", 1));
        assert_matches!(
            req.validate(&LimitsConfig::default()),
            Err(IntentError::InvalidArgument(msg)) if msg.contains("ingress")
        );
    }

    #[test]
    fn egress_among_ingress_rejected() {
        let req = IntentRequest::forwarding(app(), [fcp("A", 1), fcp("E", 1)], fcp("E", 1));
        assert!(req.validate(&LimitsConfig::default()).is_err());
    }

    #[test]
    fn ingress_limit_enforced() {
        let limits = LimitsConfig {
            max_ingress_points: 1,
            ..LimitsConfig::default()
        };
        let req = IntentRequest::firewall(app(), [fcp("A", 1), fcp("B", 1)]);
        assert!(req.validate(&limits).is_err());
    }

    #[test]
    fn constraint_queries() {
        let req = IntentRequest::forwarding(app(), [fcp("A", 1)], fcp("E", 1))
            .with_constraint(Constraint::PartialFailure)
            .with_constraint(Constraint::Bandwidth { bps: 1_000 });
        assert!(req.allows_partial_failure());
        assert!(!req.allows_domain_delegation());
        assert_eq!(req.bandwidth(), Some(1_000));
        assert_eq!(req.max_latency_micros(), None);
    }

    #[test]
    fn derived_key_is_stable_and_explicit_key_wins() {
        let req = IntentRequest::forwarding(app(), [fcp("A", 1)], fcp("E", 1));
        let k1 = req.effective_key();
        assert_eq!(k1, req.clone().effective_key());
        assert!(k1.as_str().starts_with("0x"));

        let other = IntentRequest::forwarding(app(), [fcp("B", 1)], fcp("E", 1));
        assert_ne!(k1, other.effective_key());

        let keyed = req.with_key(Key::of("mine"));
        assert_eq!(keyed.effective_key().as_str(), "mine");
    }

    #[test]
    fn derived_key_covers_app_selector_and_treatment() {
        let base = IntentRequest::forwarding(app(), [fcp("A", 1)], fcp("E", 1));
        let key = base.effective_key();

        let ssh = base
            .clone()
            .with_selector(TrafficSelector::default().matching(Criterion::TcpDst { port: 22 }));
        let web = base
            .clone()
            .with_selector(TrafficSelector::default().matching(Criterion::TcpDst { port: 80 }));
        assert_ne!(ssh.effective_key(), web.effective_key());
        assert_ne!(key, ssh.effective_key());

        let queued = base
            .clone()
            .with_treatment(TrafficTreatment::default().then(Instruction::SetQueue { queue: 1 }));
        assert_ne!(key, queued.effective_key());

        let mut other_app = base;
        other_app.app_id = ApplicationId::new(2, "org.conduit.test");
        assert_ne!(key, other_app.effective_key());
    }

    #[test]
    fn request_from_json_takes_defaults() {
        let req: IntentRequest = serde_json::from_str(
            r#"{
                "app_id": {"id": 7, "name": "fw"},
                "ingress_points": [{"connect_point": {"device": "A", "port": 1}}],
                "constraints": [{"type": "partial_failure"}]
            }"#,
        )
        .unwrap();
        assert_eq!(req.priority, crate::defaults::INTENT_PRIORITY);
        assert!(req.egress_point.is_none());
        assert!(req.treatment.is_drop());
        assert!(req.allows_partial_failure());
    }
}
