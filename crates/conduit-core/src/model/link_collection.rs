//! The compiled output: a set of links funneling traffic to the egress points.
//!
//! A `LinkCollectionIntent` is immutable once built. Construction goes through
//! [`LinkCollectionParams`] so every field is named at the call site; the only
//! structural requirement is a non-empty ingress set. Deserialized values are
//! always fully populated: collections default to empty, never to missing.

use std::collections::BTreeSet;
use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::errors::{IntentError, IntentResult};
use crate::model::intent::{ApplicationId, Constraint, Key, ResourceGroup};
use crate::model::net::{ConnectPoint, FilteredConnectPoint, Link};
use crate::model::traffic::{TrafficSelector, TrafficTreatment};

/// A network element an intent holds on to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NetworkResource {
    Link { link: Link },
    ConnectPoint { connect_point: ConnectPoint },
}

impl fmt::Display for NetworkResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Link { link } => write!(f, "{link}"),
            Self::ConnectPoint { connect_point } => write!(f, "{connect_point}"),
        }
    }
}

/// Every field of a [`LinkCollectionIntent`], spelled out.
#[derive(Debug, Clone)]
pub struct LinkCollectionParams {
    pub app_id: ApplicationId,
    pub key: Option<Key>,
    pub selector: TrafficSelector,
    pub treatment: TrafficTreatment,
    /// Resources held in addition to the links.
    pub resources: BTreeSet<NetworkResource>,
    pub links: BTreeSet<Link>,
    pub ingress_points: BTreeSet<FilteredConnectPoint>,
    pub egress_points: BTreeSet<FilteredConnectPoint>,
    pub constraints: Vec<Constraint>,
    pub priority: u32,
    pub apply_treatment_on_egress: bool,
    pub cost: f64,
    pub resource_group: Option<ResourceGroup>,
    pub is_filter_intent: bool,
}

impl LinkCollectionParams {
    /// Parameters with empty collections and default cost and priority.
    pub fn new(
        app_id: ApplicationId,
        ingress_points: impl IntoIterator<Item = FilteredConnectPoint>,
    ) -> Self {
        Self {
            app_id,
            key: None,
            selector: TrafficSelector::default(),
            treatment: TrafficTreatment::default(),
            resources: BTreeSet::new(),
            links: BTreeSet::new(),
            ingress_points: ingress_points.into_iter().collect(),
            egress_points: BTreeSet::new(),
            constraints: Vec::new(),
            priority: crate::defaults::INTENT_PRIORITY,
            apply_treatment_on_egress: false,
            cost: crate::defaults::LINK_COLLECTION_COST,
            resource_group: None,
            is_filter_intent: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkCollectionIntent {
    app_id: ApplicationId,
    #[serde(default)]
    key: Option<Key>,
    #[serde(default)]
    selector: TrafficSelector,
    #[serde(default)]
    treatment: TrafficTreatment,
    #[serde(default)]
    resources: BTreeSet<NetworkResource>,
    #[serde(default)]
    links: BTreeSet<Link>,
    ingress_points: BTreeSet<FilteredConnectPoint>,
    #[serde(default)]
    egress_points: BTreeSet<FilteredConnectPoint>,
    #[serde(default)]
    constraints: Vec<Constraint>,
    priority: u32,
    #[serde(default)]
    apply_treatment_on_egress: bool,
    #[serde(default = "default_cost")]
    cost: f64,
    #[serde(default)]
    resource_group: Option<ResourceGroup>,
    #[serde(default)]
    is_filter_intent: bool,
}

fn default_cost() -> f64 {
    crate::defaults::LINK_COLLECTION_COST
}

impl LinkCollectionIntent {
    pub fn new(params: LinkCollectionParams) -> IntentResult<Self> {
        if params.ingress_points.is_empty() {
            return Err(IntentError::invalid_argument(
                "link collection requires at least one ingress point",
            ));
        }

        Ok(Self {
            app_id: params.app_id,
            key: params.key,
            selector: params.selector,
            treatment: params.treatment,
            resources: params.resources,
            links: params.links,
            ingress_points: params.ingress_points,
            egress_points: params.egress_points,
            constraints: params.constraints,
            priority: params.priority,
            apply_treatment_on_egress: params.apply_treatment_on_egress,
            cost: params.cost,
            resource_group: params.resource_group,
            is_filter_intent: params.is_filter_intent,
        })
    }

    pub fn app_id(&self) -> &ApplicationId {
        &self.app_id
    }

    pub fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    pub fn selector(&self) -> &TrafficSelector {
        &self.selector
    }

    pub fn treatment(&self) -> &TrafficTreatment {
        &self.treatment
    }

    pub fn links(&self) -> &BTreeSet<Link> {
        &self.links
    }

    pub fn filtered_ingress_points(&self) -> &BTreeSet<FilteredConnectPoint> {
        &self.ingress_points
    }

    pub fn filtered_egress_points(&self) -> &BTreeSet<FilteredConnectPoint> {
        &self.egress_points
    }

    /// Ingress connection points with their filters stripped.
    pub fn ingress_points(&self) -> BTreeSet<ConnectPoint> {
        self.ingress_points
            .iter()
            .map(|p| p.connect_point().clone())
            .collect()
    }

    /// Egress connection points with their filters stripped.
    pub fn egress_points(&self) -> BTreeSet<ConnectPoint> {
        self.egress_points
            .iter()
            .map(|p| p.connect_point().clone())
            .collect()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    pub fn apply_treatment_on_egress(&self) -> bool {
        self.apply_treatment_on_egress
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn resource_group(&self) -> Option<ResourceGroup> {
        self.resource_group
    }

    pub fn is_filter_intent(&self) -> bool {
        self.is_filter_intent
    }

    /// Explicit resources plus one resource per link.
    pub fn resources(&self) -> BTreeSet<NetworkResource> {
        self.resources
            .iter()
            .cloned()
            .chain(
                self.links
                    .iter()
                    .map(|link| NetworkResource::Link { link: link.clone() }),
            )
            .collect()
    }
}

impl fmt::Display for LinkCollectionIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = self.key.as_ref().map(Key::as_str).unwrap_or("none");
        let group = self
            .resource_group
            .map(|g| g.to_string())
            .unwrap_or_else(|| "none".to_string());
        write!(
            f,
            "LinkCollectionIntent{{key={key}, appId={}, priority={}, resources=[{}], \
             selector={}, treatment={}, links=[{}], ingress=[{}], egress=[{}], \
             treatmentOnEgress={}, resourceGroup={group}, cost={}}}",
            self.app_id,
            self.priority,
            self.resources().iter().join(", "),
            self.selector,
            self.treatment,
            self.links.iter().join(", "),
            self.ingress_points().iter().join(", "),
            self.egress_points().iter().join(", "),
            self.apply_treatment_on_egress,
            self.cost,
        )
    }
}
