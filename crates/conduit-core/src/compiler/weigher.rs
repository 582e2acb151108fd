//! Constraint-driven link weighting.
//!
//! A link the request cannot use weighs `f64::INFINITY`, which the searches
//! treat as absent. Usable links weigh their metric (or latency, under a
//! latency constraint), falling back to the configured default cost. A link
//! without a latency annotation counts the default cost as its latency, both
//! when weighing and when checking the path ceiling.
//!
//! Exclusion rules:
//! - inactive links
//! - links touching an unavailable device
//! - links whose known available bandwidth is below a bandwidth constraint
//! - links crossing a domain boundary, unless domain delegation is allowed
//!
//! Path-level rules (checked on the computed path, see [`ConstraintWeigher::check_path`]):
//! - total latency within a latency constraint
//! - hop count within `limits.max_path_hops`

use conduit_graph::EdgeWeigher;

use crate::config::CompilerConfig;
use crate::hashing::unit_interval;
use crate::model::intent::{Constraint, IntentRequest, Key};
use crate::model::net::Link;
use crate::topology::{DevicePath, Topology};

pub struct ConstraintWeigher<'a> {
    topology: &'a dyn Topology,
    config: &'a CompilerConfig,
    min_bandwidth: Option<u64>,
    max_latency: Option<u64>,
    domain_delegation: bool,
    tie_break: Option<Key>,
}

impl<'a> ConstraintWeigher<'a> {
    pub fn for_request(
        request: &IntentRequest,
        topology: &'a dyn Topology,
        config: &'a CompilerConfig,
    ) -> Self {
        let hashed = request.has_constraint(|c| matches!(c, Constraint::HashedPathSelection));
        Self {
            topology,
            config,
            min_bandwidth: request.bandwidth(),
            max_latency: request.max_latency_micros(),
            domain_delegation: request.allows_domain_delegation(),
            tie_break: hashed.then(|| request.effective_key()),
        }
    }

    /// Whether the request may use `link` at all.
    pub fn is_usable(&self, link: &Link) -> bool {
        if !link.is_active() {
            return false;
        }

        let (src, dst) = (link.src().device(), link.dst().device());
        if !self.topology.is_device_available(src) || !self.topology.is_device_available(dst) {
            return false;
        }

        if let (Some(floor), Some(avail)) =
            (self.min_bandwidth, link.annotations().available_bandwidth_bps)
        {
            if avail < floor {
                return false;
            }
        }

        if !self.domain_delegation {
            let domains = (self.topology.device_domain(src), self.topology.device_domain(dst));
            if let (Some(a), Some(b)) = domains {
                if a != b {
                    return false;
                }
            }
        }

        true
    }

    /// Latency of `link` in micros; unannotated links take the default cost.
    fn latency_micros(&self, link: &Link) -> u64 {
        match link.annotations().latency_micros {
            Some(l) => l,
            // Float-to-int casts saturate.
            None => self.config.default_link_cost.ceil() as u64,
        }
    }

    fn base_cost(&self, link: &Link) -> f64 {
        if self.max_latency.is_some() {
            return self.latency_micros(link) as f64;
        }
        match link.annotations().metric {
            Some(c) if c.is_finite() && c >= 0.0 => c,
            _ => self.config.default_link_cost,
        }
    }

    /// Reject a computed path that breaks a path-level rule.
    pub fn check_path(&self, path: &DevicePath) -> Result<(), String> {
        let max_hops = self.config.limits.max_path_hops;
        if max_hops > 0 && path.len() > max_hops {
            return Err(format!("path has {} hops, limit is {max_hops}", path.len()));
        }

        if let Some(max) = self.max_latency {
            let total = path
                .edges()
                .iter()
                .fold(0u64, |acc, l| acc.saturating_add(self.latency_micros(l)));
            if total > max {
                return Err(format!("path latency {total}us exceeds {max}us"));
            }
        }

        Ok(())
    }
}

impl EdgeWeigher<Link> for ConstraintWeigher<'_> {
    fn weight(&self, link: &Link) -> f64 {
        if !self.is_usable(link) {
            return f64::INFINITY;
        }

        let base = self.base_cost(link);
        match &self.tie_break {
            Some(key) => {
                let src = link.src().to_string();
                let dst = link.dst().to_string();
                let u = unit_interval(
                    crate::domain::PATH_TIE_BREAK,
                    &[key.as_str().as_bytes(), src.as_bytes(), dst.as_bytes()],
                );
                base * (1.0 + self.config.hashed_selection_jitter * u)
            }
            None => base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::testing::{app, host, link, topo};
    use crate::model::net::LinkState;
    use crate::topology::TopologySnapshot;

    fn request() -> IntentRequest {
        IntentRequest::forwarding(app(), [host("A")], host("B"))
    }

    #[test]
    fn metric_or_default() {
        let t = topo(&[("A", "B")]);
        let cfg = CompilerConfig::default().with_default_link_cost(3.0);
        let w = ConstraintWeigher::for_request(&request(), &t, &cfg);
        assert_eq!(w.weight(&link("A", "B")), 3.0);
        assert_eq!(w.weight(&link("A", "B").with_metric(7.5)), 7.5);
    }

    #[test]
    fn inactive_and_unavailable_excluded() {
        let t = topo(&[("A", "B")]).with_unavailable("B");
        let cfg = CompilerConfig::default();
        let w = ConstraintWeigher::for_request(&request(), &t, &cfg);
        assert_eq!(w.weight(&link("A", "B")), f64::INFINITY);

        let t = topo(&[("A", "B")]);
        let w = ConstraintWeigher::for_request(&request(), &t, &cfg);
        let down = link("A", "B").with_state(LinkState::Inactive);
        assert_eq!(w.weight(&down), f64::INFINITY);
    }

    #[test]
    fn bandwidth_floor() {
        let t = topo(&[("A", "B")]);
        let cfg = CompilerConfig::default();
        let req = request().with_constraint(Constraint::Bandwidth { bps: 100 });
        let w = ConstraintWeigher::for_request(&req, &t, &cfg);
        assert!(!w.is_usable(&link("A", "B").with_available_bandwidth(50)));
        assert!(w.is_usable(&link("A", "B").with_available_bandwidth(100)));
        assert!(w.is_usable(&link("A", "B")));
    }

    #[test]
    fn domain_boundaries() {
        let t: TopologySnapshot = topo(&[("A", "B")])
            .with_domain("A", "east")
            .with_domain("B", "west");
        let cfg = CompilerConfig::default();
        let w = ConstraintWeigher::for_request(&request(), &t, &cfg);
        assert!(!w.is_usable(&link("A", "B")));

        let req = request().with_constraint(Constraint::DomainDelegation);
        let w = ConstraintWeigher::for_request(&req, &t, &cfg);
        assert!(w.is_usable(&link("A", "B")));
    }

    #[test]
    fn latency_weighting_and_ceiling() {
        let t = topo(&[("A", "B")]);
        let cfg = CompilerConfig::default();
        let req = request().with_constraint(Constraint::Latency { max_micros: 100 });
        let w = ConstraintWeigher::for_request(&req, &t, &cfg);
        let slow = link("A", "B").with_latency_micros(150).with_metric(1.0);
        assert_eq!(w.weight(&slow), 150.0);

        let path = DevicePath::new("A".into(), "B".into(), vec![slow], 150.0);
        assert!(w.check_path(&path).unwrap_err().contains("150us"));
    }

    #[test]
    fn unannotated_latency_uses_default_cost_everywhere() {
        let t = topo(&[("A", "B"), ("B", "C")]);
        let cfg = CompilerConfig::default().with_default_link_cost(40.0);
        let req = request().with_constraint(Constraint::Latency { max_micros: 70 });
        let w = ConstraintWeigher::for_request(&req, &t, &cfg);
        assert_eq!(w.weight(&link("A", "B")), 40.0);

        let one = DevicePath::new("A".into(), "B".into(), vec![link("A", "B")], 40.0);
        assert!(w.check_path(&one).is_ok());

        let two = DevicePath::new(
            "A".into(),
            "C".into(),
            vec![link("A", "B"), link("B", "C")],
            80.0,
        );
        assert!(w.check_path(&two).unwrap_err().contains("80us"));
    }

    #[test]
    fn huge_latencies_saturate() {
        let t = topo(&[("A", "B"), ("B", "C")]);
        let cfg = CompilerConfig::default();
        let req = request().with_constraint(Constraint::Latency { max_micros: 10 });
        let w = ConstraintWeigher::for_request(&req, &t, &cfg);
        let path = DevicePath::new(
            "A".into(),
            "C".into(),
            vec![
                link("A", "B").with_latency_micros(u64::MAX),
                link("B", "C").with_latency_micros(u64::MAX),
            ],
            f64::MAX,
        );
        assert!(w.check_path(&path).is_err());
    }

    #[test]
    fn hop_limit() {
        let t = topo(&[("A", "B"), ("B", "C")]);
        let mut cfg = CompilerConfig::default();
        cfg.limits.max_path_hops = 1;
        let w = ConstraintWeigher::for_request(&request(), &t, &cfg);
        let path = DevicePath::new(
            "A".into(),
            "C".into(),
            vec![link("A", "B"), link("B", "C")],
            2.0,
        );
        assert!(w.check_path(&path).is_err());
    }

    #[test]
    fn hashed_selection_jitters_within_bound() {
        let t = topo(&[("A", "B")]);
        let cfg = CompilerConfig::default();
        let req = request().with_constraint(Constraint::HashedPathSelection);
        let w = ConstraintWeigher::for_request(&req, &t, &cfg);
        let cost = w.weight(&link("A", "B"));
        assert!(cost >= 1.0 && cost <= 1.0 + cfg.hashed_selection_jitter);
        assert_eq!(cost, w.weight(&link("A", "B")));
    }
}
