//! Configuration structures for conduit-core.
//!
//! This module defines explicit, serializable configuration objects used by
//! callers to control intent compilation:
//! - which search strategy computes ingress paths
//! - the cost assigned to links that carry no metric
//! - request and path limits
//!
//! The core crate itself does not read environment variables or files. All
//! configuration is provided explicitly by the caller, either as a value or as
//! a JSON document through [`CompilerConfig::from_json_str`].

use anyhow::Context;
use conduit_graph::SearchAlgorithm;
use serde::{Deserialize, Serialize};

use crate::errors::{IntentError, IntentResult};

/// Global configuration container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// Strategy used for every ingress path computation.
    pub search: SearchAlgorithm,
    /// Weight of a usable link that carries no metric annotation.
    pub default_link_cost: f64,
    /// Upper bound of the per-intent tie-breaking jitter, relative to the link cost.
    pub hashed_selection_jitter: f64,
    pub limits: LimitsConfig,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            search: SearchAlgorithm::Dijkstra,
            default_link_cost: 1.0,
            hashed_selection_jitter: 1e-6,
            limits: LimitsConfig::default(),
        }
    }
}

impl CompilerConfig {
    /// Parse and validate a JSON configuration document. Missing fields take
    /// their defaults.
    pub fn from_json_str(s: &str) -> anyhow::Result<Self> {
        let cfg: Self = serde_json::from_str(s).context("parse compiler config json")?;
        validate_config(&cfg).context("validate compiler config")?;
        Ok(cfg)
    }

    pub fn with_search(mut self, search: SearchAlgorithm) -> Self {
        self.search = search;
        self
    }

    pub fn with_default_link_cost(mut self, cost: f64) -> Self {
        self.default_link_cost = cost;
        self
    }
}

/// Request and path limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    /// Largest accepted ingress set per request.
    pub max_ingress_points: usize,
    /// Longest accepted ingress path in links; 0 disables the check.
    pub max_path_hops: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_ingress_points: 10_000,
            max_path_hops: 0,
        }
    }
}

/// Validate a full configuration object.
pub fn validate_config(cfg: &CompilerConfig) -> IntentResult<()> {
    if !cfg.default_link_cost.is_finite() || cfg.default_link_cost <= 0.0 {
        return Err(IntentError::invalid_argument(
            "default_link_cost must be finite and greater than zero",
        ));
    }

    if !cfg.hashed_selection_jitter.is_finite() || cfg.hashed_selection_jitter < 0.0 {
        return Err(IntentError::invalid_argument(
            "hashed_selection_jitter must be finite and non-negative",
        ));
    }

    if cfg.limits.max_ingress_points == 0 {
        return Err(IntentError::invalid_argument(
            "max_ingress_points must be greater than zero",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        validate_config(&CompilerConfig::default()).unwrap();
    }

    #[test]
    fn non_positive_cost_detected() {
        let cfg = CompilerConfig::default().with_default_link_cost(0.0);
        assert!(validate_config(&cfg).is_err());
        let cfg = CompilerConfig::default().with_default_link_cost(f64::NAN);
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn zero_ingress_limit_detected() {
        let mut cfg = CompilerConfig::default();
        cfg.limits.max_ingress_points = 0;
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn json_fills_defaults() {
        let cfg = CompilerConfig::from_json_str(r#"{"search":"breadth-first"}"#).unwrap();
        assert_eq!(cfg.search, SearchAlgorithm::BreadthFirst);
        assert_eq!(cfg.default_link_cost, 1.0);
        assert_eq!(cfg.limits, LimitsConfig::default());
    }

    #[test]
    fn json_rejects_invalid_values() {
        let err = CompilerConfig::from_json_str(r#"{"default_link_cost":-1.0}"#).unwrap_err();
        assert!(format!("{err:#}").contains("default_link_cost"));
        assert!(CompilerConfig::from_json_str(r#"{"search":"astar"}"#).is_err());
        assert!(CompilerConfig::from_json_str(r#"{"bogus":1}"#).is_err());
    }
}
