//! SWARA Criterion Weighting
//!
//! Step-wise Weight Assessment Ratio Analysis over a ranked criteria list:
//!
//! ```text
//! k_0 = 1,  k_j = T(rank_j) + eps
//! q_0 = 1,  q_j = q_{j-1} / k_j
//! w_j = q_j / sum(q)
//! ```
//!
//! The weight vector is computed once per batch and shared read-only.

use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

use crate::models::config::{CriteriaConfig, Criterion, NeutrosophicScale};
use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::SWARA_EPSILON;

/// Normalized criterion weights in configured importance order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightVector {
    entries: Vec<(String, f64)>,
}

impl WeightVector {
    /// Compute SWARA weights for a ranked criteria list
    pub fn compute(criteria: &[Criterion], scale: &NeutrosophicScale) -> AppResult<Self> {
        if criteria.is_empty() {
            return Err(AppError::config("Cannot weight an empty criteria list"));
        }

        let truths = criteria
            .iter()
            .map(|c| {
                scale.truth(&c.importance).ok_or_else(|| {
                    AppError::config(format!(
                        "Criterion '{}' uses unknown importance rank '{}'",
                        c.name, c.importance
                    ))
                })
            })
            .collect::<AppResult<Vec<f64>>>()?;

        let weights = swara_weights(&truths);
        if weights.iter().any(|w| !w.is_finite() || *w <= 0.0) {
            return Err(AppError::config(
                "SWARA weights degenerate (too many zero-truth ranks)",
            ));
        }

        let entries: Vec<(String, f64)> = criteria
            .iter()
            .zip(weights)
            .map(|(c, w)| (c.normalized_name().to_string(), w))
            .collect();

        for (name, weight) in &entries {
            debug!(criterion = name.as_str(), weight, "SWARA weight");
        }

        Ok(Self { entries })
    }

    /// Compute weights from a loaded configuration
    pub fn from_config(config: &CriteriaConfig) -> AppResult<Self> {
        Self::compute(&config.criteria, &config.neutrosophic_scale)
    }

    /// Load a criteria file and compute its weights
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let config = CriteriaConfig::load(path)?;
        let weights = Self::from_config(&config)?;
        info!("⚖️ SWARA weights ready for {} criteria", weights.len());
        Ok(weights)
    }

    /// Weight of a named criterion
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, w)| *w)
    }

    /// Weight of a named criterion, or a mismatch error
    pub fn require(&self, name: &str) -> AppResult<f64> {
        self.get(name).ok_or_else(|| AppError::config_mismatch(name))
    }

    /// Fail unless every name has a weight
    pub fn ensure_contains(&self, names: &[&str]) -> AppResult<()> {
        for name in names {
            self.require(name)?;
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(n, w)| (n.as_str(), *w))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// SWARA weights for truth values listed in descending importance.
///
/// The first criterion's truth value is not used (`k_0 = 1`).
pub fn swara_weights(truths: &[f64]) -> Vec<f64> {
    if truths.is_empty() {
        return Vec::new();
    }

    let mut q = Vec::with_capacity(truths.len());
    q.push(1.0);
    for t in &truths[1..] {
        let k = t + SWARA_EPSILON;
        let prev = q[q.len() - 1];
        q.push(prev / k);
    }

    let total: f64 = q.iter().sum();
    q.iter().map(|q_j| q_j / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale() -> NeutrosophicScale {
        NeutrosophicScale::new()
            .with_rank("Very Important", 0.9, 0.1, 0.1)
            .with_rank("Important", 0.75, 0.25, 0.2)
            .with_rank("Moderately Important", 0.5, 0.5, 0.5)
            .with_rank("Unimportant", 0.0, 1.0, 1.0)
    }

    fn criteria() -> Vec<Criterion> {
        vec![
            Criterion::new("total_value_eth", "Very Important"),
            Criterion::new("recent_tx_count", "Important"),
            Criterion::new("tx_count", "Moderately Important"),
        ]
    }

    #[test]
    fn test_weights_sum_to_one() {
        let weights = WeightVector::compute(&criteria(), &scale()).unwrap();
        let total: f64 = weights.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(weights.iter().all(|(_, w)| w > 0.0));
    }

    #[test]
    fn test_known_values() {
        // q = [1, 1/0.75, (1/0.75)/0.5] = [1, 1.3333, 2.6667], sum = 5
        let weights = WeightVector::compute(&criteria(), &scale()).unwrap();
        assert!((weights.get("total_value").unwrap() - 0.2).abs() < 1e-6);
        assert!((weights.get("recent_tx_count").unwrap() - 0.26666667).abs() < 1e-6);
        assert!((weights.get("tx_count").unwrap() - 0.53333333).abs() < 1e-6);
    }

    #[test]
    fn test_order_matches_configuration() {
        let weights = WeightVector::compute(&criteria(), &scale()).unwrap();
        let names: Vec<&str> = weights.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["total_value", "recent_tx_count", "tx_count"]);
    }

    #[test]
    fn test_single_criterion_gets_full_weight() {
        let single = vec![Criterion::new("tx_count", "Important")];
        let weights = WeightVector::compute(&single, &scale()).unwrap();
        assert_eq!(weights.get("tx_count"), Some(1.0));
    }

    #[test]
    fn test_zero_truth_rank_stays_positive() {
        let list = vec![
            Criterion::new("a", "Very Important"),
            Criterion::new("b", "Unimportant"),
        ];
        let weights = WeightVector::compute(&list, &scale()).unwrap();
        let total: f64 = weights.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(weights.get("a").unwrap() > 0.0);
    }

    #[test]
    fn test_long_zero_truth_run_is_config_error() {
        // q grows by 1e9 per zero-truth rank and overflows f64
        let list: Vec<Criterion> = (0..40)
            .map(|i| Criterion::new(format!("c{}", i), "Unimportant"))
            .collect();
        let err = WeightVector::compute(&list, &scale()).unwrap_err();
        assert_eq!(err.code, crate::models::errors::ErrorCode::ConfigInvalid);
        assert_eq!(err.code_str(), "CFG_INVALID");
    }

    #[test]
    fn test_empty_criteria_is_config_error() {
        let err = WeightVector::compute(&[], &scale()).unwrap_err();
        assert_eq!(err.code, crate::models::errors::ErrorCode::ConfigInvalid);
    }

    #[test]
    fn test_unknown_rank_is_config_error() {
        let list = vec![Criterion::new("a", "Nope")];
        assert!(WeightVector::compute(&list, &scale()).is_err());
    }

    #[test]
    fn test_deterministic() {
        let a = WeightVector::compute(&criteria(), &scale()).unwrap();
        let b = WeightVector::compute(&criteria(), &scale()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_require_reports_mismatch() {
        let weights = WeightVector::compute(&criteria()[..2], &scale()).unwrap();
        let err = weights.ensure_contains(&["total_value", "tx_count"]).unwrap_err();
        assert_eq!(err.code, crate::models::errors::ErrorCode::ConfigMismatch);
    }
}
