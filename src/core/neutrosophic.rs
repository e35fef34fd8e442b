//! Neutrosophic Risk Vector
//!
//! - T (truth): legitimacy proxy, penalized by dust transfers relative to
//!   total value moved (address poisoning / spam pattern)
//! - I (indeterminacy): high when recent activity is too sparse to judge
//! - F (falsity): risk proxy growing linearly with lifetime transaction count

use crate::models::types::{IndicatorSet, NeutrosophicTriple};
use crate::utils::constants::{
    FALSITY_SATURATION_TX, INDETERMINACY_ABUNDANT, INDETERMINACY_MODERATE,
    INDETERMINACY_SPARSE, MODERATE_RECENT_TX, SPARSE_RECENT_TX,
};

#[inline]
pub fn truth(total_value: f64, small_tx_count: u64) -> f64 {
    // +1 keeps zero-value wallets defined
    (1.0 - small_tx_count as f64 / (total_value + 1.0)).clamp(0.0, 1.0)
}

#[inline]
pub fn indeterminacy(recent_tx_count: u64) -> f64 {
    if recent_tx_count < SPARSE_RECENT_TX {
        INDETERMINACY_SPARSE
    } else if recent_tx_count < MODERATE_RECENT_TX {
        INDETERMINACY_MODERATE
    } else {
        INDETERMINACY_ABUNDANT
    }
}

#[inline]
pub fn falsity(tx_count: u64) -> f64 {
    (tx_count as f64 / FALSITY_SATURATION_TX).min(1.0)
}

/// (T, I, F) from the four indicators the vector depends on
pub fn vector(
    total_value: f64,
    recent_tx_count: u64,
    tx_count: u64,
    small_tx_count: u64,
) -> NeutrosophicTriple {
    NeutrosophicTriple {
        t: truth(total_value, small_tx_count),
        i: indeterminacy(recent_tx_count),
        f: falsity(tx_count),
    }
}

impl NeutrosophicTriple {
    pub fn from_indicators(ind: &IndicatorSet) -> Self {
        vector(
            ind.total_value,
            ind.recent_tx_count,
            ind.tx_count,
            ind.small_tx_count,
        )
    }

    pub fn is_bounded(&self) -> bool {
        [self.t, self.i, self.f]
            .iter()
            .all(|v| (0.0..=1.0).contains(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_dust_is_full_truth() {
        let v = vector(5.0, 10, 10, 0);
        assert_eq!(v.t, 1.0);
        assert_eq!(v.i, 0.1);
        assert!((v.f - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_indeterminacy_steps() {
        assert_eq!(indeterminacy(0), 0.9);
        assert_eq!(indeterminacy(4), 0.9);
        assert_eq!(indeterminacy(5), 0.3);
        assert_eq!(indeterminacy(9), 0.3);
        assert_eq!(indeterminacy(10), 0.1);
        assert_eq!(indeterminacy(10_000), 0.1);
    }

    #[test]
    fn test_falsity_saturates() {
        assert_eq!(falsity(0), 0.0);
        assert_eq!(falsity(250), 0.5);
        assert_eq!(falsity(500), 1.0);
        assert_eq!(falsity(5_000), 1.0);
    }

    #[test]
    fn test_dust_drives_truth_down() {
        let clean = truth(0.0, 0);
        let dusty = truth(0.0, 3);
        assert_eq!(clean, 1.0);
        assert_eq!(dusty, 0.0);
        assert!(truth(10.0, 5) < truth(10.0, 1));
    }

    #[test]
    fn test_bounded_over_grid() {
        for total in [0.0, 0.0005, 1.0, 1e6] {
            for recent in [0, 3, 7, 50] {
                for small in [0, 1, 100] {
                    for count in [small, small + 10, 10_000] {
                        let v = vector(total, recent.min(count), count, small);
                        assert!(v.is_bounded(), "{:?}", v);
                    }
                }
            }
        }
    }
}
