use neutro_sentry::core::neutrosophic::vector;
use neutro_sentry::{score, Criterion, ErrorCode, IndicatorSet, NeutrosophicScale, WeightVector};
use proptest::prelude::*;

fn ranked(truths: &[f64]) -> (Vec<Criterion>, NeutrosophicScale) {
    let mut scale = NeutrosophicScale::new();
    let mut criteria = Vec::with_capacity(truths.len());
    for (idx, t) in truths.iter().enumerate() {
        let rank = format!("rank_{}", idx);
        scale = scale.with_rank(rank.as_str(), *t, 0.5, 0.5);
        criteria.push(Criterion::new(format!("criterion_{}", idx), rank));
    }
    (criteria, scale)
}

proptest! {
    #[test]
    fn swara_weights_normalized(truths in proptest::collection::vec(0.0f64..=1.0, 1..=40)) {
        let (criteria, scale) = ranked(&truths);
        match WeightVector::compute(&criteria, &scale) {
            Ok(weights) => {
                prop_assert_eq!(weights.len(), truths.len());
                let total: f64 = weights.iter().map(|(_, w)| w).sum();
                prop_assert!((total - 1.0).abs() < 1e-9, "sum = {}", total);
                prop_assert!(weights.iter().all(|(_, w)| w > 0.0));
            }
            // only near-zero truth runs may overflow
            Err(e) => prop_assert_eq!(e.code, ErrorCode::ConfigInvalid),
        }
    }

    #[test]
    fn neutrosophic_vector_bounded(
        total_value in 0.0f64..1e12,
        tx_count in 0u64..100_000,
        recent in 0u64..100_000,
        small in 0u64..100_000,
    ) {
        let v = vector(total_value, recent.min(tx_count), tx_count, small.min(tx_count));
        for degree in [v.t, v.i, v.f] {
            prop_assert!((0.0..=1.0).contains(&degree));
        }
    }

    #[test]
    fn fraud_score_bounded(
        truths in proptest::collection::vec(0.0f64..=1.0, 3),
        total_value in 0.0f64..1e9,
        tx_count in 1u64..10_000,
        recent in 0u64..10_000,
        small in 0u64..10_000,
    ) {
        let names = ["total_value", "recent_tx_count", "tx_count"];
        let mut scale = NeutrosophicScale::new();
        let mut criteria = Vec::new();
        for (name, t) in names.iter().zip(&truths) {
            scale = scale.with_rank(*name, *t, 0.5, 0.5);
            criteria.push(Criterion::new(*name, *name));
        }
        let weights = WeightVector::compute(&criteria, &scale).unwrap();

        let indicators = IndicatorSet {
            total_value,
            tx_count,
            recent_tx_count: recent.min(tx_count),
            unique_counterparties: 1,
            avg_tx_value: total_value / tx_count as f64,
            interactions_with_contracts: 0,
            small_tx_count: small.min(tx_count),
        };
        let result = score(&indicators, &weights).unwrap();
        prop_assert!((0.0..=1.0).contains(&result.score));
        prop_assert!((0.0..=1.0).contains(&result.raw_score));
    }
}
