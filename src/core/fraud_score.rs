//! Fraud Score Aggregation
//!
//! ```text
//! raw   = w_total_value * (1 - T) + w_recent_tx_count * 2I + w_tx_count * 2F
//! score = clamp(raw, 0, 1)
//! ```
//!
//! Higher truth means lower risk, hence `1 - T`. The label is taken from the
//! unrounded score; only the reported score is rounded.

use serde::Serialize;
use tracing::debug;

use crate::core::swara::WeightVector;
use crate::models::errors::AppResult;
use crate::models::types::{FraudResult, IndicatorSet, NeutrosophicTriple, RiskLabel};
use crate::utils::constants::{
    round_score, CRITERION_RECENT_TX_COUNT, CRITERION_TOTAL_VALUE, CRITERION_TX_COUNT,
};

/// The three weights the formula reads, resolved from a `WeightVector`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreWeights {
    pub total_value: f64,
    pub recent_tx_count: f64,
    pub tx_count: f64,
}

impl ScoreWeights {
    /// Fails with a config mismatch if any required criterion is missing
    pub fn from_vector(weights: &WeightVector) -> AppResult<Self> {
        Ok(Self {
            total_value: weights.require(CRITERION_TOTAL_VALUE)?,
            recent_tx_count: weights.require(CRITERION_RECENT_TX_COUNT)?,
            tx_count: weights.require(CRITERION_TX_COUNT)?,
        })
    }

    /// Unclamped weighted combination
    pub fn combine(&self, v: &NeutrosophicTriple) -> f64 {
        self.total_value * (1.0 - v.t)
            + self.recent_tx_count * (v.i * 2.0)
            + self.tx_count * (v.f * 2.0)
    }
}

impl FraudResult {
    /// Score a wallet from its indicators
    pub fn calculate(indicators: IndicatorSet, weights: &ScoreWeights) -> Self {
        let vector = NeutrosophicTriple::from_indicators(&indicators);
        let raw = weights.combine(&vector);
        let raw_score = raw.clamp(0.0, 1.0);
        let label = RiskLabel::from_score(raw_score);

        debug!(
            t = vector.t,
            i = vector.i,
            f = vector.f,
            raw,
            label = label.as_str(),
            "fraud score"
        );

        Self {
            score: round_score(raw_score),
            raw_score,
            label,
            vector,
            details: indicators,
        }
    }
}

/// Score indicators against a full weight vector
pub fn score(indicators: &IndicatorSet, weights: &WeightVector) -> AppResult<FraudResult> {
    let resolved = ScoreWeights::from_vector(weights)?;
    Ok(FraudResult::calculate(indicators.clone(), &resolved))
}
