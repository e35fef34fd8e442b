//! Scoring Pipeline
//!
//! Per wallet: transactions -> indicators -> fraud result. The weight vector is
//! resolved once when the pipeline is built, so a criteria configuration that
//! does not match the score formula fails before any wallet is touched.
//!
//! Per-wallet failures never abort a batch: the wallet is logged and left out
//! of the output rows.

use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::{error, info, warn};

use crate::core::fraud_score::ScoreWeights;
use crate::core::indicators;
use crate::core::swara::WeightVector;
use crate::models::errors::AppResult;
use crate::models::types::{BatchReport, FraudResult, ScoreRow, SkippedWallet, Transaction};
use crate::providers::store::TransactionSource;
use crate::utils::constants::REQUIRED_CRITERIA;
use crate::utils::report::ProcessLog;

/// Once-per-batch scoring context
#[derive(Debug, Clone)]
pub struct Pipeline {
    weights: WeightVector,
    resolved: ScoreWeights,
}

impl Pipeline {
    /// Build from a weight vector; fails on a criteria / formula mismatch
    pub fn new(weights: WeightVector) -> AppResult<Self> {
        weights.ensure_contains(&REQUIRED_CRITERIA)?;
        let resolved = ScoreWeights::from_vector(&weights)?;
        Ok(Self { weights, resolved })
    }

    /// Load criteria from disk and build the pipeline
    pub fn from_criteria_file(path: impl AsRef<Path>) -> AppResult<Self> {
        Self::new(WeightVector::load(path)?)
    }

    pub fn weights(&self) -> &WeightVector {
        &self.weights
    }

    /// Score one wallet's history at `now`
    pub fn score_transactions(
        &self,
        transactions: &[Transaction],
        now: DateTime<Utc>,
    ) -> AppResult<FraudResult> {
        let indicators = indicators::extract(transactions, now)?;
        Ok(FraudResult::calculate(indicators, &self.resolved))
    }

    /// Fetch and score one wallet, projected to a score row
    pub fn score_wallet<S: TransactionSource + ?Sized>(
        &self,
        source: &S,
        wallet: &str,
        now: DateTime<Utc>,
    ) -> AppResult<ScoreRow> {
        let transactions = source.transactions(wallet)?;
        let result = self.score_transactions(&transactions, now)?;
        Ok(ScoreRow {
            wallet_address: wallet.to_string(),
            fraud_score: result.score,
            risk_label: result.label,
        })
    }

    /// Score every wallet in order; failures go to `skipped` and the process log
    pub fn run_batch<S: TransactionSource + ?Sized>(
        &self,
        source: &S,
        wallets: &[String],
        now: DateTime<Utc>,
        log: Option<&ProcessLog>,
    ) -> BatchReport {
        let mut report = BatchReport::default();

        for wallet in wallets {
            info!(wallet = wallet.as_str(), "🔍 Scoring wallet");
            match self.score_wallet(source, wallet, now) {
                Ok(row) => {
                    info!(
                        wallet = wallet.as_str(),
                        score = row.fraud_score,
                        label = row.risk_label.as_str(),
                        "{} scored",
                        row.risk_label.emoji()
                    );
                    report.rows.push(row);
                }
                Err(e) => {
                    if e.code.is_fatal() {
                        error!(wallet = wallet.as_str(), code = e.code_str(), "❌ {}", e);
                    } else {
                        warn!(
                            wallet = wallet.as_str(),
                            code = e.code_str(),
                            "⚠️ Skipped: {}",
                            e
                        );
                    }
                    let skipped = SkippedWallet {
                        wallet_address: wallet.clone(),
                        code: e.code_str().to_string(),
                        reason: e.reason(),
                    };
                    if let Some(log) = log {
                        log.record_skip(&skipped);
                    }
                    report.skipped.push(skipped);
                }
            }
        }

        info!(
            "📊 Batch done: {} scored, {} skipped",
            report.rows.len(),
            report.skipped.len()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::{Criterion, NeutrosophicScale};
    use crate::models::errors::ErrorCode;
    use crate::models::types::RiskLabel;
    use chrono::{Duration, TimeZone};
    use std::collections::HashMap;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn scale() -> NeutrosophicScale {
        NeutrosophicScale::new()
            .with_rank("Very Important", 0.9, 0.1, 0.1)
            .with_rank("Important", 0.75, 0.25, 0.2)
            .with_rank("Moderately Important", 0.5, 0.5, 0.5)
    }

    fn pipeline() -> Pipeline {
        let weights = WeightVector::compute(
            &[
                Criterion::new("total_value_eth", "Very Important"),
                Criterion::new("recent_tx_count", "Important"),
                Criterion::new("tx_count", "Moderately Important"),
            ],
            &scale(),
        )
        .unwrap();
        Pipeline::new(weights).unwrap()
    }

    fn history(n: usize, wei: &str, days_ago: i64) -> Vec<Transaction> {
        (0..n)
            .map(|_| Transaction {
                value: Some(wei.to_string()),
                time_stamp: Some((now() - Duration::days(days_ago)).timestamp().to_string()),
                from: "0x1111111111111111111111111111111111111111".to_string(),
                to: "0x2222222222222222222222222222222222222222".to_string(),
                input: "0x".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_mismatch_fails_at_build() {
        let weights = WeightVector::compute(
            &[
                Criterion::new("total_value", "Very Important"),
                Criterion::new("recent_tx_count", "Important"),
            ],
            &scale(),
        )
        .unwrap();
        let err = Pipeline::new(weights).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigMismatch);
    }

    #[test]
    fn test_batch_skips_failures_and_keeps_order() {
        let mut source: HashMap<String, Vec<Transaction>> = HashMap::new();
        source.insert("0xclean".to_string(), history(10, "500000000000000000", 10));
        source.insert("0xdust".to_string(), history(20, "1", 2));
        let mut broken = history(1, "1", 1);
        broken[0].time_stamp = None;
        source.insert("0xbroken".to_string(), broken);

        let wallets: Vec<String> = ["0xdust", "0xempty", "0xclean", "0xbroken"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let report = pipeline().run_batch(&source, &wallets, now(), None);

        let scored: Vec<&str> = report.rows.iter().map(|r| r.wallet_address.as_str()).collect();
        assert_eq!(scored, vec!["0xdust", "0xclean"]);
        assert_eq!(report.rows[1].risk_label, RiskLabel::Safe);
        assert!(report.rows[0].fraud_score > report.rows[1].fraud_score);

        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.skipped[0].wallet_address, "0xempty");
        assert_eq!(report.skipped[0].code, "TX_EMPTY_HISTORY");
        assert_eq!(report.skipped[1].code, "TX_MISSING_FIELD");
    }

    #[test]
    fn test_score_transactions_matches_reference_values() {
        let result = pipeline()
            .score_transactions(&history(10, "500000000000000000", 10), now())
            .unwrap();
        assert_eq!(result.vector.t, 1.0);
        assert_eq!(result.vector.i, 0.1);
        assert!((result.vector.f - 0.02).abs() < 1e-12);
        assert!((result.details.total_value - 5.0).abs() < 1e-9);
    }
}
