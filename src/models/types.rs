//! Type definitions for NeutroSentry
//! All value objects flowing through the scoring pipeline

use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::constants::{HIGH_RISK_THRESHOLD, SUSPICIOUS_THRESHOLD};

/// One transaction record as returned by the ledger indexer.
///
/// `value` and `timeStamp` are kept optional so a missing field is reported
/// as such instead of failing deserialization of the whole history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Amount in wei, decimal string
    #[serde(default)]
    pub value: Option<String>,
    /// Unix seconds, decimal string
    #[serde(rename = "timeStamp", default)]
    pub time_stamp: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub from: String,
    /// Empty for contract creations
    #[serde(default, deserialize_with = "null_as_empty")]
    pub to: String,
    /// Calldata, `"0x"` for plain transfers
    #[serde(default, deserialize_with = "null_as_empty")]
    pub input: String,
}

/// Indexers send `null` for absent addresses
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Risk label of a scored wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLabel {
    Safe,
    Suspicious,
    #[serde(rename = "High Risk")]
    HighRisk,
}

impl RiskLabel {
    /// Classify an unrounded score
    pub fn from_score(score: f64) -> Self {
        if score > HIGH_RISK_THRESHOLD {
            RiskLabel::HighRisk
        } else if score > SUSPICIOUS_THRESHOLD {
            RiskLabel::Suspicious
        } else {
            RiskLabel::Safe
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::Safe => "Safe",
            RiskLabel::Suspicious => "Suspicious",
            RiskLabel::HighRisk => "High Risk",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            RiskLabel::Safe => "✅",
            RiskLabel::Suspicious => "⚠️",
            RiskLabel::HighRisk => "🚨",
        }
    }
}

impl std::fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Indicators computed from one wallet's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    /// Sum of transferred value (ETH)
    pub total_value: f64,
    pub tx_count: u64,
    /// Transactions inside the recency window
    pub recent_tx_count: u64,
    /// Distinct `from`/`to` addresses
    pub unique_counterparties: u64,
    /// Mean transferred value (ETH)
    pub avg_tx_value: f64,
    /// Calls into address-shaped targets with non-empty calldata
    pub interactions_with_contracts: u64,
    /// Transfers below the dust threshold
    pub small_tx_count: u64,
}

/// Truth / indeterminacy / falsity degrees, each in [0,1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeutrosophicTriple {
    pub t: f64,
    pub i: f64,
    pub f: f64,
}

/// Final per-wallet result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudResult {
    /// Score rounded for reporting
    pub score: f64,
    /// Score before rounding; the label is derived from this
    pub raw_score: f64,
    pub label: RiskLabel,
    pub vector: NeutrosophicTriple,
    pub details: IndicatorSet,
}

impl FraudResult {
    /// Pretty print the result
    pub fn summary(&self) -> String {
        let mut output = format!(
            "\n{} {} | score {:.4}\n",
            self.label.emoji(),
            self.label.as_str(),
            self.score
        );
        output.push_str(&format!(
            "   T/I/F: {:.4} / {:.4} / {:.4}\n",
            self.vector.t, self.vector.i, self.vector.f
        ));
        output.push_str(&format!(
            "   Transactions: {} ({} recent, {} dust)\n",
            self.details.tx_count, self.details.recent_tx_count, self.details.small_tx_count
        ));
        output.push_str(&format!(
            "   Total value: {:.6} ETH (avg {:.6})\n",
            self.details.total_value, self.details.avg_tx_value
        ));
        output
    }
}

/// Tabular projection of a scored wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRow {
    pub wallet_address: String,
    pub fraud_score: f64,
    pub risk_label: RiskLabel,
}

/// Wallet left out of a batch and why
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedWallet {
    pub wallet_address: String,
    pub code: String,
    pub reason: String,
}

/// Outcome of a batch run: partial rows plus the skip log
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub rows: Vec<ScoreRow>,
    pub skipped: Vec<SkippedWallet>,
}

impl BatchReport {
    /// Wallets per label, in label order Safe / Suspicious / High Risk
    pub fn label_counts(&self) -> [usize; 3] {
        let mut counts = [0usize; 3];
        for row in &self.rows {
            let idx = match row.risk_label {
                RiskLabel::Safe => 0,
                RiskLabel::Suspicious => 1,
                RiskLabel::HighRisk => 2,
            };
            counts[idx] += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_boundaries() {
        assert_eq!(RiskLabel::from_score(0.0), RiskLabel::Safe);
        assert_eq!(RiskLabel::from_score(0.4), RiskLabel::Safe);
        assert_eq!(RiskLabel::from_score(0.4000001), RiskLabel::Suspicious);
        assert_eq!(RiskLabel::from_score(0.7), RiskLabel::Suspicious);
        assert_eq!(RiskLabel::from_score(0.7000001), RiskLabel::HighRisk);
        assert_eq!(RiskLabel::from_score(1.0), RiskLabel::HighRisk);
    }

    #[test]
    fn test_label_serde() {
        let json = serde_json::to_string(&RiskLabel::HighRisk).unwrap();
        assert_eq!(json, "\"High Risk\"");
        let back: RiskLabel = serde_json::from_str("\"Suspicious\"").unwrap();
        assert_eq!(back, RiskLabel::Suspicious);
    }

    #[test]
    fn test_transaction_ignores_extra_fields() {
        let raw = r#"{
            "blockNumber": "123",
            "timeStamp": "1700000000",
            "hash": "0xabc",
            "from": "0x1111111111111111111111111111111111111111",
            "to": "0x2222222222222222222222222222222222222222",
            "value": "1000",
            "input": "0x",
            "isError": "0"
        }"#;
        let tx: Transaction = serde_json::from_str(raw).unwrap();
        assert_eq!(tx.value.as_deref(), Some("1000"));
        assert_eq!(tx.time_stamp.as_deref(), Some("1700000000"));
        assert_eq!(tx.input, "0x");
    }

    #[test]
    fn test_transaction_missing_value_still_parses() {
        let tx: Transaction = serde_json::from_str(r#"{"timeStamp": "1"}"#).unwrap();
        assert!(tx.value.is_none());
        assert!(tx.to.is_empty());
    }

    #[test]
    fn test_transaction_null_addresses_are_empty() {
        let raw = r#"{"value": "5", "timeStamp": "1", "from": null, "to": null, "input": null}"#;
        let tx: Transaction = serde_json::from_str(raw).unwrap();
        assert!(tx.from.is_empty());
        assert!(tx.to.is_empty());
        assert!(tx.input.is_empty());
    }
}
