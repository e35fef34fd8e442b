//! NeutroSentry Library
//!
//! Explainable wallet fraud scoring from a batch of fetched transactions:
//! - SWARA criterion weights from a ranked criteria configuration
//! - Wallet indicators (value, activity, dust, contract calls)
//! - Neutrosophic (truth, indeterminacy, falsity) risk vector
//! - Bounded fraud score with Safe / Suspicious / High Risk labels

pub mod core;
pub mod models;
pub mod providers;
pub mod utils;

pub use crate::core::{score, Pipeline, ScoreWeights, WeightVector};
pub use models::{
    AppError, AppResult, BatchReport, CriteriaConfig, Criterion, ErrorCode, FraudResult,
    IndicatorSet, NeutrosophicScale, NeutrosophicTriple, RiskLabel, ScoreRow, SentryConfig,
    SkippedWallet, Transaction,
};
pub use providers::{EtherscanClient, JsonDirSource, TransactionSource};
pub use utils::report::ProcessLog;
