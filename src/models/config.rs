//! Configuration module for NeutroSentry
//!
//! Two layers:
//! - `CriteriaConfig`: the ranked criteria and the linguistic neutrosophic
//!   scale that SWARA weighting is computed from (JSON file).
//! - `SentryConfig`: runtime paths and Etherscan settings.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::utils::constants::{
    DEFAULT_CRITERIA_PATH, DEFAULT_ETHERSCAN_URL, DEFAULT_PROCESS_LOG, DEFAULT_SCORES_PATH,
    DEFAULT_TRANSACTIONS_DIR, DEFAULT_WALLETS_DIR, ETHERSCAN_PAGE_DELAY_MS, ETHERSCAN_PAGE_SIZE,
    LEGACY_UNIT_SUFFIX,
};

/// A criterion and its linguistic importance rank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub name: String,
    pub importance: String,
}

impl Criterion {
    pub fn new(name: impl Into<String>, importance: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            importance: importance.into(),
        }
    }

    /// Name with the legacy `_eth` unit suffix removed
    pub fn normalized_name(&self) -> &str {
        self.name
            .strip_suffix(LEGACY_UNIT_SUFFIX)
            .unwrap_or(&self.name)
    }
}

/// Rank label -> reference (T, I, F) membership values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NeutrosophicScale(HashMap<String, [f64; 3]>);

impl NeutrosophicScale {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rank(mut self, rank: impl Into<String>, t: f64, i: f64, f: f64) -> Self {
        self.0.insert(rank.into(), [t, i, f]);
        self
    }

    pub fn get(&self, rank: &str) -> Option<[f64; 3]> {
        self.0.get(rank).copied()
    }

    /// Truth membership of a rank
    pub fn truth(&self, rank: &str) -> Option<f64> {
        self.get(rank).map(|[t, _, _]| t)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Criteria configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriteriaConfig {
    /// Ordered by descending importance
    pub criteria: Vec<Criterion>,
    pub neutrosophic_scale: NeutrosophicScale,
}

impl CriteriaConfig {
    /// Load and validate a criteria configuration file
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::with_source(
                ErrorCode::ConfigInvalid,
                format!("Cannot read criteria config {}", path.display()),
                e,
            )
        })?;
        let config = Self::from_json(&raw)?;
        info!(
            "📋 Loaded {} criteria from {}",
            config.criteria.len(),
            path.display()
        );
        Ok(config)
    }

    /// Parse and validate a criteria configuration document
    pub fn from_json(raw: &str) -> AppResult<Self> {
        let config: Self = serde_json::from_str(raw).map_err(|e| {
            AppError::with_source(ErrorCode::ConfigInvalid, "Malformed criteria config", e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every rank resolves and every scale value is a membership degree
    pub fn validate(&self) -> AppResult<()> {
        if self.criteria.is_empty() {
            return Err(AppError::config("Criteria list is empty"));
        }

        for (rank, triple) in &self.neutrosophic_scale.0 {
            if triple.iter().any(|v| !v.is_finite() || !(0.0..=1.0).contains(v)) {
                return Err(AppError::config(format!(
                    "Scale rank '{}' has values outside [0,1]: {:?}",
                    rank, triple
                )));
            }
        }

        for criterion in &self.criteria {
            if self.neutrosophic_scale.get(&criterion.importance).is_none() {
                return Err(AppError::config(format!(
                    "Criterion '{}' uses unknown importance rank '{}'",
                    criterion.name, criterion.importance
                )));
            }
            debug!(
                criterion = criterion.normalized_name(),
                rank = criterion.importance.as_str(),
                "criterion ok"
            );
        }

        Ok(())
    }
}

/// Runtime configuration for NeutroSentry
#[derive(Debug, Clone)]
pub struct SentryConfig {
    /// Etherscan API key (fetch commands only)
    pub etherscan_api_key: Option<String>,
    /// Etherscan API endpoint
    pub etherscan_url: String,
    /// Criteria configuration file
    pub criteria_path: PathBuf,
    /// Directory of `<wallet>.json` transaction files
    pub transactions_dir: PathBuf,
    /// Score CSV output
    pub scores_path: PathBuf,
    /// Where extracted wallet lists are written
    pub wallets_dir: PathBuf,
    /// Append-only log of skipped wallets
    pub process_log: PathBuf,
    /// Records per `txlist` page
    pub page_size: usize,
    /// Pause between page requests
    pub page_delay: Duration,
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            etherscan_api_key: None,
            etherscan_url: DEFAULT_ETHERSCAN_URL.to_string(),
            criteria_path: PathBuf::from(DEFAULT_CRITERIA_PATH),
            transactions_dir: PathBuf::from(DEFAULT_TRANSACTIONS_DIR),
            scores_path: PathBuf::from(DEFAULT_SCORES_PATH),
            wallets_dir: PathBuf::from(DEFAULT_WALLETS_DIR),
            process_log: PathBuf::from(DEFAULT_PROCESS_LOG),
            page_size: ETHERSCAN_PAGE_SIZE,
            page_delay: Duration::from_millis(ETHERSCAN_PAGE_DELAY_MS),
        }
    }
}

impl SentryConfig {
    /// API key, or a config error if fetching is attempted without one
    pub fn require_api_key(&self) -> AppResult<&str> {
        match self.etherscan_api_key.as_deref() {
            Some(key) if !key.is_empty() && key != "YOUR_API_KEY" => Ok(key),
            _ => Err(AppError::missing_api_key("ETHERSCAN_API_KEY")),
        }
    }
}
