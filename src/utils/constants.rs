//! Constants Module - Single Source of Truth
//!
//! Every numeric convention of the scoring pipeline lives here. Changing any
//! of these changes classification outcomes.

use alloy_primitives::U256;

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "NeutroSentry";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent for HTTP requests
pub const USER_AGENT: &str = "NeutroSentry/0.1.0";

// ============================================
// UNIT CONVERSION
// ============================================

/// Smallest-unit to whole-coin divisor (wei per ETH)
pub const WEI_PER_ETH: f64 = 1e18;

/// Convert wei to ETH over the full `U256` range
#[inline]
pub fn wei_to_eth(wei: U256) -> f64 {
    let wei_f64 = wei
        .as_limbs()
        .iter()
        .rev()
        .fold(0.0_f64, |acc, limb| acc * 18_446_744_073_709_551_616.0 + *limb as f64);
    wei_f64 / WEI_PER_ETH
}

// ============================================
// INDICATOR CONSTANTS
// ============================================

/// Transfers below this many ETH count as dust
pub const DUST_THRESHOLD_ETH: f64 = 0.001;

/// Recency window for `recent_tx_count`
pub const RECENT_WINDOW_DAYS: i64 = 30;

/// Calldata marker of a plain value transfer
pub const EMPTY_CALL_INPUT: &str = "0x";

// ============================================
// SWARA / NEUTROSOPHIC CONSTANTS
// ============================================

/// Added to every SWARA k_j so a zero truth value never divides by zero
pub const SWARA_EPSILON: f64 = 1e-9;

/// `F` saturates at this many lifetime transactions
pub const FALSITY_SATURATION_TX: f64 = 500.0;

/// Indeterminacy when recent activity is sparse (< 5)
pub const INDETERMINACY_SPARSE: f64 = 0.9;
/// Indeterminacy when recent activity is moderate (5..10)
pub const INDETERMINACY_MODERATE: f64 = 0.3;
/// Indeterminacy when recent activity is abundant (>= 10)
pub const INDETERMINACY_ABUNDANT: f64 = 0.1;

pub const SPARSE_RECENT_TX: u64 = 5;
pub const MODERATE_RECENT_TX: u64 = 10;

// ============================================
// SCORE CONSTANTS
// ============================================

/// Scores strictly above this are "High Risk"
pub const HIGH_RISK_THRESHOLD: f64 = 0.7;

/// Scores strictly above this (and not high risk) are "Suspicious"
pub const SUSPICIOUS_THRESHOLD: f64 = 0.4;

/// Decimal places of the reported score
pub const SCORE_DECIMALS: i32 = 4;

/// Criterion names the score formula binds to
pub const CRITERION_TOTAL_VALUE: &str = "total_value";
pub const CRITERION_RECENT_TX_COUNT: &str = "recent_tx_count";
pub const CRITERION_TX_COUNT: &str = "tx_count";

/// All criteria the aggregator requires
pub const REQUIRED_CRITERIA: [&str; 3] = [
    CRITERION_TOTAL_VALUE,
    CRITERION_RECENT_TX_COUNT,
    CRITERION_TX_COUNT,
];

/// Legacy suffix stripped from configured criterion names
pub const LEGACY_UNIT_SUFFIX: &str = "_eth";

// ============================================
// ETHERSCAN CONSTANTS
// ============================================

/// Default Etherscan API endpoint
pub const DEFAULT_ETHERSCAN_URL: &str = "https://api.etherscan.io/api";

/// Records per `txlist` page
pub const ETHERSCAN_PAGE_SIZE: usize = 1000;

/// Pause between page requests (4 calls/sec max)
pub const ETHERSCAN_PAGE_DELAY_MS: u64 = 250;

/// Timeout for a single Etherscan request (seconds)
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// `txlist` block range
pub const START_BLOCK: u64 = 0;
pub const END_BLOCK: u64 = 99_999_999;

// ============================================
// DEFAULT PATHS
// ============================================

pub const DEFAULT_CRITERIA_PATH: &str = "data/criteria_config.json";
pub const DEFAULT_TRANSACTIONS_DIR: &str = "data/transactions";
pub const DEFAULT_SCORES_PATH: &str = "data/scores/fraud_scores.csv";
pub const DEFAULT_WALLETS_DIR: &str = "data/input";
pub const DEFAULT_PROCESS_LOG: &str = "logs/process_log.txt";

/// Round a score to the reporting precision
#[inline]
pub fn round_score(score: f64) -> f64 {
    let factor = 10f64.powi(SCORE_DECIMALS);
    (score * factor).round() / factor
}
