//! Centralized Error Handling Module
//!
//! Every failure carries a unique error code so skipped wallets can be
//! traced in the process log.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - CFG_xxx: Criteria / runtime configuration errors (fatal to a batch)
//! - TX_xxx: Malformed or empty wallet history (skip the wallet)
//! - FETCH_xxx: Etherscan fetch errors (skip the wallet)

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    /// Message plus the underlying cause, if any
    pub fn reason(&self) -> String {
        match &self.source {
            Some(src) => format!("{}: {}", self.message, src),
            None => self.message.clone(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Configuration Errors
    // ============================================
    /// Criteria configuration missing, malformed or inconsistent
    ConfigInvalid,
    /// Weight vector lacks a criterion the score formula needs
    ConfigMismatch,
    /// Missing Etherscan API key
    ConfigMissingApiKey,

    // ============================================
    // Transaction Errors
    // ============================================
    /// `value` or `timeStamp` absent from a record
    TxMissingField,
    /// `value` / `timeStamp` not parseable
    TxInvalidValue,
    /// Wallet has no transactions
    TxEmptyHistory,

    // ============================================
    // External Fetch Errors
    // ============================================
    /// Etherscan request failed
    FetchFailed,
    /// Etherscan answered with an error status
    FetchRejected,
    /// Etherscan rate limit hit
    FetchRateLimited,
    /// Etherscan request timeout
    FetchTimeout,
    /// Etherscan response could not be understood
    FetchInvalidResponse,

    // ============================================
    // Generic Errors
    // ============================================
    /// Filesystem error
    Io,
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigInvalid => "CFG_INVALID",
            Self::ConfigMismatch => "CFG_MISMATCH",
            Self::ConfigMissingApiKey => "CFG_MISSING_API_KEY",

            Self::TxMissingField => "TX_MISSING_FIELD",
            Self::TxInvalidValue => "TX_INVALID_VALUE",
            Self::TxEmptyHistory => "TX_EMPTY_HISTORY",

            Self::FetchFailed => "FETCH_FAILED",
            Self::FetchRejected => "FETCH_REJECTED",
            Self::FetchRateLimited => "FETCH_RATE_LIMITED",
            Self::FetchTimeout => "FETCH_TIMEOUT",
            Self::FetchInvalidResponse => "FETCH_INVALID_RESPONSE",

            Self::Io => "IO_ERROR",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Configuration errors abort a batch before any wallet is scored
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ConfigInvalid | Self::ConfigMismatch | Self::ConfigMissingApiKey
        )
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::FetchRateLimited | Self::FetchTimeout | Self::FetchFailed
        )
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Malformed or missing criteria configuration
    pub fn config(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalid, msg)
    }

    /// Weight vector and score formula disagree on a criterion name
    pub fn config_mismatch(criterion: &str) -> Self {
        Self::new(
            ErrorCode::ConfigMismatch,
            format!("Weight vector has no criterion named '{}'", criterion),
        )
    }

    /// Missing API key
    pub fn missing_api_key(key_name: &str) -> Self {
        Self::new(
            ErrorCode::ConfigMissingApiKey,
            format!("Missing API key: {}", key_name),
        )
    }

    /// Transaction record lacks a required field
    pub fn missing_field(field: &str, index: usize) -> Self {
        Self::new(
            ErrorCode::TxMissingField,
            format!("Transaction #{} has no '{}' field", index, field),
        )
    }

    /// Transaction field could not be parsed
    pub fn invalid_value(field: &str, index: usize, raw: &str) -> Self {
        Self::new(
            ErrorCode::TxInvalidValue,
            format!("Transaction #{} has invalid '{}': {:?}", index, field, raw),
        )
    }

    /// Wallet has no transaction history
    pub fn empty_history() -> Self {
        Self::new(ErrorCode::TxEmptyHistory, "No transactions to score")
    }

    /// Fetch failed
    pub fn fetch_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::FetchFailed, msg)
    }

    /// Indexer refused the request
    pub fn fetch_rejected(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::FetchRejected, msg)
    }

    /// Rate limited by the indexer
    pub fn fetch_rate_limited(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::FetchRateLimited, msg)
    }

    /// Unexpected indexer response
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::FetchInvalidResponse, msg)
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        Self::new(ErrorCode::Unknown, err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorCode::Io, "IO error", err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::new(ErrorCode::FetchTimeout, "Request timeout")
        } else if err.is_connect() {
            Self::new(ErrorCode::FetchFailed, "Connection failed")
        } else if err.is_decode() {
            Self::new(ErrorCode::FetchInvalidResponse, err.to_string())
        } else {
            Self::new(ErrorCode::FetchFailed, err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::FetchInvalidResponse, "JSON parse error", err)
    }
}
