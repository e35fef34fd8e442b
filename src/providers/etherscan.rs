//! Etherscan Client - wallet transaction history
//!
//! 1. `account/txlist` paging (1000 records per page, ascending)
//! 2. Exponential backoff with jitter on rate limits and transport errors
//! 3. User-Agent header, gzip, request timeout
//! 4. The API key is sent as a query parameter and never logged

use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING, USER_AGENT};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::models::config::SentryConfig;
use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::models::types::Transaction;
use crate::utils::constants::{
    DEFAULT_HTTP_TIMEOUT_SECS, END_BLOCK, START_BLOCK, USER_AGENT as USER_AGENT_CONST,
};

/// Base retry delay in milliseconds
pub const BASE_RETRY_MS: u64 = 1000;

/// Maximum retry delay in milliseconds
pub const MAX_RETRY_MS: u64 = 16000;

/// Maximum attempts per page (1s→2s→4s→8s→16s)
pub const MAX_RETRIES: u32 = 5;

/// Jitter percentage for retry delay
pub const RETRY_JITTER_PERCENT: u64 = 20;

const NO_TRANSACTIONS_MESSAGE: &str = "No transactions found";

/// Raw Etherscan envelope; `result` is an array on success and a string on error
#[derive(Debug, Clone, Deserialize)]
pub struct EtherscanResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub result: serde_json::Value,
}

impl EtherscanResponse {
    /// Records of a page, empty for "no transactions", error otherwise
    pub fn into_transactions(self) -> AppResult<Vec<Transaction>> {
        if self.status == "1" {
            return serde_json::from_value(self.result).map_err(|e| {
                AppError::invalid_response(format!("Unexpected txlist result: {}", e))
            });
        }

        let detail = match &self.result {
            serde_json::Value::String(s) => s.clone(),
            _ => String::new(),
        };

        if self.message.starts_with(NO_TRANSACTIONS_MESSAGE) {
            return Ok(Vec::new());
        }

        let text = format!("{} {}", self.message, detail);
        if text.to_lowercase().contains("rate limit") {
            Err(AppError::fetch_rate_limited(text.trim().to_string()))
        } else {
            Err(AppError::fetch_rejected(format!(
                "Etherscan API error: {}",
                text.trim()
            )))
        }
    }
}

/// Etherscan HTTP client
#[derive(Clone)]
pub struct EtherscanClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    page_size: usize,
    page_delay: Duration,
}

impl EtherscanClient {
    /// Create a client from runtime configuration
    pub fn new(config: &SentryConfig) -> AppResult<Self> {
        let api_key = config.require_api_key()?.to_string();
        info!("🔑 Using ETHERSCAN_API_KEY (key hidden)");

        Ok(Self {
            client: Self::build_client()?,
            base_url: config.etherscan_url.clone(),
            api_key,
            page_size: config.page_size.max(1),
            page_delay: config.page_delay,
        })
    }

    /// Build HTTP client with custom headers
    fn build_client() -> AppResult<reqwest::Client> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_CONST));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));

        reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS))
            .gzip(true)
            .build()
            .map_err(|e| AppError::fetch_failed(format!("Failed to build HTTP client: {}", e)))
    }

    /// Full normal-transaction history of an address
    pub async fn fetch_transactions(&self, address: &str) -> AppResult<Vec<Transaction>> {
        let mut all = Vec::new();
        let mut page = 1usize;

        loop {
            let batch = match self.fetch_page_with_retry(address, page).await {
                Ok(batch) => batch,
                // keep what earlier pages returned
                Err(e) if page > 1 => {
                    warn!("⚠️ {} page {}: {}; keeping {} records", address, page, e, all.len());
                    break;
                }
                Err(e) => return Err(e),
            };

            let len = batch.len();
            all.extend(batch);
            debug!("📄 {} page {}: {} records", address, page, len);

            if len < self.page_size {
                break;
            }
            page += 1;
            tokio::time::sleep(self.page_delay).await;
        }

        info!("✅ Fetched {} transactions for {}", all.len(), address);
        Ok(all)
    }

    /// One page with exponential backoff and jitter
    async fn fetch_page_with_retry(
        &self,
        address: &str,
        page: usize,
    ) -> AppResult<Vec<Transaction>> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = retry_delay_ms(attempt);
                debug!("⏳ Retry {}/{} after {}ms", attempt + 1, MAX_RETRIES, delay);
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }

            match self.fetch_page(address, page).await {
                Ok(batch) => return Ok(batch),
                Err(e) if e.code.is_retryable() => {
                    if e.code == ErrorCode::FetchRateLimited {
                        warn!(
                            "⏳ Rate limited, backing off (attempt {}/{})",
                            attempt + 1,
                            MAX_RETRIES
                        );
                    }
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            AppError::fetch_failed(format!("Unknown error after {} retries", MAX_RETRIES))
        }))
    }

    async fn fetch_page(&self, address: &str, page: usize) -> AppResult<Vec<Transaction>> {
        let start_block = START_BLOCK.to_string();
        let end_block = END_BLOCK.to_string();
        let page = page.to_string();
        let offset = self.page_size.to_string();

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("module", "account"),
                ("action", "txlist"),
                ("address", address),
                ("startblock", start_block.as_str()),
                ("endblock", end_block.as_str()),
                ("page", page.as_str()),
                ("offset", offset.as_str()),
                ("sort", "asc"),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(AppError::fetch_rate_limited("Rate limited (HTTP 429)"));
        }
        if !status.is_success() {
            return Err(AppError::fetch_failed(format!("HTTP error: {}", status)));
        }

        let body: EtherscanResponse = response.json().await?;
        body.into_transactions()
    }
}

/// Backoff for a retry attempt (1-based), ±jitter, at least 100ms
pub fn retry_delay_ms(attempt: u32) -> u64 {
    let base_delay = BASE_RETRY_MS.saturating_mul(2_u64.saturating_pow(attempt.saturating_sub(1)));
    let capped_delay = base_delay.min(MAX_RETRY_MS);
    let jitter_range = (capped_delay * RETRY_JITTER_PERCENT) / 100;
    let jitter: i64 = rand::thread_rng().gen_range(-(jitter_range as i64)..=(jitter_range as i64));
    (capped_delay as i64 + jitter).max(100) as u64
}
