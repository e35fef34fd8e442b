//! Indicator Extraction
//!
//! Turns one wallet's raw transaction list into an `IndicatorSet`.
//!
//! `recent_tx_count` is relative to the evaluation instant passed in by the
//! caller. Extracting the same history at two different instants can give
//! different results; that is expected, not a bug.

use alloy_primitives::{Address, U256};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use std::str::FromStr;

use crate::models::errors::{AppError, AppResult};
use crate::models::types::{IndicatorSet, Transaction};
use crate::utils::constants::{
    wei_to_eth, DUST_THRESHOLD_ETH, EMPTY_CALL_INPUT, RECENT_WINDOW_DAYS, WEI_PER_ETH,
};

/// A record after field validation
struct ParsedTx<'a> {
    value_eth: f64,
    timestamp: i64,
    tx: &'a Transaction,
}

/// Compute indicators for a non-empty history, evaluated at `now`
pub fn extract(transactions: &[Transaction], now: DateTime<Utc>) -> AppResult<IndicatorSet> {
    if transactions.is_empty() {
        return Err(AppError::empty_history());
    }

    let parsed = transactions
        .iter()
        .enumerate()
        .map(|(idx, tx)| parse_record(idx, tx))
        .collect::<AppResult<Vec<_>>>()?;

    let cutoff = (now - Duration::days(RECENT_WINDOW_DAYS)).timestamp();

    let tx_count = parsed.len() as u64;
    let total_value: f64 = parsed.iter().map(|p| p.value_eth).sum();
    let recent_tx_count = parsed.iter().filter(|p| p.timestamp > cutoff).count() as u64;
    let small_tx_count = parsed
        .iter()
        .filter(|p| p.value_eth < DUST_THRESHOLD_ETH)
        .count() as u64;
    let interactions_with_contracts = parsed
        .iter()
        .filter(|p| is_contract_call(p.tx))
        .count() as u64;

    let counterparties: HashSet<String> = parsed
        .iter()
        .flat_map(|p| [p.tx.from.as_str(), p.tx.to.as_str()])
        .filter(|addr| !addr.is_empty())
        .map(|addr| addr.to_lowercase())
        .collect();

    Ok(IndicatorSet {
        total_value,
        tx_count,
        recent_tx_count,
        unique_counterparties: counterparties.len() as u64,
        avg_tx_value: total_value / tx_count as f64,
        interactions_with_contracts,
        small_tx_count,
    })
}

/// Compute indicators relative to the current wall clock
pub fn extract_now(transactions: &[Transaction]) -> AppResult<IndicatorSet> {
    extract(transactions, Utc::now())
}

fn parse_record(idx: usize, tx: &Transaction) -> AppResult<ParsedTx<'_>> {
    let raw_value = tx
        .value
        .as_deref()
        .ok_or_else(|| AppError::missing_field("value", idx))?;
    let raw_ts = tx
        .time_stamp
        .as_deref()
        .ok_or_else(|| AppError::missing_field("timeStamp", idx))?;

    let value_eth =
        parse_value_eth(raw_value).ok_or_else(|| AppError::invalid_value("value", idx, raw_value))?;
    let timestamp = raw_ts
        .trim()
        .parse::<i64>()
        .map_err(|_| AppError::invalid_value("timeStamp", idx, raw_ts))?;

    Ok(ParsedTx {
        value_eth,
        timestamp,
        tx,
    })
}

/// Wei amount to ETH. Integer strings go through `U256`; other numeric
/// notations (e.g. `"1e18"`) are accepted as long as they are finite and
/// non-negative.
fn parse_value_eth(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(wei) = U256::from_str_radix(raw, 10) {
        return Some(wei_to_eth(wei));
    }
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|wei| wei / WEI_PER_ETH)
}

/// Call into a `0x`-prefixed address carrying calldata
fn is_contract_call(tx: &Transaction) -> bool {
    tx.to.starts_with("0x")
        && Address::from_str(&tx.to).is_ok()
        && !tx.input.is_empty()
        && tx.input != EMPTY_CALL_INPUT
}
