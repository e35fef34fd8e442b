//! Tabular I/O and the process log
//!
//! - wallet lists: single-column CSV with a `wallet_address` header
//! - score export: `wallet_address,fraud_score,risk_label`
//! - process log: append-only text file, one line per skipped wallet

use chrono::{SecondsFormat, Utc};
use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::models::types::{ScoreRow, SkippedWallet, Transaction};

pub const WALLET_LIST_HEADER: &str = "wallet_address";
pub const SCORES_HEADER: &str = "wallet_address,fraud_score,risk_label";

fn ensure_parent(path: &Path) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Read a wallet list CSV (first column, header optional, blanks skipped)
pub fn read_wallet_list(path: impl AsRef<Path>) -> AppResult<Vec<String>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|e| {
        AppError::with_source(
            ErrorCode::Io,
            format!("Cannot read wallet list {}", path.display()),
            e,
        )
    })?;

    Ok(raw
        .lines()
        .filter_map(|line| line.split(',').next())
        .map(|cell| cell.trim().trim_matches('"'))
        .filter(|cell| !cell.is_empty() && *cell != WALLET_LIST_HEADER)
        .map(String::from)
        .collect())
}

/// Write a wallet list CSV
pub fn write_wallet_list(path: impl AsRef<Path>, wallets: &[String]) -> AppResult<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let mut out = String::from(WALLET_LIST_HEADER);
    out.push('\n');
    for wallet in wallets {
        out.push_str(wallet);
        out.push('\n');
    }
    fs::write(path, out)?;
    Ok(())
}

/// Format one score CSV row
pub fn score_csv_row(row: &ScoreRow) -> String {
    format!(
        "{},{:.4},{}\n",
        row.wallet_address,
        row.fraud_score,
        row.risk_label.as_str()
    )
}

/// Write the score export, rows in the given order
pub fn write_scores_csv(path: impl AsRef<Path>, rows: &[ScoreRow]) -> AppResult<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let mut out = String::from(SCORES_HEADER);
    out.push('\n');
    for row in rows {
        out.push_str(&score_csv_row(row));
    }
    fs::write(path, out)?;
    Ok(())
}

/// Distinct non-empty recipients of a history, sorted
pub fn counterparty_wallets(transactions: &[Transaction]) -> Vec<String> {
    transactions
        .iter()
        .map(|tx| tx.to.trim())
        .filter(|to| !to.is_empty())
        .map(String::from)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// `wallets_<first6>...<last4>.csv`
pub fn wallet_list_file_name(wallet: &str) -> String {
    let chars: Vec<char> = wallet.chars().collect();
    let head: String = chars.iter().take(6).collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("wallets_{}...{}.csv", head, tail)
}

/// Append-only log of wallets the batch could not process
#[derive(Debug, Clone)]
pub struct ProcessLog {
    path: PathBuf,
}

impl ProcessLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one timestamped line
    pub fn append(&self, line: &str) -> AppResult<()> {
        ensure_parent(&self.path)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let ts = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        writeln!(file, "{} {}", ts, line)?;
        Ok(())
    }

    /// Record a wallet skipped while scoring
    pub fn record_skip(&self, skipped: &SkippedWallet) {
        let line = format!(
            "Failed to score {}: [{}] {}",
            skipped.wallet_address, skipped.code, skipped.reason
        );
        if let Err(e) = self.append(&line) {
            warn!("⚠️ Could not write process log {}: {}", self.path.display(), e);
        }
    }

    /// Record a wallet whose history could not be fetched
    pub fn record_fetch_failure(&self, wallet: &str, err: &AppError) {
        let line = format!("Failed to fetch for {}: [{}] {}", wallet, err.code_str(), err.reason());
        if let Err(e) = self.append(&line) {
            warn!("⚠️ Could not write process log {}: {}", self.path.display(), e);
        }
    }
}
