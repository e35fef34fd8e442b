//! Transaction Sources
//!
//! The pipeline reads wallet histories through `TransactionSource`. The
//! on-disk layout is one `<wallet>.json` file per wallet holding the raw
//! indexer records.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::models::types::Transaction;

/// Supplies the transaction history of a wallet.
///
/// An empty vector means "no history"; the pipeline skips such wallets.
pub trait TransactionSource {
    fn transactions(&self, wallet: &str) -> AppResult<Vec<Transaction>>;
}

impl TransactionSource for HashMap<String, Vec<Transaction>> {
    fn transactions(&self, wallet: &str) -> AppResult<Vec<Transaction>> {
        Ok(self.get(wallet).cloned().unwrap_or_default())
    }
}

/// Directory of `<wallet>.json` transaction files
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    dir: PathBuf,
}

impl JsonDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn wallet_path(&self, wallet: &str) -> PathBuf {
        self.dir.join(format!("{}.json", wallet))
    }

    /// Wallets with a stored history, sorted for reproducible batches
    pub fn wallets(&self) -> AppResult<Vec<String>> {
        let mut wallets = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                wallets.push(stem.to_string());
            }
        }
        wallets.sort();
        info!("📂 {} wallet files in {}", wallets.len(), self.dir.display());
        Ok(wallets)
    }

    /// Store a fetched history, replacing any previous file
    pub fn save(&self, wallet: &str, transactions: &[Transaction]) -> AppResult<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.wallet_path(wallet);
        let json = serde_json::to_string_pretty(transactions)?;
        fs::write(&path, json)?;
        debug!("💾 Saved {} transactions to {}", transactions.len(), path.display());
        Ok(path)
    }
}

impl TransactionSource for JsonDirSource {
    fn transactions(&self, wallet: &str) -> AppResult<Vec<Transaction>> {
        read_transactions_file(self.wallet_path(wallet))
    }
}

/// Read a JSON array of transactions; `null` counts as an empty history
pub fn read_transactions_file(path: impl AsRef<Path>) -> AppResult<Vec<Transaction>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|e| {
        AppError::with_source(
            ErrorCode::Io,
            format!("Cannot read {}", path.display()),
            e,
        )
    })?;
    let parsed: Option<Vec<Transaction>> = serde_json::from_str(&raw).map_err(|e| {
        AppError::with_source(
            ErrorCode::TxInvalidValue,
            format!("Malformed transaction file {}", path.display()),
            e,
        )
    })?;
    Ok(parsed.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Transaction> {
        vec![Transaction {
            value: Some("1000".to_string()),
            time_stamp: Some("1700000000".to_string()),
            from: "0xaaa".to_string(),
            to: "0xbbb".to_string(),
            input: "0x".to_string(),
        }]
    }

    #[test]
    fn test_save_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonDirSource::new(dir.path());
        source.save("0xwallet", &sample()).unwrap();

        assert_eq!(source.transactions("0xwallet").unwrap(), sample());
        assert_eq!(source.wallets().unwrap(), vec!["0xwallet".to_string()]);
    }

    #[test]
    fn test_wallets_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("0xbbb.json"), "[]").unwrap();
        fs::write(dir.path().join("0xaaa.json"), "[]").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

        let source = JsonDirSource::new(dir.path());
        assert_eq!(source.wallets().unwrap(), vec!["0xaaa", "0xbbb"]);
    }

    #[test]
    fn test_null_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("0xnull.json"), "null").unwrap();
        let source = JsonDirSource::new(dir.path());
        assert!(source.transactions("0xnull").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("0xbad.json"), "{\"oops\": ").unwrap();
        let source = JsonDirSource::new(dir.path());
        let err = source.transactions("0xbad").unwrap_err();
        assert_eq!(err.code, ErrorCode::TxInvalidValue);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonDirSource::new(dir.path());
        assert_eq!(source.transactions("0xnone").unwrap_err().code, ErrorCode::Io);
    }

    #[test]
    fn test_null_addresses_do_not_reject_history() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonDirSource::new(dir.path());
        fs::write(
            source.dir().join("0xnulls.json"),
            r#"[{"value": "1", "timeStamp": "1700000000", "from": "0xaaa", "to": null}]"#,
        )
        .unwrap();
        let txs = source.transactions("0xnulls").unwrap();
        assert_eq!(txs.len(), 1);
        assert!(txs[0].to.is_empty());
    }

    #[test]
    fn test_memory_source_defaults_to_empty() {
        let mut map = HashMap::new();
        map.insert("0xaaa".to_string(), sample());
        assert_eq!(map.transactions("0xaaa").unwrap().len(), 1);
        assert!(map.transactions("0xzzz").unwrap().is_empty());
    }
}
