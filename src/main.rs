//! NeutroSentry - wallet fraud scoring CLI
//!
//! Commands:
//! - `weights`  print SWARA weights of the criteria configuration
//! - `analyze`  score a single transaction file
//! - `score`    score every wallet file in the transactions directory
//! - `fetch`    download wallet histories from Etherscan
//! - `extract`  write the counterparties of one wallet as a wallet list
//!
//! Environment:
//!   ETHERSCAN_API_KEY     - Etherscan key (fetch / extract)
//!   NEUTRO_CRITERIA_PATH  - criteria configuration (default: data/criteria_config.json)
//!   RUST_LOG              - log level (default: info)

use chrono::Utc;
use clap::{Parser, Subcommand};
use eyre::{eyre, Result};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use neutro_sentry::core::indicators;
use neutro_sentry::providers::store::read_transactions_file;
use neutro_sentry::utils::constants::{
    APP_NAME, APP_VERSION, DEFAULT_CRITERIA_PATH, DEFAULT_ETHERSCAN_URL, DEFAULT_PROCESS_LOG,
    DEFAULT_TRANSACTIONS_DIR,
};
use neutro_sentry::utils::report::{
    counterparty_wallets, read_wallet_list, wallet_list_file_name, write_scores_csv,
    write_wallet_list,
};
use neutro_sentry::{
    score, EtherscanClient, JsonDirSource, Pipeline, ProcessLog, SentryConfig, WeightVector,
};

#[derive(Parser, Debug)]
#[command(name = "neutro_sentry", version, about = "Neutrosophic SWARA wallet fraud scoring")]
struct Cli {
    /// Criteria configuration file
    #[arg(long, env = "NEUTRO_CRITERIA_PATH", default_value = DEFAULT_CRITERIA_PATH)]
    criteria: PathBuf,

    /// Directory of <wallet>.json transaction files
    #[arg(long, env = "NEUTRO_TX_DIR", default_value = DEFAULT_TRANSACTIONS_DIR)]
    tx_dir: PathBuf,

    /// Append-only log of skipped wallets
    #[arg(long, env = "NEUTRO_PROCESS_LOG", default_value = DEFAULT_PROCESS_LOG)]
    process_log: PathBuf,

    /// Etherscan API key
    #[arg(long, env = "ETHERSCAN_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Etherscan API endpoint
    #[arg(long, env = "ETHERSCAN_API_URL", default_value = DEFAULT_ETHERSCAN_URL)]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print SWARA weights
    Weights,
    /// Score one transaction file and print the full result
    Analyze {
        /// JSON array of transactions
        file: PathBuf,
    },
    /// Score every wallet in the transactions directory
    Score {
        /// Score CSV output
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Fetch histories for a wallet list into the transactions directory
    Fetch {
        /// CSV with a wallet_address column
        #[arg(long)]
        wallets: PathBuf,
    },
    /// Write the recipients of one wallet as a new wallet list
    Extract {
        wallet: String,
        /// Output directory for the wallet list
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

impl Cli {
    fn sentry_config(&self) -> SentryConfig {
        SentryConfig {
            etherscan_api_key: self.api_key.clone(),
            etherscan_url: self.api_url.clone(),
            criteria_path: self.criteria.clone(),
            transactions_dir: self.tx_dir.clone(),
            process_log: self.process_log.clone(),
            ..SentryConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let config = cli.sentry_config();
    info!("🛡️ {} v{}", APP_NAME, APP_VERSION);

    match cli.command {
        Command::Weights => print_weights(&config),
        Command::Analyze { file } => analyze(&config, file),
        Command::Score { output } => {
            let output = output.unwrap_or_else(|| config.scores_path.clone());
            score_batch(&config, output)
        }
        Command::Fetch { wallets } => fetch(&config, wallets).await,
        Command::Extract { wallet, out_dir } => {
            let out_dir = out_dir.unwrap_or_else(|| config.wallets_dir.clone());
            extract(&config, &wallet, out_dir).await
        }
    }
}

fn print_weights(config: &SentryConfig) -> Result<()> {
    let weights = WeightVector::load(&config.criteria_path)?;
    println!("[SWARA] Weights:");
    for (name, weight) in weights.iter() {
        println!("  {}: {:.4}", name, weight);
    }
    Ok(())
}

fn analyze(config: &SentryConfig, file: PathBuf) -> Result<()> {
    let pipeline = Pipeline::from_criteria_file(&config.criteria_path)?;
    let transactions = read_transactions_file(&file)?;
    info!("📥 {} transactions in {}", transactions.len(), file.display());

    let indicators = indicators::extract_now(&transactions)?;
    let result = score(&indicators, pipeline.weights())?;
    println!("{}", result.summary());
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn score_batch(config: &SentryConfig, output: PathBuf) -> Result<()> {
    // Configuration problems stop the run before any wallet is read
    let pipeline = Pipeline::from_criteria_file(&config.criteria_path)?;

    let source = JsonDirSource::new(&config.transactions_dir);
    let wallets = source.wallets()?;
    if wallets.is_empty() {
        warn!("⚠️ No wallet files in {}", source.dir().display());
    }
    let log = ProcessLog::new(&config.process_log);

    let report = pipeline.run_batch(&source, &wallets, Utc::now(), Some(&log));
    write_scores_csv(&output, &report.rows)?;

    let [safe, suspicious, high] = report.label_counts();
    println!("\n📊 Batch Summary:");
    println!("   Scored:      {}", report.rows.len());
    println!("   Skipped:     {}", report.skipped.len());
    println!("   Safe:        {}", safe);
    println!("   Suspicious:  {}", suspicious);
    println!("   High Risk:   {}", high);
    println!("\n✅ Fraud scores saved to {}", output.display());
    if !report.skipped.is_empty() {
        println!("⚠️  Skipped wallets logged to {}", log.path().display());
    }
    Ok(())
}

async fn fetch(config: &SentryConfig, wallets_csv: PathBuf) -> Result<()> {
    let client = EtherscanClient::new(config)?;
    let store = JsonDirSource::new(&config.transactions_dir);
    let log = ProcessLog::new(&config.process_log);
    let wallets = read_wallet_list(&wallets_csv)?;

    let mut saved = 0usize;
    for wallet in &wallets {
        info!(wallet = wallet.as_str(), "📡 Fetching transactions");
        match client.fetch_transactions(wallet).await {
            Ok(txs) if txs.is_empty() => {
                warn!(wallet = wallet.as_str(), "⚠️ No transactions found")
            }
            Ok(txs) => match store.save(wallet, &txs) {
                Ok(path) => {
                    saved += 1;
                    info!(
                        wallet = wallet.as_str(),
                        "✅ Saved {} transactions to {}",
                        txs.len(),
                        path.display()
                    );
                }
                Err(e) => {
                    error!(
                        wallet = wallet.as_str(),
                        code = e.code_str(),
                        "❌ Failed saving: {}",
                        e
                    );
                    log.record_fetch_failure(wallet, &e);
                }
            },
            Err(e) => {
                error!(
                    wallet = wallet.as_str(),
                    code = e.code_str(),
                    "❌ Failed fetching: {}",
                    e
                );
                log.record_fetch_failure(wallet, &e);
            }
        }
    }

    println!("\n✅ Saved histories for {}/{} wallets", saved, wallets.len());
    Ok(())
}

async fn extract(config: &SentryConfig, wallet: &str, out_dir: PathBuf) -> Result<()> {
    let wallet = wallet.trim();
    if wallet.is_empty() {
        return Err(eyre!("Wallet address is required"));
    }

    let client = EtherscanClient::new(config)?;
    let transactions = client.fetch_transactions(wallet).await?;
    if transactions.is_empty() {
        return Err(eyre!("No transactions found for {}", wallet));
    }

    let recipients = counterparty_wallets(&transactions);
    info!("📋 Extracted {} unique 'to' addresses", recipients.len());

    let path = out_dir.join(wallet_list_file_name(wallet));
    write_wallet_list(&path, &recipients)?;
    println!("\n✅ Wallets saved to: {}", path.display());
    Ok(())
}
