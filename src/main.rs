use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result, miette};
use paytrail::application::engine::ReconciliationEngine;
use paytrail::config::PipelineConfig;
use paytrail::domain::ports::LedgerStoreBox;
use paytrail::infrastructure::in_memory::InMemoryLedgerStore;
#[cfg(feature = "storage-rocksdb")]
use paytrail::infrastructure::rocksdb::RocksDbLedgerStore;
use paytrail::infrastructure::statement::InMemoryStatement;
use paytrail::interfaces::csv::payment_reader::PaymentReader;
use paytrail::interfaces::csv::statement_reader::StatementReader;
use paytrail::interfaces::report::SettlementReport;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Batch, validate, reconcile and settle one payment file.
    Run {
        /// Payment records CSV (`reference,amount`)
        payments: PathBuf,

        /// End-of-day bank statement CSV (`reference,amount[,value_date]`)
        #[arg(long)]
        statement: PathBuf,

        /// Bank transaction reference the employer paid with
        #[arg(long = "transaction-ref")]
        transaction_ref: String,

        /// Identity recorded as validator, reconciler and processor
        #[arg(long)]
        user: String,

        /// Pipeline configuration (TOML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Path to persistent database (optional). If provided, uses RocksDB.
        #[arg(long)]
        db_path: Option<PathBuf>,

        /// Print the settlement as JSON instead of the text report
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let Command::Run {
        payments,
        statement,
        transaction_ref,
        user,
        config,
        db_path,
        json,
    } = Cli::parse().command;

    let config = match config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };
    let engine = ReconciliationEngine::new(
        open_store(db_path.as_deref())?,
        Box::new(load_statement(&statement)?),
        &config,
    );

    let file = File::open(&payments).into_diagnostic()?;
    let mut records = Vec::new();
    for record in PaymentReader::new(file).records() {
        match record {
            Ok(record) => records.push(record),
            Err(e) => warn!("skipping payment row: {e}"),
        }
    }

    let worker = engine.create_receipt(records).await?;
    let employer = engine
        .validate(&worker.receipt_number, &transaction_ref, &user)
        .await?;
    let board = engine.reconcile(&employer.receipt_number, &user).await?;

    if !board.is_reconciled() {
        if json {
            println!("{}", serde_json::to_string_pretty(&board).into_diagnostic()?);
        } else {
            println!(
                "{} {} {} expected={} remarks={}",
                board.board_receipt_number,
                board.transaction_reference,
                board.status,
                board.expected_amount,
                board.remarks
            );
        }
        return Err(miette!(
            "reconciliation failed for employer receipt {}",
            board.employer_receipt_number
        ));
    }

    let result = engine.process(&transaction_ref, &user).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
    } else {
        print!("{}", SettlementReport(&result));
    }
    info!(transaction_reference = %transaction_ref, "run complete");
    Ok(())
}

fn load_statement(path: &Path) -> Result<InMemoryStatement> {
    let file = File::open(path).into_diagnostic()?;
    let entries = StatementReader::new(file)
        .entries()
        .collect::<paytrail::error::Result<Vec<_>>>()?;
    let statement = InMemoryStatement::new(entries);
    if statement.is_empty() {
        warn!(path = %path.display(), "bank statement has no lines; nothing can reconcile");
    } else {
        info!(lines = statement.len(), "bank statement loaded");
    }
    Ok(statement)
}

fn open_store(db_path: Option<&Path>) -> Result<LedgerStoreBox> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => Ok(Box::new(RocksDbLedgerStore::open(path)?)),
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            eprintln!(
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok(Box::new(InMemoryLedgerStore::new()))
        }
        None => Ok(Box::new(InMemoryLedgerStore::new())),
    }
}
