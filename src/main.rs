use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use transfer_ledger::domain::account::Balance;
use transfer_ledger::interfaces::csv::account_writer::AccountWriter;
use transfer_ledger::interfaces::csv::command_reader::CommandReader;
use transfer_ledger::interfaces::json::LedgerReport;
use transfer_ledger::{InMemoryLedgerStore, LedgerConfig, TransferEngine, telemetry};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Final accounts as `id,balance,status` rows
    Csv,
    /// Accounts and the full transaction log as JSON
    Json,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input commands CSV file
    input: PathBuf,

    /// Give up on a transfer or close after waiting this long for the ledger lock
    #[arg(long, value_name = "MS")]
    lock_timeout_ms: Option<u64>,

    /// Open an account with this balance before processing the input (repeatable)
    #[arg(long = "seed", value_name = "BALANCE", value_parser = parse_balance)]
    seed: Vec<Balance>,

    /// Output format for the final ledger
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,
}

fn parse_balance(raw: &str) -> std::result::Result<Balance, String> {
    let value = Decimal::from_str(raw).map_err(|e| e.to_string())?;
    Balance::try_from(value).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();
    let cli = Cli::parse();

    let mut config = LedgerConfig::default().with_opening_balances(cli.seed);
    if let Some(ms) = cli.lock_timeout_ms {
        config = config.with_lock_timeout(Duration::from_millis(ms));
    }
    let engine = TransferEngine::new(InMemoryLedgerStore::with_config(config));

    // Apply commands in file order
    let file = File::open(cli.input).into_diagnostic()?;
    let reader = CommandReader::new(file);
    for command in reader.commands() {
        match command {
            Ok(command) => {
                if let Err(e) = engine.execute(command).await {
                    eprintln!("Error processing command: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading command: {}", e);
            }
        }
    }

    let accounts = engine.accounts().await;
    let stdout = io::stdout();
    match cli.format {
        OutputFormat::Csv => {
            let mut writer = AccountWriter::new(stdout.lock());
            writer.write_accounts(accounts).into_diagnostic()?;
        }
        OutputFormat::Json => {
            let report = LedgerReport {
                accounts,
                transactions: engine.transactions().await,
            };
            report.write_to(stdout.lock()).into_diagnostic()?;
            println!();
        }
    }

    Ok(())
}
