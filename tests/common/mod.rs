#![allow(dead_code)]

use rust_decimal::Decimal;
use std::fs::File;
use std::io::{Error, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use transfer_ledger::domain::account::Amount;

pub fn amount(value: Decimal) -> Amount {
    Amount::new(value).expect("test amounts are positive")
}

/// Writes a command file with the standard header followed by `rows`.
pub fn command_file(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "command, account, counterparty, amount").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file
}

/// Opens `accounts` accounts with `balance` each, then shuffles money around
/// in a ring with `transfers` transfers of 1.
pub fn generate_ring_csv(path: &Path, accounts: usize, transfers: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);
    wtr.write_record(["command", "account", "counterparty", "amount"])?;

    for _ in 0..accounts {
        wtr.write_record(["open", "", "", "100.00"])?;
    }
    for i in 0..transfers {
        let from = i % accounts + 1;
        let to = (i + 1) % accounts + 1;
        wtr.write_record(["transfer", &from.to_string(), &to.to_string(), "1"])?;
    }

    wtr.flush()?;
    Ok(())
}
