use crate::domain::account::Account;
use crate::domain::transaction::Transaction;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

/// Full ledger dump: every account and the complete transaction log.
#[derive(Debug, Serialize)]
pub struct LedgerReport {
    pub accounts: Vec<Account>,
    pub transactions: Vec<Transaction>,
}

impl LedgerReport {
    pub fn write_to<W: Write>(&self, sink: W) -> Result<()> {
        serde_json::to_writer_pretty(sink, self)?;
        Ok(())
    }
}
