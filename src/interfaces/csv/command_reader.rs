use crate::domain::account::{AccountId, Amount, Balance};
use crate::domain::command::LedgerCommand;
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use std::str::FromStr;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum CommandType {
    Open,
    Transfer,
    Close,
}

/// One raw CSV row: `command, account, counterparty, amount`.
#[derive(Debug, Deserialize)]
struct CommandRecord {
    command: CommandType,
    account: Option<u64>,
    counterparty: Option<u64>,
    // Parsed by hand: going through serde's number inference would drop the scale.
    amount: Option<String>,
}

fn required<T>(field: Option<T>, name: &str, command: CommandType) -> Result<T> {
    field.ok_or_else(|| {
        LedgerError::ValidationError(format!("{command:?} command requires `{name}`"))
    })
}

fn parse_amount(raw: Option<String>, command: CommandType) -> Result<Decimal> {
    let raw = required(raw, "amount", command)?;
    Decimal::from_str(&raw)
        .map_err(|e| LedgerError::ValidationError(format!("invalid amount `{raw}`: {e}")))
}

impl TryFrom<CommandRecord> for LedgerCommand {
    type Error = LedgerError;

    fn try_from(record: CommandRecord) -> Result<Self> {
        let kind = record.command;
        match kind {
            CommandType::Open => Ok(LedgerCommand::Open {
                initial_balance: Balance::try_from(parse_amount(record.amount, kind)?)?,
            }),
            CommandType::Transfer => Ok(LedgerCommand::Transfer {
                from: AccountId(required(record.account, "account", kind)?),
                to: AccountId(required(record.counterparty, "counterparty", kind)?),
                amount: Amount::new(parse_amount(record.amount, kind)?)?,
            }),
            CommandType::Close => Ok(LedgerCommand::Close {
                account: AccountId(required(record.account, "account", kind)?),
            }),
        }
    }
}

/// Reads ledger commands from a CSV source.
///
/// Whitespace is trimmed and trailing columns may be omitted, so
/// `close, 3` is as valid as `close, 3, , `.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    /// Creates a new `CommandReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and validates commands.
    ///
    /// A bad row yields an error for that row only; reading continues.
    pub fn commands(self) -> impl Iterator<Item = Result<LedgerCommand>> {
        self.reader.into_deserialize().map(|result| {
            let record: CommandRecord = result?;
            LedgerCommand::try_from(record)
        })
    }
}
