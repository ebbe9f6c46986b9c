use super::account::{Account, AccountId, Amount, Balance};
use super::transaction::Transaction;

/// A single mutation requested by a caller of the engine.
#[derive(Debug, PartialEq, Clone)]
pub enum LedgerCommand {
    Open {
        initial_balance: Balance,
    },
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: Amount,
    },
    Close {
        account: AccountId,
    },
}

/// What a successfully applied `LedgerCommand` produced.
#[derive(Debug, PartialEq, Clone)]
pub enum CommandOutcome {
    Opened(Account),
    Transferred(Transaction),
    Closed(Account),
}
