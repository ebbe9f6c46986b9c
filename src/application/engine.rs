use crate::domain::account::{Account, AccountId, Amount, Balance};
use crate::domain::command::{CommandOutcome, LedgerCommand};
use crate::domain::ports::{LedgerBracket, LedgerStore};
use crate::domain::transaction::Transaction;
use crate::error::{LedgerError, Result};
use crate::infrastructure::in_memory::InMemoryLedgerStore;
use tracing::{debug, info};

/// Enforces the ledger's business rules on top of a [`LedgerStore`].
///
/// `TransferEngine` checks balances and account lifecycle while holding the
/// store's exclusive bracket, and rolls the bracket back on any rule violation
/// so that a failed operation leaves no trace in the ledger.
pub struct TransferEngine<S: LedgerStore = InMemoryLedgerStore> {
    store: S,
}

impl Default for TransferEngine {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl TransferEngine {
    /// Creates an engine over a fresh, empty in-memory ledger.
    pub fn in_memory() -> Self {
        Self::new(InMemoryLedgerStore::new())
    }
}

impl<S: LedgerStore> TransferEngine<S> {
    /// Creates a new `TransferEngine` backed by `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Opens an active account. Always succeeds.
    pub async fn create_account(&self, initial_balance: Balance) -> Account {
        let account = self.store.create_account(initial_balance).await;
        debug!(account = %account.id, balance = %account.balance, "account opened");
        account
    }

    pub async fn get_account(&self, id: AccountId) -> Result<Account> {
        self.store
            .get_account(id)
            .await
            .ok_or(LedgerError::AccountUnavailable(id))
    }

    /// History of `id`, oldest first. Unknown accounts have an empty history.
    pub async fn get_transactions_for_account(&self, id: AccountId) -> Vec<Transaction> {
        self.store.get_transactions_for_account(id).await
    }

    /// Closes an active account whose balance is exactly zero.
    pub async fn close_account(&self, id: AccountId) -> Result<Account> {
        let mut bracket = self.store.begin_transaction().await?;

        let balance = match bracket.get_account(id) {
            Some(account) if account.is_active() => account.balance,
            _ => return Self::reject(bracket, LedgerError::AccountUnavailable(id)),
        };

        if !balance.is_zero() {
            return Self::reject(bracket, LedgerError::BalanceNotZero(id));
        }

        let Some(closed) = bracket.close_account(id) else {
            return Self::reject(bracket, LedgerError::AccountUnavailable(id));
        };

        bracket.commit();
        debug!(account = %id, "account closed");
        Ok(closed)
    }

    /// Moves `amount` from `from` to `to` and records the transfer.
    ///
    /// Both new balances are computed before anything is written. When `from`
    /// and `to` are the same account the credit is applied on top of the
    /// debit, so a self-transfer is recorded but leaves the balance unchanged.
    pub async fn transfer_money(
        &self,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<Transaction> {
        let mut bracket = self.store.begin_transaction().await?;

        let source_balance = match bracket.get_account(from) {
            Some(account) if account.is_active() && account.balance.covers(amount) => {
                account.balance
            }
            _ => return Self::reject(bracket, LedgerError::InsufficientBalance(from)),
        };

        let target_balance = match bracket.get_account(to) {
            Some(account) if account.is_active() => account.balance,
            _ => return Self::reject(bracket, LedgerError::AccountUnavailable(to)),
        };

        let delta = Balance::from(amount);
        let Some(new_source_balance) = source_balance.checked_sub(delta) else {
            return Self::reject(bracket, LedgerError::BalanceOverflow(from));
        };
        let credited = if from == to {
            new_source_balance.checked_add(delta)
        } else {
            target_balance.checked_add(delta)
        };
        let Some(new_target_balance) = credited else {
            return Self::reject(bracket, LedgerError::BalanceOverflow(to));
        };

        let tx = bracket.create_transaction(from, to, amount);
        if bracket.set_balance(from, new_source_balance).is_none() {
            return Self::reject(bracket, LedgerError::AccountUnavailable(from));
        }
        if bracket.set_balance(to, new_target_balance).is_none() {
            return Self::reject(bracket, LedgerError::AccountUnavailable(to));
        }

        bracket.commit();
        debug!(%from, %to, %amount, "transfer applied");
        Ok(tx)
    }

    /// Applies a single command, dispatching to the matching operation.
    pub async fn execute(&self, command: LedgerCommand) -> Result<CommandOutcome> {
        match command {
            LedgerCommand::Open { initial_balance } => Ok(CommandOutcome::Opened(
                self.create_account(initial_balance).await,
            )),
            LedgerCommand::Transfer { from, to, amount } => self
                .transfer_money(from, to, amount)
                .await
                .map(CommandOutcome::Transferred),
            LedgerCommand::Close { account } => self
                .close_account(account)
                .await
                .map(CommandOutcome::Closed),
        }
    }

    /// All accounts ordered by identifier.
    pub async fn accounts(&self) -> Vec<Account> {
        self.store.all_accounts().await
    }

    /// The whole transaction log in recording order.
    pub async fn transactions(&self) -> Vec<Transaction> {
        self.store.all_transactions().await
    }

    fn reject<T>(bracket: S::Bracket, error: LedgerError) -> Result<T> {
        bracket.rollback();
        info!(%error, "operation rejected");
        Err(error)
    }
}
