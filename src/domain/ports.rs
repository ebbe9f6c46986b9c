use super::account::{Account, AccountId, Amount, Balance};
use super::transaction::Transaction;
use crate::error::Result;
use async_trait::async_trait;

/// Owner of the authoritative ledger state.
///
/// Reads and account creation are single atomic operations. Every other
/// mutation goes through a [`LedgerBracket`] obtained from
/// [`LedgerStore::begin_transaction`], which holds exclusive access to the
/// whole ledger until it is committed or rolled back.
///
/// Lookups never fail for unknown accounts; absence is reported as `None`
/// or as an empty list and interpreted by the caller.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    type Bracket: LedgerBracket;

    async fn get_account(&self, id: AccountId) -> Option<Account>;

    /// Opens an active account under the next free identifier.
    async fn create_account(&self, initial_balance: Balance) -> Account;

    /// Records where `id` is sender or receiver, in recording order.
    async fn get_transactions_for_account(&self, id: AccountId) -> Vec<Transaction>;

    async fn all_accounts(&self) -> Vec<Account>;

    async fn all_transactions(&self) -> Vec<Transaction>;

    /// Waits for exclusive access and snapshots the ledger.
    async fn begin_transaction(&self) -> Result<Self::Bracket>;
}

/// An open begin..commit/rollback span over the ledger.
///
/// Writes are applied to the live state immediately. `commit` keeps them,
/// `rollback` restores the snapshot taken when the bracket was opened; both
/// release exclusive access.
pub trait LedgerBracket: Send {
    fn get_account(&self, id: AccountId) -> Option<Account>;

    /// Replaces the balance without any business-rule validation.
    fn set_balance(&mut self, id: AccountId, new_balance: Balance) -> Option<Account>;

    /// Marks the account closed without looking at its balance.
    fn close_account(&mut self, id: AccountId) -> Option<Account>;

    /// Appends a record stamped with the current time.
    fn create_transaction(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Transaction;

    fn commit(self);

    fn rollback(self);
}
