use crate::config::LedgerConfig;
use crate::domain::account::{Account, AccountId, AccountStatus, Amount, Balance};
use crate::domain::ports::{LedgerBracket, LedgerStore};
use crate::domain::transaction::Transaction;
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};
use tracing::{debug, trace, warn};

/// Accounts and transaction log, guarded together as one unit.
#[derive(Debug, Default)]
struct LedgerState {
    accounts: BTreeMap<AccountId, Account>,
    transactions: Vec<Transaction>,
}

/// State captured when a bracket opens.
///
/// The account map is deep-copied. The log is append-only, so its length
/// at bracket start is enough to restore it exactly.
#[derive(Debug)]
struct Snapshot {
    accounts: BTreeMap<AccountId, Account>,
    log_len: usize,
}

impl LedgerState {
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            accounts: self.accounts.clone(),
            log_len: self.transactions.len(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.accounts = snapshot.accounts;
        self.transactions.truncate(snapshot.log_len);
    }

    fn next_account_id(&self) -> AccountId {
        self.accounts
            .keys()
            .next_back()
            .map_or(AccountId::FIRST, |last| last.next())
    }

    fn open_account(&mut self, initial_balance: Balance) -> Account {
        let account = Account::open(self.next_account_id(), initial_balance);
        self.accounts.insert(account.id, account.clone());
        account
    }

    fn update_account(
        &mut self,
        id: AccountId,
        update: impl FnOnce(&mut Account),
    ) -> Option<Account> {
        let account = self.accounts.get_mut(&id)?;
        update(account);
        Some(account.clone())
    }

    fn append_transaction(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Transaction {
        let now = Utc::now();
        // Wall clock may step backwards; the log must not.
        let timestamp = self
            .transactions
            .last()
            .map_or(now, |last| last.timestamp.max(now));
        let tx = Transaction::new(from, to, amount, timestamp);
        self.transactions.push(tx.clone());
        tx
    }
}

/// A thread-safe, volatile ledger store.
///
/// A single `tokio::sync::RwLock` guards the whole ledger. Brackets hold the
/// owned write guard for their entire span, which serializes every mutating
/// engine operation. Account creation takes the write lock for the duration of
/// the call. Plain reads share the read lock with each other and never observe
/// a half-applied bracket.
///
/// `Clone` shares the underlying state.
#[derive(Clone)]
pub struct InMemoryLedgerStore {
    state: Arc<RwLock<LedgerState>>,
    lock_timeout: Option<Duration>,
}

impl Default for InMemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLedgerStore {
    /// Creates an empty store that waits indefinitely for brackets.
    pub fn new() -> Self {
        Self::with_config(LedgerConfig::default())
    }

    /// Creates a store seeded with `config.opening_balances`.
    pub fn with_config(config: LedgerConfig) -> Self {
        let mut state = LedgerState::default();
        for balance in config.opening_balances {
            let account = state.open_account(balance);
            debug!(account = %account.id, balance = %account.balance, "seeded account");
        }
        Self {
            state: Arc::new(RwLock::new(state)),
            lock_timeout: config.lock_timeout,
        }
    }

    async fn acquire(&self) -> Result<OwnedRwLockWriteGuard<LedgerState>> {
        let lock = Arc::clone(&self.state).write_owned();
        match self.lock_timeout {
            Some(limit) => tokio::time::timeout(limit, lock)
                .await
                .map_err(|_| LedgerError::LockTimeout(limit)),
            None => Ok(lock.await),
        }
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    type Bracket = InMemoryBracket;

    async fn get_account(&self, id: AccountId) -> Option<Account> {
        let state = self.state.read().await;
        state.accounts.get(&id).cloned()
    }

    async fn create_account(&self, initial_balance: Balance) -> Account {
        let mut state = self.state.write().await;
        state.open_account(initial_balance)
    }

    async fn get_transactions_for_account(&self, id: AccountId) -> Vec<Transaction> {
        let state = self.state.read().await;
        state
            .transactions
            .iter()
            .filter(|tx| tx.involves(id))
            .cloned()
            .collect()
    }

    async fn all_accounts(&self) -> Vec<Account> {
        let state = self.state.read().await;
        state.accounts.values().cloned().collect()
    }

    async fn all_transactions(&self) -> Vec<Transaction> {
        let state = self.state.read().await;
        state.transactions.clone()
    }

    async fn begin_transaction(&self) -> Result<InMemoryBracket> {
        let state = self.acquire().await?;
        let snapshot = state.snapshot();
        trace!(
            accounts = snapshot.accounts.len(),
            transactions = snapshot.log_len,
            "bracket opened"
        );
        Ok(InMemoryBracket {
            state,
            snapshot: Some(snapshot),
        })
    }
}

/// Exclusive handle on the ledger between `begin_transaction` and
/// `commit`/`rollback`.
///
/// Dropping it without either restores the snapshot, so an early return can
/// never leave a partial write behind or keep the lock held forever.
pub struct InMemoryBracket {
    state: OwnedRwLockWriteGuard<LedgerState>,
    snapshot: Option<Snapshot>,
}

impl InMemoryBracket {
    fn restore(&mut self) -> bool {
        match self.snapshot.take() {
            Some(snapshot) => {
                self.state.restore(snapshot);
                true
            }
            None => false,
        }
    }
}

impl LedgerBracket for InMemoryBracket {
    fn get_account(&self, id: AccountId) -> Option<Account> {
        self.state.accounts.get(&id).cloned()
    }

    fn set_balance(&mut self, id: AccountId, new_balance: Balance) -> Option<Account> {
        self.state.update_account(id, |account| account.balance = new_balance)
    }

    fn close_account(&mut self, id: AccountId) -> Option<Account> {
        self.state
            .update_account(id, |account| account.status = AccountStatus::Closed)
    }

    fn create_transaction(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Transaction {
        self.state.append_transaction(from, to, amount)
    }

    fn commit(mut self) {
        self.snapshot = None;
        trace!("bracket committed");
    }

    fn rollback(mut self) {
        self.restore();
        trace!("bracket rolled back");
    }
}

impl Drop for InMemoryBracket {
    fn drop(&mut self) {
        if self.restore() {
            warn!("bracket dropped without commit or rollback; ledger restored to snapshot");
        }
    }
}
