use crate::domain::account::Balance;
use std::time::Duration;

/// Runtime settings for the ledger store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerConfig {
    /// Upper bound on how long `begin_transaction` waits for the ledger lock.
    /// `None` waits indefinitely.
    ///
    /// Only brackets are bounded. Plain reads and account creation hold the
    /// lock for a single step and always wait for an open bracket to finish.
    pub lock_timeout: Option<Duration>,
    /// Accounts opened, in order, when the store is created.
    pub opening_balances: Vec<Balance>,
}

impl LedgerConfig {
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = Some(timeout);
        self
    }

    pub fn with_opening_balances(mut self, balances: impl IntoIterator<Item = Balance>) -> Self {
        self.opening_balances.extend(balances);
        self
    }
}
