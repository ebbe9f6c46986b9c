use super::account::{AccountId, Amount};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An immutable record of money moved between two accounts.
///
/// Records are never updated or deleted once appended to the ledger; they keep
/// referring to their accounts even after those accounts are closed.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(rename = "timeStamp", with = "utc_seconds")]
    pub timestamp: DateTime<Utc>,
    pub from_account_id: AccountId,
    pub to_account_id: AccountId,
    pub amount: Amount,
}

impl Transaction {
    pub fn new(
        from_account_id: AccountId,
        to_account_id: AccountId,
        amount: Amount,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            from_account_id,
            to_account_id,
            amount,
        }
    }

    /// True if the account sent or received this transfer.
    pub fn involves(&self, account: AccountId) -> bool {
        self.from_account_id == account || self.to_account_id == account
    }
}

/// `yyyy-MM-dd HH:mm:ss` in UTC.
mod utc_seconds {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&timestamp.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}
