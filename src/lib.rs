//! A minimal, volatile ledger: monetary accounts plus an append-only log of
//! transfers between them.
//!
//! Every transfer either fully applies (both balances updated and a record
//! appended) or has no effect at all. The [`application::engine::TransferEngine`]
//! enforces the business rules; the
//! [`infrastructure::in_memory::InMemoryLedgerStore`] provides the
//! begin/commit/rollback bracket that makes a group of writes atomic and
//! serializes concurrent mutations.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
pub mod telemetry;

pub use application::engine::TransferEngine;
pub use config::LedgerConfig;
pub use error::{LedgerError, Result};
pub use infrastructure::in_memory::InMemoryLedgerStore;
