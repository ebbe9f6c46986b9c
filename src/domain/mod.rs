//! Domain layer: ledger value objects, records and the storage ports.

pub mod account;
pub mod command;
pub mod ports;
pub mod transaction;
