//! Application layer containing the ledger's business rules.
//!
//! This module defines the `TransferEngine`, the entry point for every
//! operation on the ledger. Mutating operations run inside a single store
//! bracket, which serializes them against each other.

pub mod engine;
