//! Adapters between external formats and the engine's command model.

pub mod csv;
pub mod json;
