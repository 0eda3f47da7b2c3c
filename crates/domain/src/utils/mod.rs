//! Serde helpers for server payload quirks

pub mod decimal;
