//! # SmartPantry Domain
//!
//! Domain types shared by every SmartPantry client crate.
//!
//! This crate contains:
//! - REST resource types (inventory items, shopping tasks, cook history, AI payloads)
//! - Domain error type and Result definition
//! - Configuration structures
//! - Constants: API paths, token storage keys, defaults
//!
//! ## Architecture
//! - No dependencies on other SmartPantry crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
