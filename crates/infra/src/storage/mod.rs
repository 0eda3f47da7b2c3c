//! Token persistence

pub mod file;

pub use file::FileTokenStorage;
