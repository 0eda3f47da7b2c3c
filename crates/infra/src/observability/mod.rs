//! Observability: structured logging via `tracing`
//!
//! Library code only emits events; installing a subscriber is left to the
//! application through [`init_logging`].

pub mod logging;

pub use logging::{env_filter, init_logging, LogFormat};
