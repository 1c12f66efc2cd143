//! Library surface for the poker server binary.
//!
//! Exists so `tests/` integration tests and doc comments elsewhere in this
//! crate can reference `poker_server::api`/`config`/`logging`/`metrics`
//! directly, the same way `main.rs` does.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
