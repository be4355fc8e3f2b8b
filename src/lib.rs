//! Shared plumbing for the load balancer.
//!
//! - [`config`]: load JSON, TOML or INI-style `.conf` files into serde types.
//! - [`db`]: transaction-scoped SQLite access with commit/rollback discipline.
//! - [`collections`]: flag-map/sequence conversions and set difference.
//! - [`fixture`]: synthetic request/response pairs for handler tests.
//! - [`opt`]: `Option` helpers for optional scalar fields.
//! - [`logger`]: `tracing-subscriber` setup for binaries and tests.

pub mod collections;
pub mod config;
pub mod db;
pub mod error;
pub mod fixture;
pub mod logger;
pub mod opt;

pub use error::{Error, Result};
