//! Persistence layer — libSQL-backed storage for setup configuration.

pub mod libsql_backend;
pub mod migrations;
pub mod traits;

pub use libsql_backend::LibSqlBackend;
pub use traits::{BasketConfigStore, GrinderConfigStore, SetupStatusStore};
