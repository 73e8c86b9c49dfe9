//! PostgreSQL persistence module.
//!
//! Provides connection pooling for the generation history store.

pub mod pool;

pub use pool::{mask_url, PostgresPool, PostgresPoolError};
