//! AuditX Store - durable persistence for the risk-scoring engine.
//!
//! Provides a SQLite-backed implementation of the core crate's
//! [`auditx_core::kv::KvStore`] seam: the two JSON blobs the engine
//! persists (risk configurations and fieldwork records) live in a single
//! key-value table.

pub mod db;
pub mod errors;
pub mod kv;

pub use kv::SqliteKv;
