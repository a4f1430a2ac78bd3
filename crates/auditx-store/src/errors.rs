//! Error adapters for auditx-store
//!
//! The store surfaces everything as the core crate's error type so the
//! repositories can swallow persistence failures uniformly.

use auditx_core::errors::AuditXError;

/// Result type alias using AuditXError
pub type Result<T> = std::result::Result<T, AuditXError>;

/// Map a rusqlite error into the core persistence error
pub fn from_rusqlite(err: rusqlite::Error) -> AuditXError {
    AuditXError::Persistence {
        message: err.to_string(),
    }
}
