use thiserror::Error;

/// Result type alias using AuditXError
pub type Result<T> = std::result::Result<T, AuditXError>;

/// Error taxonomy for AuditX operations
///
/// The error surface is deliberately small: most operations in this
/// subsystem degrade or no-op instead of failing (missing fieldwork ids
/// are skipped, corrupted persisted payloads are replaced with defaults,
/// breakpoint edits report per-index messages rather than erroring).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuditXError {
    /// Threshold ranges do not form a valid contiguous partition of the
    /// rated parameter's domain
    #[error("Invalid thresholds for config {config_id}: {reason}")]
    InvalidThresholds { config_id: String, reason: String },

    /// Serialization error (JSON encoding/decoding or schema version mismatch)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Persistence error from the backing key-value store
    #[error("Persistence error: {message}")]
    Persistence { message: String },
}
