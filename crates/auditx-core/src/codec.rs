//! Versioned JSON codec for persisted blobs.
//!
//! Every blob written through the key-value seam is wrapped in an
//! envelope carrying a schema version tag, so the persisted shape can
//! evolve safely. Decoding a blob with an unknown version fails the same
//! way a malformed blob does; callers treat both as corruption.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::{AuditXError, Result};

/// Current schema version for all persisted payloads
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    schema_version: u32,
    payload: T,
}

/// Encode a payload into a versioned JSON blob
pub fn encode<T: Serialize>(payload: &T) -> Result<String> {
    serde_json::to_string(&Envelope {
        schema_version: SCHEMA_VERSION,
        payload,
    })
    .map_err(|err| AuditXError::Serialization {
        message: err.to_string(),
    })
}

/// Decode a versioned JSON blob
pub fn decode<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let envelope: Envelope<T> =
        serde_json::from_str(raw).map_err(|err| AuditXError::Serialization {
            message: err.to_string(),
        })?;
    if envelope.schema_version != SCHEMA_VERSION {
        return Err(AuditXError::Serialization {
            message: format!(
                "unsupported schema version {} (expected {})",
                envelope.schema_version, SCHEMA_VERSION
            ),
        });
    }
    Ok(envelope.payload)
}
