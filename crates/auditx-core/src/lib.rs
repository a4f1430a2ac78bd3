//! AuditX Core - risk-scoring configuration engine and fieldwork review
//! lifecycle for audit engagements.
//!
//! This crate provides:
//! - A configurable risk-scoring model (likelihood x consequence or
//!   manual score, control effectiveness, residual-risk formulas)
//! - Breakpoint editing that keeps rating thresholds a validated,
//!   contiguous partition of their numeric domain
//! - A keyed configuration repository (one global config plus lazily
//!   cloned assignment-scoped overrides)
//! - A per-control fieldwork record store with a draft / submitted /
//!   approved / rejected state machine and append-only review history
//!
//! Everything is single-threaded and fully synchronous; persistence goes
//! through the injected [`kv::KvStore`] seam and is best-effort.

pub mod breakpoints;
pub mod codec;
pub mod errors;
pub mod kv;
pub mod logging;
pub mod model;
pub mod observer;
pub mod ops;
pub mod scoring;

// Re-export commonly used types
pub use errors::{AuditXError, Result};
pub use kv::{KvStore, MemoryKv};
pub use model::{
    FieldworkRecord, RecordPatch, RecordStatus, ReviewDecision, RiskAssessmentConfig,
    RiskScoreMode, RiskSnapshot, Scale, TabPatch, ThresholdRange,
};
pub use observer::SubscriptionId;
pub use ops::{add_review, ConfigRepository, FieldworkStore};
