//! Stateful operations: configuration repository, fieldwork store, and
//! the review workflow that drives status transitions.

pub mod config_repo;
pub mod fieldwork_store;
pub mod review;

pub use config_repo::{ConfigChanged, ConfigRepository, CONFIG_STORE_KEY};
pub use fieldwork_store::{FieldworkStore, RecordChanged, FIELDWORK_STORE_KEY};
pub use review::add_review;
