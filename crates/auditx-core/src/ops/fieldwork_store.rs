//! Per-control fieldwork record store.
//!
//! One record per control-under-audit, keyed by control id. Records are
//! created on first access, mutated by typed patches, and advance
//! forward through draft / submitted / approved / rejected. Missing ids
//! are silent no-ops: callers are expected to `ensure` first. Writers
//! are not synchronized; the design assumes a single logical writer per
//! record at a time.

use std::collections::HashMap;

use chrono::Utc;
use tracing::{debug, warn};

use crate::codec;
use crate::kv::KvStore;
use crate::model::{FieldworkRecord, RecordPatch, RecordStatus, RiskSnapshot, TabPatch};
use crate::observer::{ObserverRegistry, SubscriptionId};

/// Key under which the fieldwork record map is persisted
pub const FIELDWORK_STORE_KEY: &str = "auditx.fieldwork_records";

/// Event delivered to fieldwork subscribers after each write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordChanged {
    pub control_id: String,
}

/// Keyed storage of fieldwork records
pub struct FieldworkStore {
    records: HashMap<String, FieldworkRecord>,
    kv: Box<dyn KvStore>,
    observers: ObserverRegistry<RecordChanged>,
}

impl FieldworkStore {
    /// Load the store from the key-value store
    ///
    /// A corrupted or unparsable payload is discarded and replaced by an
    /// empty map; no error is surfaced.
    pub fn load(kv: Box<dyn KvStore>) -> Self {
        let records = match kv.get(FIELDWORK_STORE_KEY) {
            Ok(Some(raw)) => match codec::decode::<HashMap<String, FieldworkRecord>>(&raw) {
                Ok(records) => records,
                Err(err) => {
                    warn!(key = FIELDWORK_STORE_KEY, %err, "discarding corrupted fieldwork payload");
                    HashMap::new()
                }
            },
            Ok(None) => HashMap::new(),
            Err(err) => {
                warn!(key = FIELDWORK_STORE_KEY, %err, "fieldwork load failed, starting empty");
                HashMap::new()
            }
        };

        Self {
            records,
            kv,
            observers: ObserverRegistry::new(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&FieldworkRecord> {
        self.records.get(id)
    }

    pub fn get_all(&self) -> Vec<&FieldworkRecord> {
        self.records.values().collect()
    }

    /// Create-if-absent access to a record
    ///
    /// A missing record is created from `factory()` (its `control_id` is
    /// forced to `id`). An existing record missing its risk snapshot has
    /// exactly that backfilled; all other fields are left untouched.
    pub fn ensure(
        &mut self,
        id: &str,
        factory: impl FnOnce() -> FieldworkRecord,
    ) -> &FieldworkRecord {
        let mut changed = false;
        match self.records.get_mut(id) {
            Some(record) => {
                if record.risk.is_none() {
                    record.risk = Some(RiskSnapshot::default());
                    record.updated_at = Utc::now();
                    changed = true;
                }
            }
            None => {
                let mut record = factory();
                record.control_id = id.to_string();
                if record.risk.is_none() {
                    record.risk = Some(RiskSnapshot::default());
                }
                self.records.insert(id.to_string(), record);
                changed = true;
            }
        }

        if changed {
            self.persist();
            self.observers.notify(&RecordChanged {
                control_id: id.to_string(),
            });
        }

        match self.records.get(id) {
            Some(record) => record,
            None => unreachable!("record inserted above"),
        }
    }

    /// Replace a record wholesale, keyed by its control id
    pub fn upsert(&mut self, mut record: FieldworkRecord) {
        record.updated_at = Utc::now();
        let control_id = record.control_id.clone();
        self.records.insert(control_id.clone(), record);
        self.persist();
        self.observers.notify(&RecordChanged { control_id });
    }

    /// Merge a whole-record patch; silent no-op on a missing id
    pub fn patch(&mut self, id: &str, patch: RecordPatch) {
        self.modify(id, "patch", |record| record.apply(patch));
    }

    /// Merge a tab-scoped patch; silent no-op on a missing id
    pub fn patch_tab(&mut self, id: &str, patch: TabPatch) {
        self.modify(id, "patch_tab", |record| record.apply_tab(patch));
    }

    /// Set the record status; silent no-op on a missing id
    pub fn set_status(&mut self, id: &str, status: RecordStatus) {
        self.modify(id, "set_status", |record| record.status = status);
    }

    /// Advance a draft record to submitted
    ///
    /// Only the draft -> submitted transition is performed here;
    /// approved/rejected are reached exclusively through review, and no
    /// transition leads back out of a terminal state.
    pub fn submit_for_review(&mut self, id: &str) {
        let is_draft = self
            .records
            .get(id)
            .map(|record| record.status == RecordStatus::Draft)
            .unwrap_or(false);
        if is_draft {
            self.modify(id, "submit_for_review", |record| {
                record.status = RecordStatus::Submitted;
            });
        } else {
            debug!(control_id = id, "submit_for_review skipped: not a draft");
        }
    }

    /// Register a change listener
    pub fn subscribe(&mut self, listener: impl Fn(&RecordChanged) + 'static) -> SubscriptionId {
        self.observers.subscribe(listener)
    }

    /// Dispose a change listener (O(1))
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Apply a mutation to an existing record, then stamp, persist, notify
    ///
    /// Returns false (after a debug log) when the id is absent.
    pub(crate) fn modify(
        &mut self,
        id: &str,
        op: &str,
        mutation: impl FnOnce(&mut FieldworkRecord),
    ) -> bool {
        match self.records.get_mut(id) {
            Some(record) => {
                mutation(record);
                record.updated_at = Utc::now();
                self.persist();
                self.observers.notify(&RecordChanged {
                    control_id: id.to_string(),
                });
                true
            }
            None => {
                debug!(control_id = id, op, "fieldwork write skipped: record missing");
                false
            }
        }
    }

    /// Best-effort persistence: failures are logged and swallowed
    fn persist(&mut self) {
        match codec::encode(&self.records) {
            Ok(blob) => {
                if let Err(err) = self.kv.set(FIELDWORK_STORE_KEY, &blob) {
                    warn!(key = FIELDWORK_STORE_KEY, %err, "fieldwork persist failed");
                }
            }
            Err(err) => warn!(key = FIELDWORK_STORE_KEY, %err, "fieldwork encode failed"),
        }
    }
}
