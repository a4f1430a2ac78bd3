use auditx_core::kv::MemoryKv;
use auditx_core::model::{FieldworkRecord, RiskAssessmentConfig, ThresholdRange};
use auditx_core::{ConfigRepository, FieldworkStore};

/// Create a config repository backed by an in-memory key-value store
#[allow(dead_code)]
pub fn memory_config_repo() -> ConfigRepository {
    ConfigRepository::load(Box::new(MemoryKv::new()))
}

/// Create a fieldwork store backed by an in-memory key-value store
#[allow(dead_code)]
pub fn memory_fieldwork_store() -> FieldworkStore {
    FieldworkStore::load(Box::new(MemoryKv::new()))
}

/// Ensure a draft record exists for the given control id
#[allow(dead_code)]
pub fn ensure_draft(store: &mut FieldworkStore, id: &str) {
    store.ensure(id, || FieldworkRecord::new(id));
}

/// Shared-boundary Low/Medium/High thresholds over [1, 25]
#[allow(dead_code)]
pub fn low_medium_high() -> Vec<ThresholdRange> {
    vec![
        ThresholdRange::new(1.0, 5.0, "Low", "#4caf50"),
        ThresholdRange::new(5.0, 12.0, "Medium", "#ff9800"),
        ThresholdRange::new(12.0, 25.0, "High", "#f44336"),
    ]
}

/// The default global config with thresholds replaced
#[allow(dead_code)]
pub fn global_with_thresholds(thresholds: Vec<ThresholdRange>) -> RiskAssessmentConfig {
    let mut config = RiskAssessmentConfig::default_global();
    config.thresholds = thresholds;
    config
}
