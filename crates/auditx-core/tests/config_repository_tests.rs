mod common;

use std::cell::RefCell;
use std::rc::Rc;

use auditx_core::kv::{KvStore, MemoryKv};
use auditx_core::model::{Scale, ThresholdRange, GLOBAL_CONFIG_ID};
use auditx_core::ops::CONFIG_STORE_KEY;
use auditx_core::{AuditXError, ConfigRepository};
use common::{global_with_thresholds, memory_config_repo};

// ===== LOAD =====

#[test]
fn test_fresh_load_generates_default_global() {
    let repo = memory_config_repo();
    let global = repo.get_global();
    assert_eq!(global.id, GLOBAL_CONFIG_ID);
    assert_eq!(global.risk_score.likelihood_scale, Scale::new(1.0, 5.0));
    assert_eq!(global.thresholds.len(), 3);
}

#[test]
fn test_corrupted_payload_is_discarded_silently() {
    let mut kv = MemoryKv::new();
    kv.set(CONFIG_STORE_KEY, "{ definitely not a config map").unwrap();

    let repo = ConfigRepository::load(Box::new(kv));
    assert!(repo.get_global().is_global());
    assert_eq!(repo.get_all().len(), 1);
}

#[test]
fn test_unknown_schema_version_treated_as_corruption() {
    let mut kv = MemoryKv::new();
    kv.set(CONFIG_STORE_KEY, r#"{"schema_version": 42, "payload": {}}"#)
        .unwrap();

    let repo = ConfigRepository::load(Box::new(kv));
    assert_eq!(repo.get_all().len(), 1);
}

// ===== UPSERT =====

#[test]
fn test_upsert_stamps_updated_at_and_notifies() {
    let mut repo = memory_config_repo();
    let before = repo.get_global().audit_trail.updated_at;

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    repo.subscribe(move |event| sink.borrow_mut().push(event.config_id.clone()));

    let mut config = repo.get_global().clone();
    config.naming.likelihood = "Probability".to_string();
    repo.upsert(config).unwrap();

    assert_eq!(repo.get_global().naming.likelihood, "Probability");
    assert!(repo.get_global().audit_trail.updated_at >= before);
    assert_eq!(seen.borrow().as_slice(), ["global".to_string()]);
}

#[test]
fn test_upsert_rejects_non_contiguous_thresholds() {
    let mut repo = memory_config_repo();
    let bad = global_with_thresholds(vec![
        ThresholdRange::new(1.0, 5.0, "Low", "#4caf50"),
        ThresholdRange::new(7.0, 25.0, "High", "#f44336"),
    ]);

    let result = repo.upsert(bad);
    assert!(matches!(
        result,
        Err(AuditXError::InvalidThresholds { .. })
    ));
    // Stored thresholds are unchanged
    assert_eq!(repo.get_global().thresholds.len(), 3);
}

#[test]
fn test_upsert_rejects_thresholds_not_covering_domain() {
    let mut repo = memory_config_repo();
    let short = global_with_thresholds(vec![
        ThresholdRange::new(1.0, 5.0, "Low", "#4caf50"),
        ThresholdRange::new(5.0, 20.0, "High", "#f44336"),
    ]);

    assert!(repo.upsert(short).is_err());
}

#[test]
fn test_unsubscribe_stops_notifications() {
    let mut repo = memory_config_repo();
    let count = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&count);
    let id = repo.subscribe(move |_| *sink.borrow_mut() += 1);

    repo.upsert(repo.get_global().clone()).unwrap();
    assert!(repo.unsubscribe(id));
    repo.upsert(repo.get_global().clone()).unwrap();

    assert_eq!(*count.borrow(), 1);
}

// ===== SCOPED CONFIGS =====

#[test]
fn test_ensure_assignment_clones_global_once() {
    let mut repo = memory_config_repo();

    let scoped = repo.ensure_assignment("acme", "p1").clone();
    assert_eq!(scoped.id, "acme|p1");
    assert!(!scoped.is_global());
    assert_eq!(scoped.thresholds, repo.get_global().thresholds);

    // Second call returns the existing config unchanged
    let again = repo.ensure_assignment("acme", "p1").clone();
    assert_eq!(again, scoped);
    assert_eq!(repo.get_all().len(), 2);
}

#[test]
fn test_no_propagation_from_global_after_clone() {
    let mut repo = memory_config_repo();
    repo.ensure_assignment("acme", "p1");

    let mut global = repo.get_global().clone();
    global.naming.consequence = "Impact".to_string();
    repo.upsert(global).unwrap();

    let scoped = repo.get("acme|p1").unwrap();
    assert_eq!(scoped.naming.consequence, "Consequence");
    assert_eq!(repo.get_global().naming.consequence, "Impact");
}

#[test]
fn test_effective_config_resolution() {
    let mut repo = memory_config_repo();
    repo.ensure_assignment("acme", "p1");

    assert_eq!(repo.get_effective(Some("acme"), Some("p1")).id, "acme|p1");
    assert_eq!(repo.get_effective(Some("acme"), None).id, GLOBAL_CONFIG_ID);
    assert_eq!(
        repo.get_effective(Some("other"), Some("p1")).id,
        GLOBAL_CONFIG_ID
    );
}

#[test]
fn test_ensure_assignment_gets_fresh_audit_metadata() {
    let mut repo = memory_config_repo();
    let global_created = repo.get_global().audit_trail.created_at;

    let scoped = repo.ensure_assignment("acme", "p1");
    assert!(scoped.audit_trail.created_at >= global_created);
    assert_eq!(scoped.audit_trail.created_at, scoped.audit_trail.updated_at);
}
