//! Risk configuration repository.
//!
//! Owns the single global configuration plus the assignment-scoped
//! overrides, persists both through the injected key-value store, and
//! fans out a synchronous change notification after every successful
//! write. Constructed once and passed to consumers; there is no hidden
//! module-level state.

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::breakpoints::{is_valid_partition, parameter_domain};
use crate::codec;
use crate::errors::{AuditXError, Result};
use crate::kv::KvStore;
use crate::model::{AuditTrail, ConfigScope, RiskAssessmentConfig};
use crate::observer::{ObserverRegistry, SubscriptionId};

/// Key under which the configuration map is persisted
pub const CONFIG_STORE_KEY: &str = "auditx.risk_configs";

/// Event delivered to config subscribers after each write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigChanged {
    pub config_id: String,
}

#[derive(Serialize, Deserialize)]
struct PersistedConfigs {
    global: RiskAssessmentConfig,
    scoped: HashMap<String, RiskAssessmentConfig>,
}

/// Keyed storage of risk assessment configurations
pub struct ConfigRepository {
    global: RiskAssessmentConfig,
    scoped: HashMap<String, RiskAssessmentConfig>,
    kv: Box<dyn KvStore>,
    observers: ObserverRegistry<ConfigChanged>,
}

impl ConfigRepository {
    /// Load the repository from the key-value store
    ///
    /// A corrupted or unparsable payload is discarded and replaced by an
    /// empty scoped map plus a freshly generated default global config;
    /// no error is surfaced. The global config always exists after this
    /// returns.
    pub fn load(kv: Box<dyn KvStore>) -> Self {
        let (global, scoped, fresh) = match kv.get(CONFIG_STORE_KEY) {
            Ok(Some(raw)) => match codec::decode::<PersistedConfigs>(&raw) {
                Ok(state) => (state.global, state.scoped, false),
                Err(err) => {
                    warn!(key = CONFIG_STORE_KEY, %err, "discarding corrupted config payload");
                    (RiskAssessmentConfig::default_global(), HashMap::new(), true)
                }
            },
            Ok(None) => (RiskAssessmentConfig::default_global(), HashMap::new(), true),
            Err(err) => {
                warn!(key = CONFIG_STORE_KEY, %err, "config load failed, starting from defaults");
                (RiskAssessmentConfig::default_global(), HashMap::new(), true)
            }
        };

        let mut repo = Self {
            global,
            scoped,
            kv,
            observers: ObserverRegistry::new(),
        };
        if fresh {
            repo.persist();
        }
        repo
    }

    /// The global configuration (always present)
    pub fn get_global(&self) -> &RiskAssessmentConfig {
        &self.global
    }

    /// Look up a configuration by id (`"global"` or `"{client}|{project}"`)
    pub fn get(&self, id: &str) -> Option<&RiskAssessmentConfig> {
        if id == self.global.id {
            Some(&self.global)
        } else {
            self.scoped.get(id)
        }
    }

    /// All configurations, global first
    pub fn get_all(&self) -> Vec<&RiskAssessmentConfig> {
        std::iter::once(&self.global)
            .chain(self.scoped.values())
            .collect()
    }

    /// Replace a configuration wholesale
    ///
    /// The threshold list is gatekept here: it must contiguously
    /// partition the rated parameter's domain or the write is rejected
    /// and nothing changes. On success `updated_at` is refreshed, the
    /// map is persisted (best-effort), and subscribers are notified.
    ///
    /// # Errors
    ///
    /// Returns `InvalidThresholds` when the ranges do not form a valid
    /// partition.
    pub fn upsert(&mut self, mut config: RiskAssessmentConfig) -> Result<()> {
        let domain = parameter_domain(&config, config.residual_risk.rated_parameter);
        if !is_valid_partition(&config.thresholds, domain) {
            return Err(AuditXError::InvalidThresholds {
                config_id: config.id.clone(),
                reason: format!(
                    "thresholds must contiguously partition [{}, {}]",
                    domain.min, domain.max
                ),
            });
        }

        config.audit_trail.updated_at = Utc::now();
        let config_id = config.id.clone();
        if config.is_global() {
            self.global = config;
        } else {
            self.scoped.insert(config_id.clone(), config);
        }

        self.persist();
        self.observers.notify(&ConfigChanged { config_id });
        Ok(())
    }

    /// Get or lazily create the scoped configuration for an assignment
    ///
    /// A missing scoped config is created by cloning the current global
    /// config's values (a snapshot, never a live reference) with fresh
    /// scope and audit metadata. Later global edits do not propagate to
    /// it. An existing scoped config is returned unchanged.
    pub fn ensure_assignment(
        &mut self,
        client_id: &str,
        project_id: &str,
    ) -> &RiskAssessmentConfig {
        let key = RiskAssessmentConfig::scoped_id(client_id, project_id);
        if !self.scoped.contains_key(&key) {
            debug!(config_id = %key, "creating assignment-scoped config from global");
            let mut config = self.global.clone();
            config.id = key.clone();
            config.scope = ConfigScope::Assignment {
                client_id: client_id.to_string(),
                project_id: project_id.to_string(),
                assignment_type: None,
            };
            config.audit_trail = AuditTrail::new(self.global.audit_trail.created_by.clone());
            self.scoped.insert(key.clone(), config);

            self.persist();
            self.observers.notify(&ConfigChanged {
                config_id: key.clone(),
            });
        }

        match self.scoped.get(&key) {
            Some(config) => config,
            None => unreachable!("scoped config inserted above"),
        }
    }

    /// Resolve the effective configuration for an assignment
    ///
    /// Returns the scoped config when one exists for the pair, else the
    /// global config. This single fallback is the only override rule.
    pub fn get_effective(
        &self,
        client_id: Option<&str>,
        project_id: Option<&str>,
    ) -> &RiskAssessmentConfig {
        if let (Some(client_id), Some(project_id)) = (client_id, project_id) {
            let key = RiskAssessmentConfig::scoped_id(client_id, project_id);
            if let Some(config) = self.scoped.get(&key) {
                return config;
            }
        }
        &self.global
    }

    /// Register a change listener
    pub fn subscribe(&mut self, listener: impl Fn(&ConfigChanged) + 'static) -> SubscriptionId {
        self.observers.subscribe(listener)
    }

    /// Dispose a change listener (O(1))
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Best-effort persistence: failures are logged and swallowed
    fn persist(&mut self) {
        let state = PersistedConfigs {
            global: self.global.clone(),
            scoped: self.scoped.clone(),
        };
        match codec::encode(&state) {
            Ok(blob) => {
                if let Err(err) = self.kv.set(CONFIG_STORE_KEY, &blob) {
                    warn!(key = CONFIG_STORE_KEY, %err, "config persist failed");
                }
            }
            Err(err) => warn!(key = CONFIG_STORE_KEY, %err, "config encode failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKv;

    fn memory_repo() -> ConfigRepository {
        ConfigRepository::load(Box::new(MemoryKv::new()))
    }

    #[test]
    fn test_load_creates_default_global() {
        let repo = memory_repo();
        assert!(repo.get_global().is_global());
        assert_eq!(repo.get_all().len(), 1);
    }

    #[test]
    fn test_get_by_global_id() {
        let repo = memory_repo();
        assert!(repo.get("global").is_some());
        assert!(repo.get("acme|p1").is_none());
    }

    #[test]
    fn test_effective_falls_back_to_global() {
        let mut repo = memory_repo();
        assert!(repo.get_effective(Some("acme"), Some("p1")).is_global());
        assert!(repo.get_effective(None, None).is_global());

        repo.ensure_assignment("acme", "p1");
        assert!(!repo.get_effective(Some("acme"), Some("p1")).is_global());
        // Different pair still falls back
        assert!(repo.get_effective(Some("acme"), Some("p2")).is_global());
    }
}
