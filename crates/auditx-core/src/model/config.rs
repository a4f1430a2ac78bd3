use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of the single global configuration
pub const GLOBAL_CONFIG_ID: &str = "global";

/// Inclusive numeric scale for a scored quantity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub min: f64,
    pub max: f64,
}

impl Scale {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Width of the scale (may be zero or negative for degenerate scales)
    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// How the risk score is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RiskScoreMode {
    /// A single manually entered score
    Single,
    /// Likelihood multiplied by consequence
    #[default]
    LikelihoodConsequence,
}

/// How residual risk is derived from the risk and control scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResidualFormula {
    /// `risk * control`
    RiskTimesControl,
    /// `risk * (1 - control%)` where control% normalizes the control
    /// score into `[0, 1]` over its scale
    #[default]
    RiskTimesOneMinusControlPct,
}

/// Which scored quantity the rating thresholds classify
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScoreParameter {
    RiskScore,
    #[default]
    ResidualRisk,
    ControlScore,
}

/// A labeled, colored interval classifying a score into a qualitative level
///
/// Adjacent ranges share their boundary value: range i's `to` equals
/// range i+1's `from`. Both ends are inclusive when matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRange {
    pub from: f64,
    pub to: f64,
    pub label: String,
    pub color: String,
}

impl ThresholdRange {
    pub fn new(from: f64, to: f64, label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            from,
            to,
            label: label.into(),
            color: color.into(),
        }
    }

    /// Inclusive containment on both ends
    pub fn contains(&self, value: f64) -> bool {
        value >= self.from && value <= self.to
    }
}

/// Risk score settings: mode plus the scales feeding it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScoreConfig {
    pub mode: RiskScoreMode,
    /// Scale for the manual score (used in `Single` mode)
    pub score_scale: Scale,
    pub likelihood_scale: Scale,
    pub consequence_scale: Scale,
}

/// Control effectiveness settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlScoreConfig {
    pub scale: Scale,
    /// Constraint flag: control score may not exceed the risk score
    pub max_risk: bool,
}

/// Residual risk settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidualRiskConfig {
    pub formula: ResidualFormula,
    /// Which quantity the threshold ranges partition
    pub rated_parameter: ScoreParameter,
    /// Constraint flag: residual risk may not exceed the risk score
    pub max_risk: bool,
}

/// Display labels for the scored quantities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Naming {
    pub likelihood: String,
    pub consequence: String,
    pub control: String,
}

impl Default for Naming {
    fn default() -> Self {
        Self {
            likelihood: "Likelihood".to_string(),
            consequence: "Consequence".to_string(),
            control: "Control effectiveness".to_string(),
        }
    }
}

/// Who created/updated a configuration and when
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditTrail {
    pub created_by: String,
    pub updated_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AuditTrail {
    pub fn new(actor: impl Into<String>) -> Self {
        let actor = actor.into();
        let now = Utc::now();
        Self {
            created_by: actor.clone(),
            updated_by: actor,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Scope discriminator for a configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigScope {
    Global,
    Assignment {
        client_id: String,
        project_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        assignment_type: Option<String>,
    },
}

/// Risk assessment configuration
///
/// One global instance exists at all times; assignment-scoped instances
/// are created lazily by cloning the global config's values and are
/// never re-synced afterwards (no propagation from global).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessmentConfig {
    /// `"global"` or `"{client_id}|{project_id}"`
    pub id: String,
    pub scope: ConfigScope,
    pub risk_score: RiskScoreConfig,
    pub control_score: ControlScoreConfig,
    pub residual_risk: ResidualRiskConfig,
    /// Ordered ranges partitioning the rated parameter's domain
    pub thresholds: Vec<ThresholdRange>,
    pub naming: Naming,
    pub audit_trail: AuditTrail,
}

impl RiskAssessmentConfig {
    /// Storage key for an assignment-scoped configuration
    pub fn scoped_id(client_id: &str, project_id: &str) -> String {
        format!("{client_id}|{project_id}")
    }

    /// Default-factory for the global configuration
    ///
    /// Likelihood and consequence on 1-5 scales, control effectiveness
    /// on 1-5, residual via `risk * (1 - control%)`, thresholds
    /// Low 1-5 / Medium 5-12 / High 12-25 over the residual risk.
    pub fn default_global() -> Self {
        Self {
            id: GLOBAL_CONFIG_ID.to_string(),
            scope: ConfigScope::Global,
            risk_score: RiskScoreConfig {
                mode: RiskScoreMode::LikelihoodConsequence,
                score_scale: Scale::new(1.0, 25.0),
                likelihood_scale: Scale::new(1.0, 5.0),
                consequence_scale: Scale::new(1.0, 5.0),
            },
            control_score: ControlScoreConfig {
                scale: Scale::new(1.0, 5.0),
                max_risk: false,
            },
            residual_risk: ResidualRiskConfig {
                formula: ResidualFormula::RiskTimesOneMinusControlPct,
                rated_parameter: ScoreParameter::ResidualRisk,
                max_risk: true,
            },
            thresholds: vec![
                ThresholdRange::new(1.0, 5.0, "Low", "#4caf50"),
                ThresholdRange::new(5.0, 12.0, "Medium", "#ff9800"),
                ThresholdRange::new(12.0, 25.0, "High", "#f44336"),
            ],
            naming: Naming::default(),
            audit_trail: AuditTrail::new("system"),
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self.scope, ConfigScope::Global)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_global_partitions_its_domain() {
        let config = RiskAssessmentConfig::default_global();
        assert!(config.is_global());
        assert_eq!(config.id, GLOBAL_CONFIG_ID);

        // Thresholds are contiguous over [1, 25]
        assert_eq!(config.thresholds.first().map(|r| r.from), Some(1.0));
        assert_eq!(config.thresholds.last().map(|r| r.to), Some(25.0));
        for pair in config.thresholds.windows(2) {
            assert_eq!(pair[0].to, pair[1].from);
        }
    }

    #[test]
    fn test_scoped_id_format() {
        assert_eq!(
            RiskAssessmentConfig::scoped_id("client-1", "project-9"),
            "client-1|project-9"
        );
    }

    #[test]
    fn test_range_contains_is_inclusive() {
        let range = ThresholdRange::new(6.0, 12.0, "Medium", "#ff9800");
        assert!(range.contains(6.0));
        assert!(range.contains(12.0));
        assert!(!range.contains(12.5));
    }

    #[test]
    fn test_config_scope_serde_round_trip() {
        let scope = ConfigScope::Assignment {
            client_id: "c1".to_string(),
            project_id: "p1".to_string(),
            assignment_type: None,
        };
        let json = serde_json::to_string(&scope).unwrap();
        assert!(json.contains("assignment"));
        let back: ConfigScope = serde_json::from_str(&json).unwrap();
        assert_eq!(back, scope);
    }
}
