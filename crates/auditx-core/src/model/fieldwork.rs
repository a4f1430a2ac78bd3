use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::config::RiskScoreMode;

/// Index of the terminal report tab
///
/// Tab order: environment (0), methodology (1), effectiveness (2),
/// remarks (3), report (4).
pub const TAB_REPORT: u8 = 4;

/// Review lifecycle state of a fieldwork record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    #[default]
    Draft,
    Submitted,
    Approved,
    Rejected,
}

/// Reviewer decision on a submitted record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl std::fmt::Display for ReviewDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewDecision::Approved => write!(f, "Approved"),
            ReviewDecision::Rejected => write!(f, "Rejected"),
        }
    }
}

/// One entry in a record's append-only review history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewEntry {
    pub author: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Computed risk snapshot carried by a fieldwork record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RiskSnapshot {
    pub mode: RiskScoreMode,
    pub likelihood: Option<f64>,
    pub consequence: Option<f64>,
    pub risk_score: f64,
    pub control_score: Option<f64>,
    pub residual_risk: f64,
    pub risk_level: Option<String>,
    pub residual_level: Option<String>,
    /// True when a reviewer replaced the computed level by hand
    pub overridden: bool,
    pub last_calculated_at: Option<DateTime<Utc>>,
}

// ===== Tab payloads =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EnvironmentTab {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub systems: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MethodologyTab {
    #[serde(default)]
    pub approach: String,
    #[serde(default)]
    pub sample_size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EffectivenessTab {
    #[serde(default)]
    pub conclusion: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RemarksTab {
    #[serde(default)]
    pub remarks: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ReportTab {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub recommendation: String,
}

/// Per-control working paper
///
/// Created on first access with status `Draft`; mutated by tab-scoped or
/// whole-record patches; status only advances via submit/approve/reject.
/// Records are never deleted by this subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldworkRecord {
    pub control_id: String,
    pub status: RecordStatus,
    /// Highest tab index reached (monotonically non-decreasing)
    pub progress: u8,
    pub active_tab: u8,
    #[serde(default)]
    pub environment: EnvironmentTab,
    #[serde(default)]
    pub methodology: MethodologyTab,
    #[serde(default)]
    pub effectiveness: EffectivenessTab,
    #[serde(default)]
    pub remarks: RemarksTab,
    #[serde(default)]
    pub report: ReportTab,
    /// Backfilled to `Some(default)` on first access if absent
    #[serde(default)]
    pub risk: Option<RiskSnapshot>,
    /// Append-only: existing entries are never edited or removed
    #[serde(default)]
    pub review_history: Vec<ReviewEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FieldworkRecord {
    /// Create a fresh draft record for a control
    pub fn new(control_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            control_id: control_id.into(),
            status: RecordStatus::Draft,
            progress: 0,
            active_tab: 0,
            environment: EnvironmentTab::default(),
            methodology: MethodologyTab::default(),
            effectiveness: EffectivenessTab::default(),
            remarks: RemarksTab::default(),
            report: ReportTab::default(),
            risk: Some(RiskSnapshot::default()),
            review_history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status, RecordStatus::Approved | RecordStatus::Rejected)
    }

    /// Merge a whole-record patch; absent fields are left untouched
    pub fn apply(&mut self, patch: RecordPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(progress) = patch.progress {
            self.progress = progress;
        }
        if let Some(active_tab) = patch.active_tab {
            self.active_tab = active_tab;
        }
        if let Some(risk) = patch.risk {
            self.risk = Some(risk);
        }
    }

    /// Merge a tab-scoped patch into the named tab group only
    pub fn apply_tab(&mut self, patch: TabPatch) {
        match patch {
            TabPatch::Environment(p) => {
                if let Some(description) = p.description {
                    self.environment.description = description;
                }
                if let Some(systems) = p.systems {
                    self.environment.systems = systems;
                }
            }
            TabPatch::Methodology(p) => {
                if let Some(approach) = p.approach {
                    self.methodology.approach = approach;
                }
                if let Some(sample_size) = p.sample_size {
                    self.methodology.sample_size = Some(sample_size);
                }
            }
            TabPatch::Effectiveness(p) => {
                if let Some(conclusion) = p.conclusion {
                    self.effectiveness.conclusion = conclusion;
                }
                if let Some(notes) = p.notes {
                    self.effectiveness.notes = notes;
                }
            }
            TabPatch::Remarks(p) => {
                if let Some(remarks) = p.remarks {
                    self.remarks.remarks = remarks;
                }
            }
            TabPatch::Report(p) => {
                if let Some(summary) = p.summary {
                    self.report.summary = summary;
                }
                if let Some(recommendation) = p.recommendation {
                    self.report.recommendation = recommendation;
                }
            }
        }
    }
}

// ===== Patch types =====
//
// Patches are explicit typed values covering only the legal optional
// fields for each record/tab, rather than loose key-value merges.

/// Whole-record patch
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordPatch {
    pub status: Option<RecordStatus>,
    pub progress: Option<u8>,
    pub active_tab: Option<u8>,
    pub risk: Option<RiskSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnvironmentPatch {
    pub description: Option<String>,
    pub systems: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MethodologyPatch {
    pub approach: Option<String>,
    pub sample_size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EffectivenessPatch {
    pub conclusion: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RemarksPatch {
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportPatch {
    pub summary: Option<String>,
    pub recommendation: Option<String>,
}

/// Tab-scoped patch: merges only within the named tab group
#[derive(Debug, Clone, PartialEq)]
pub enum TabPatch {
    Environment(EnvironmentPatch),
    Methodology(MethodologyPatch),
    Effectiveness(EffectivenessPatch),
    Remarks(RemarksPatch),
    Report(ReportPatch),
}
