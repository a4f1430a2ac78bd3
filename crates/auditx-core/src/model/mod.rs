pub mod config;
pub mod fieldwork;

pub use config::{
    AuditTrail, ConfigScope, ControlScoreConfig, Naming, ResidualFormula, ResidualRiskConfig,
    RiskAssessmentConfig, RiskScoreConfig, RiskScoreMode, Scale, ScoreParameter, ThresholdRange,
    GLOBAL_CONFIG_ID,
};
pub use fieldwork::{
    EffectivenessPatch, EffectivenessTab, EnvironmentPatch, EnvironmentTab, FieldworkRecord,
    MethodologyPatch, MethodologyTab, RecordPatch, RecordStatus, RemarksPatch, RemarksTab,
    ReportPatch, ReportTab, ReviewDecision, ReviewEntry, RiskSnapshot, TabPatch, TAB_REPORT,
};
