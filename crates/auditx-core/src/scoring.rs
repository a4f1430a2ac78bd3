//! Pure scoring functions: risk score, residual risk, level resolution.
//!
//! None of these validate their inputs. Values outside the configured
//! scales propagate arithmetically (garbage in, garbage out); guarding
//! against NaN poisoning is the caller's responsibility.

use crate::model::{ResidualFormula, RiskScoreMode, Scale, ThresholdRange};

/// Compute the risk score for the given mode
///
/// `Single` returns the manual score (0 if absent). `LikelihoodConsequence`
/// returns `likelihood * consequence` (each 0 if absent). No rounding.
pub fn compute_risk_score(
    mode: RiskScoreMode,
    likelihood: Option<f64>,
    consequence: Option<f64>,
    manual: Option<f64>,
) -> f64 {
    match mode {
        RiskScoreMode::Single => manual.unwrap_or(0.0),
        RiskScoreMode::LikelihoodConsequence => {
            likelihood.unwrap_or(0.0) * consequence.unwrap_or(0.0)
        }
    }
}

/// Compute residual risk from the risk score and the control score
///
/// `RiskTimesControl` returns `risk * control`.
/// `RiskTimesOneMinusControlPct` normalizes the control score to `[0, 1]`
/// over its scale (`0` when the scale is degenerate, `max <= min`) and
/// returns `risk * (1 - pct)`.
pub fn compute_residual(
    formula: ResidualFormula,
    risk_score: f64,
    control_score: f64,
    control_scale: Scale,
) -> f64 {
    match formula {
        ResidualFormula::RiskTimesControl => risk_score * control_score,
        ResidualFormula::RiskTimesOneMinusControlPct => {
            let pct = if control_scale.max <= control_scale.min {
                0.0
            } else {
                (control_score - control_scale.min) / control_scale.span()
            };
            risk_score * (1.0 - pct)
        }
    }
}

/// Resolve a value to its qualitative level
///
/// Returns the first range in list order whose inclusive `[from, to]`
/// contains the value; `None` means unclassified. Adjacent ranges share
/// a boundary value, so a value exactly on a boundary resolves to the
/// earlier range in list order. This tie-break is intentional and must
/// be preserved.
pub fn resolve_level(value: f64, thresholds: &[ThresholdRange]) -> Option<&ThresholdRange> {
    thresholds.iter().find(|range| range.contains(value))
}

/// Saturate a value into `[min, max]`
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}
