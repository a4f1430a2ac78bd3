//! Breakpoint editing and validation for rating definitions.
//!
//! A rating definition is stored as N ranges but edited as N+1 ordered
//! breakpoints `[b0..bN]`, where range i is `{from: b_i, to: b_(i+1)}`.
//! Every mutation goes through this module: after each edit the ranges
//! must contiguously and monotonically partition the rated parameter's
//! domain. Callers must not write threshold data directly.

use crate::model::{RiskAssessmentConfig, RiskScoreMode, Scale, ScoreParameter, ThresholdRange};
use crate::scoring::clamp;

/// Color assigned to ranges created without a prior range at that index
pub const DEFAULT_RANGE_COLOR: &str = "#9e9e9e";

/// Derive the breakpoint list from an ordered range list
///
/// `b0` is the first range's `from`; every subsequent breakpoint is a
/// range's `to`.
pub fn breakpoints_from_ranges(ranges: &[ThresholdRange]) -> Vec<f64> {
    let mut breakpoints = Vec::with_capacity(ranges.len() + 1);
    if let Some(first) = ranges.first() {
        breakpoints.push(first.from);
    }
    breakpoints.extend(ranges.iter().map(|range| range.to));
    breakpoints
}

/// Rebuild ranges from adjacent breakpoint pairs
///
/// Labels and colors are reused from the prior range at the same index
/// when available, otherwise defaults are assigned.
pub fn ranges_from_breakpoints(
    breakpoints: &[f64],
    prior: &[ThresholdRange],
) -> Vec<ThresholdRange> {
    breakpoints
        .windows(2)
        .enumerate()
        .map(|(i, pair)| ThresholdRange {
            from: pair[0],
            to: pair[1],
            label: prior
                .get(i)
                .map(|range| range.label.clone())
                .unwrap_or_else(|| format!("Level {}", i + 1)),
            color: prior
                .get(i)
                .map(|range| range.color.clone())
                .unwrap_or_else(|| DEFAULT_RANGE_COLOR.to_string()),
        })
        .collect()
}

/// Validate a breakpoint list against its domain
///
/// Returns one message per breakpoint; the empty string denotes a valid
/// entry. Index 0 must equal the domain minimum, the last index must
/// equal the domain maximum, and every interior index i must lie within
/// the domain and satisfy `b[i-1] < b[i] < b[i+1]`.
pub fn validate_breakpoints(breakpoints: &[f64], domain: Scale) -> Vec<String> {
    let last = breakpoints.len().saturating_sub(1);
    breakpoints
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            if i == 0 {
                if value != domain.min {
                    return format!("Must equal the scale minimum ({})", domain.min);
                }
            } else if i == last {
                if value != domain.max {
                    return format!("Must equal the scale maximum ({})", domain.max);
                }
            } else {
                if value < domain.min || value > domain.max {
                    return format!("Must be between {} and {}", domain.min, domain.max);
                }
                if value <= breakpoints[i - 1] {
                    return "Must be greater than the previous breakpoint".to_string();
                }
                if value >= breakpoints[i + 1] {
                    return "Must be less than the next breakpoint".to_string();
                }
            }
            String::new()
        })
        .collect()
}

/// True when every entry of [`validate_breakpoints`] is empty
pub fn breakpoints_valid(breakpoints: &[f64], domain: Scale) -> bool {
    validate_breakpoints(breakpoints, domain)
        .iter()
        .all(String::is_empty)
}

/// Gatekeeper predicate for threshold writes
///
/// Ranges must be non-empty, contiguous (each `from` equals the previous
/// `to`), and their derived breakpoints must validate against the domain.
pub fn is_valid_partition(ranges: &[ThresholdRange], domain: Scale) -> bool {
    if ranges.is_empty() {
        return false;
    }
    let contiguous = ranges.windows(2).all(|pair| pair[1].from == pair[0].to);
    contiguous && breakpoints_valid(&breakpoints_from_ranges(ranges), domain)
}

/// Numeric domain of a rated parameter, derived from the rest of the config
///
/// Risk score and residual risk share a domain: the manual score scale in
/// `Single` mode, otherwise the products of the likelihood and consequence
/// scale endpoints. Control score uses the control scale.
pub fn parameter_domain(config: &RiskAssessmentConfig, parameter: ScoreParameter) -> Scale {
    match parameter {
        ScoreParameter::ControlScore => config.control_score.scale,
        ScoreParameter::RiskScore | ScoreParameter::ResidualRisk => match config.risk_score.mode {
            RiskScoreMode::Single => config.risk_score.score_scale,
            RiskScoreMode::LikelihoodConsequence => Scale::new(
                config.risk_score.likelihood_scale.min * config.risk_score.consequence_scale.min,
                config.risk_score.likelihood_scale.max * config.risk_score.consequence_scale.max,
            ),
        },
    }
}

/// Coerce an existing breakpoint list onto a new domain
///
/// Endpoints are forced to the new min/max. Interior points are clamped
/// into the domain, then nudged by +1 (forward pass) and -1 (backward
/// pass) on collision to restore strict ordering. The result must be
/// re-validated: a domain too narrow for the breakpoint count cannot be
/// repaired by nudging.
pub fn coerce_to_domain(breakpoints: &[f64], domain: Scale) -> Vec<f64> {
    let mut out: Vec<f64> = breakpoints.to_vec();
    let Some(last) = out.len().checked_sub(1) else {
        return out;
    };
    out[0] = domain.min;
    out[last] = domain.max;

    for i in 1..last {
        let mut value = clamp(out[i], domain.min, domain.max);
        if value <= out[i - 1] {
            value = out[i - 1] + 1.0;
        }
        out[i] = value;
    }
    for i in (1..last).rev() {
        if out[i] >= out[i + 1] {
            out[i] = out[i + 1] - 1.0;
        }
    }
    out
}

/// Coerce a range list onto a new domain, preserving labels and colors
pub fn coerce_ranges_to_domain(ranges: &[ThresholdRange], domain: Scale) -> Vec<ThresholdRange> {
    let breakpoints = coerce_to_domain(&breakpoints_from_ranges(ranges), domain);
    ranges_from_breakpoints(&breakpoints, ranges)
}

/// Insert a breakpoint into the widest gap
///
/// Returns `None` when no gap has integer room (widest gap <= 1): the
/// edit is reported as lacking capacity, not as an error. Otherwise the
/// new breakpoint sits at the floor of the widest gap's midpoint,
/// clamped to `(min+1, max-1)`.
pub fn insert_breakpoint(breakpoints: &[f64], domain: Scale) -> Option<Vec<f64>> {
    if breakpoints.len() < 2 {
        return None;
    }

    let mut widest_index = 0;
    let mut widest_gap = f64::NEG_INFINITY;
    for i in 0..breakpoints.len() - 1 {
        let gap = breakpoints[i + 1] - breakpoints[i];
        if gap > widest_gap {
            widest_gap = gap;
            widest_index = i;
        }
    }
    if widest_gap <= 1.0 {
        return None;
    }

    let midpoint = ((breakpoints[widest_index] + breakpoints[widest_index + 1]) / 2.0).floor();
    let value = clamp(midpoint, domain.min + 1.0, domain.max - 1.0);

    let mut out = breakpoints.to_vec();
    out.insert(widest_index + 1, value);
    Some(out)
}

/// Remove an interior breakpoint, merging its two adjacent ranges
///
/// The first and last breakpoints carry the domain boundaries and cannot
/// be removed; `None` is returned for those (and for out-of-range
/// indices). Ranges are regenerated by index, so the merged range keeps
/// the label and color of the earlier of the two.
pub fn remove_breakpoint(
    breakpoints: &[f64],
    ranges: &[ThresholdRange],
    index: usize,
) -> Option<(Vec<f64>, Vec<ThresholdRange>)> {
    if breakpoints.len() < 3 {
        return None;
    }
    if index == 0 || index >= breakpoints.len() - 1 {
        return None;
    }

    let mut out = breakpoints.to_vec();
    out.remove(index);
    let merged = ranges_from_breakpoints(&out, ranges);
    Some((out, merged))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn low_medium_high() -> Vec<ThresholdRange> {
        vec![
            ThresholdRange::new(1.0, 5.0, "Low", "#4caf50"),
            ThresholdRange::new(5.0, 12.0, "Medium", "#ff9800"),
            ThresholdRange::new(12.0, 25.0, "High", "#f44336"),
        ]
    }

    #[test]
    fn test_breakpoints_from_ranges() {
        assert_eq!(
            breakpoints_from_ranges(&low_medium_high()),
            vec![1.0, 5.0, 12.0, 25.0]
        );
        assert!(breakpoints_from_ranges(&[]).is_empty());
    }

    #[test]
    fn test_ranges_from_breakpoints_reuses_prior_labels() {
        let prior = low_medium_high();
        let ranges = ranges_from_breakpoints(&[1.0, 6.0, 13.0, 25.0], &prior);
        assert_eq!(ranges.len(), 3);
        assert_eq!(ranges[0].label, "Low");
        assert_eq!(ranges[1].from, 6.0);
        assert_eq!(ranges[2].color, "#f44336");
    }

    #[test]
    fn test_ranges_from_breakpoints_defaults_past_prior() {
        let prior = low_medium_high();
        let ranges = ranges_from_breakpoints(&[1.0, 5.0, 10.0, 15.0, 25.0], &prior);
        assert_eq!(ranges.len(), 4);
        assert_eq!(ranges[3].label, "Level 4");
        assert_eq!(ranges[3].color, DEFAULT_RANGE_COLOR);
    }

    #[test]
    fn test_validate_flags_non_strict_ordering() {
        let errors = validate_breakpoints(&[1.0, 5.0, 5.0, 25.0], Scale::new(1.0, 25.0));
        assert!(errors[0].is_empty());
        assert!(!errors[2].is_empty());
        assert!(errors[2].contains("greater than the previous"));
        assert!(errors[3].is_empty());
    }

    #[test]
    fn test_validate_flags_wrong_endpoints() {
        let errors = validate_breakpoints(&[2.0, 5.0, 20.0], Scale::new(1.0, 25.0));
        assert!(errors[0].contains("minimum"));
        assert!(errors[2].contains("maximum"));
    }

    #[test]
    fn test_validate_flags_out_of_domain_interior() {
        let errors = validate_breakpoints(&[1.0, 30.0, 40.0, 50.0], Scale::new(1.0, 50.0));
        assert!(errors[0].is_empty());
        // 30 and 40 are ordered and in range; only validity of endpoints
        // and ordering matters
        assert!(errors[1].is_empty());
        assert!(errors[2].is_empty());

        let errors = validate_breakpoints(&[1.0, 0.0, 50.0], Scale::new(1.0, 50.0));
        assert!(errors[1].contains("between"));
    }

    #[test]
    fn test_is_valid_partition_rejects_gaps() {
        let gapped = vec![
            ThresholdRange::new(1.0, 5.0, "Low", "#4caf50"),
            ThresholdRange::new(6.0, 25.0, "High", "#f44336"),
        ];
        assert!(!is_valid_partition(&gapped, Scale::new(1.0, 25.0)));
        assert!(is_valid_partition(&low_medium_high(), Scale::new(1.0, 25.0)));
        assert!(!is_valid_partition(&[], Scale::new(1.0, 25.0)));
    }

    #[test]
    fn test_parameter_domain_products_and_scales() {
        let mut config = RiskAssessmentConfig::default_global();
        let risk_domain = parameter_domain(&config, ScoreParameter::RiskScore);
        assert_eq!(risk_domain, Scale::new(1.0, 25.0));

        let control_domain = parameter_domain(&config, ScoreParameter::ControlScore);
        assert_eq!(control_domain, Scale::new(1.0, 5.0));

        config.risk_score.mode = RiskScoreMode::Single;
        config.risk_score.score_scale = Scale::new(0.0, 100.0);
        let single_domain = parameter_domain(&config, ScoreParameter::ResidualRisk);
        assert_eq!(single_domain, Scale::new(0.0, 100.0));
    }

    #[test]
    fn test_coerce_forces_endpoints_and_clamps_interior() {
        // Scale shrank from [1, 25] to [1, 10]
        let coerced = coerce_to_domain(&[1.0, 5.0, 12.0, 25.0], Scale::new(1.0, 10.0));
        assert_eq!(coerced[0], 1.0);
        assert_eq!(coerced[3], 10.0);
        assert!(breakpoints_valid(&coerced, Scale::new(1.0, 10.0)));
    }

    #[test]
    fn test_coerce_nudges_collisions_apart() {
        // Both interior points clamp to 10, then nudging restores order
        let coerced = coerce_to_domain(&[1.0, 15.0, 20.0, 25.0], Scale::new(1.0, 10.0));
        assert_eq!(coerced, vec![1.0, 8.0, 9.0, 10.0]);
    }

    #[test]
    fn test_insert_breakpoint_splits_widest_gap() {
        let inserted = insert_breakpoint(&[1.0, 5.0, 12.0, 25.0], Scale::new(1.0, 25.0)).unwrap();
        // Widest gap is 12..25, midpoint floor 18
        assert_eq!(inserted, vec![1.0, 5.0, 12.0, 18.0, 25.0]);
    }

    #[test]
    fn test_insert_breakpoint_without_capacity() {
        assert!(insert_breakpoint(&[1.0, 2.0, 3.0], Scale::new(1.0, 3.0)).is_none());
        assert!(insert_breakpoint(&[1.0], Scale::new(1.0, 3.0)).is_none());
    }

    #[test]
    fn test_remove_breakpoint_merges_adjacent_ranges() {
        let ranges = low_medium_high();
        let breakpoints = breakpoints_from_ranges(&ranges);

        let (bps, merged) = remove_breakpoint(&breakpoints, &ranges, 1).unwrap();
        assert_eq!(bps, vec![1.0, 12.0, 25.0]);
        assert_eq!(merged.len(), 2);
        // Merged range keeps the earlier label at its index
        assert_eq!(merged[0].label, "Low");
        assert_eq!(merged[0].from, 1.0);
        assert_eq!(merged[0].to, 12.0);
    }

    #[test]
    fn test_remove_breakpoint_forbidden_at_boundaries() {
        let ranges = low_medium_high();
        let breakpoints = breakpoints_from_ranges(&ranges);
        assert!(remove_breakpoint(&breakpoints, &ranges, 0).is_none());
        assert!(remove_breakpoint(&breakpoints, &ranges, 3).is_none());
        assert!(remove_breakpoint(&breakpoints, &ranges, 9).is_none());
    }
}
