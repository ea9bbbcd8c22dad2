//! Strength metrics: estimated 1RM, volume load, and PR detection.
//!
//! Every function here is pure and total: invalid or missing input yields
//! a defined zero/false result rather than an error. Downstream display
//! logic depends on receiving well-formed defaults, so none of these
//! functions may panic or return an Err.

use crate::{weight_key, PrCheck, RecordState, SetLog};

/// Epley per-rep coefficient, used at low rep counts (2-5)
pub const EPLEY_COEFF: f64 = 0.0333;

/// Brzycki denominator intercept, used above [`EPLEY_MAX_REPS`]
pub const BRZYCKI_INTERCEPT: f64 = 1.0278;

/// Brzycki per-rep slope
pub const BRZYCKI_SLOPE: f64 = 0.0278;

/// Crossover point between the Epley and Brzycki formulas
///
/// Epley tracks tested maxes better at low reps, Brzycki at higher reps.
pub const EPLEY_MAX_REPS: u32 = 5;

/// Estimate a one-rep max from a weight/reps observation
///
/// - Non-positive weight or zero reps returns 0.
/// - A single rep is already a true max and is returned unchanged.
/// - 2-5 reps use Epley: `weight * (1 + 0.0333 * reps)`.
/// - Above 5 reps use Brzycki: `weight / (1.0278 - 0.0278 * reps)`.
///
/// The Brzycki denominator goes non-positive near 37 reps; such inputs
/// degrade to 0 instead of producing a negative or infinite estimate.
pub fn calculate_e1rm(weight: f64, reps: u32) -> f64 {
    if weight <= 0.0 || reps == 0 {
        return 0.0;
    }

    if reps == 1 {
        return weight;
    }

    if reps <= EPLEY_MAX_REPS {
        return weight * (1.0 + EPLEY_COEFF * reps as f64);
    }

    let denominator = BRZYCKI_INTERCEPT - BRZYCKI_SLOPE * reps as f64;
    if denominator <= 0.0 {
        tracing::debug!("Brzycki denominator non-positive at {} reps", reps);
        return 0.0;
    }

    weight / denominator
}

/// Volume load of a single set
///
/// No guards: callers are expected to validate non-negativity upstream.
pub fn set_volume(weight: f64, reps: u32) -> f64 {
    weight * reps as f64
}

/// Total volume load across a session's sets
///
/// Only completed sets with both weight and reps present and positive
/// contribute; everything else counts as zero.
pub fn total_volume(sets: &[SetLog]) -> f64 {
    sets.iter()
        .filter(|s| s.completed)
        .filter_map(|s| match (s.weight, s.reps) {
            (Some(w), Some(r)) if w > 0.0 && r > 0 => Some(set_volume(w, r)),
            _ => None,
        })
        .sum()
}

/// Percentage change between two volume totals
///
/// A zero previous volume means no prior baseline and reports 0 rather
/// than infinite growth.
pub fn progressive_overload(current_volume: f64, previous_volume: f64) -> f64 {
    if previous_volume == 0.0 {
        return 0.0;
    }
    ((current_volume - previous_volume) / previous_volume) * 100.0
}

/// Check whether an attempt would break any stored personal record
///
/// Reports only; the stored baseline is never mutated here. An absent
/// e1RM or max-weight baseline counts as an automatic PR. The reps PR
/// requires the reps-at-weight map to exist and compares against the
/// entry at this attempt's tenth-kilogram key.
pub fn check_for_pr(weight: f64, reps: u32, current_records: &RecordState) -> PrCheck {
    let new_e1rm = calculate_e1rm(weight, reps);

    let is_e1rm_pr = current_records.e1rm.is_none_or(|best| new_e1rm > best);
    let is_max_weight_pr = current_records.max_weight.is_none_or(|best| weight > best);

    let is_max_reps_pr = match &current_records.max_reps_at_weight {
        Some(map) => match map.get(&weight_key(weight)) {
            Some(&best) => reps > best,
            None => true,
        },
        None => false,
    };

    PrCheck {
        is_e1rm_pr,
        is_max_weight_pr,
        is_max_reps_pr,
        new_e1rm,
    }
}

/// Working weight as a rounded percentage of an e1RM
pub fn intensity_percentage(weight: f64, e1rm: f64) -> f64 {
    if e1rm == 0.0 {
        return 0.0;
    }
    ((weight / e1rm) * 100.0).round()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    #[test]
    fn test_e1rm_single_rep_is_weight() {
        assert_eq!(calculate_e1rm(100.0, 1), 100.0);
        assert_eq!(calculate_e1rm(62.5, 1), 62.5);
    }

    #[test]
    fn test_e1rm_invalid_input_is_zero() {
        assert_eq!(calculate_e1rm(0.0, 5), 0.0);
        assert_eq!(calculate_e1rm(-80.0, 5), 0.0);
        assert_eq!(calculate_e1rm(100.0, 0), 0.0);
    }

    #[test]
    fn test_e1rm_epley_at_five_reps() {
        // 100 * (1 + 0.0333 * 5) = 116.65
        assert!(approx_eq(calculate_e1rm(100.0, 5), 116.65, 1e-9));
    }

    #[test]
    fn test_e1rm_brzycki_at_ten_reps() {
        // 100 / (1.0278 - 0.278) = 133.37...
        assert!(approx_eq(calculate_e1rm(100.0, 10), 133.368, 0.01));
    }

    #[test]
    fn test_e1rm_brzycki_denominator_collapse() {
        // Past ~37 reps the Brzycki denominator is non-positive
        assert_eq!(calculate_e1rm(100.0, 37), 0.0);
        assert_eq!(calculate_e1rm(100.0, 50), 0.0);
        assert!(calculate_e1rm(100.0, 36) > 0.0);
    }

    #[test]
    fn test_set_volume() {
        assert_eq!(set_volume(100.0, 5), 500.0);
        assert_eq!(set_volume(0.0, 5), 0.0);
    }

    #[test]
    fn test_total_volume_skips_incomplete_sets() {
        let sets = vec![
            SetLog {
                weight: Some(100.0),
                reps: Some(5),
                completed: true,
            },
            SetLog {
                weight: Some(80.0),
                reps: Some(8),
                completed: false,
            },
        ];
        assert_eq!(total_volume(&sets), 500.0);
    }

    #[test]
    fn test_total_volume_skips_missing_or_zero_values() {
        let sets = vec![
            SetLog {
                weight: None,
                reps: Some(5),
                completed: true,
            },
            SetLog {
                weight: Some(100.0),
                reps: None,
                completed: true,
            },
            SetLog {
                weight: Some(0.0),
                reps: Some(5),
                completed: true,
            },
            SetLog {
                weight: Some(60.0),
                reps: Some(10),
                completed: true,
            },
        ];
        assert_eq!(total_volume(&sets), 600.0);
    }

    #[test]
    fn test_progressive_overload() {
        assert!(approx_eq(progressive_overload(1100.0, 1000.0), 10.0, 1e-9));
        assert!(approx_eq(progressive_overload(900.0, 1000.0), -10.0, 1e-9));
    }

    #[test]
    fn test_progressive_overload_zero_baseline() {
        assert_eq!(progressive_overload(1000.0, 0.0), 0.0);
    }

    #[test]
    fn test_pr_against_empty_records() {
        let pr = check_for_pr(100.0, 5, &RecordState::default());
        assert!(pr.is_e1rm_pr);
        assert!(pr.is_max_weight_pr);
        // No reps-at-weight map recorded yet, so no reps PR
        assert!(!pr.is_max_reps_pr);
        assert!(approx_eq(pr.new_e1rm, 116.65, 1e-9));
    }

    #[test]
    fn test_max_weight_pr_requires_strictly_more() {
        let records = RecordState {
            max_weight: Some(100.0),
            ..Default::default()
        };

        assert!(check_for_pr(105.0, 5, &records).is_max_weight_pr);
        assert!(!check_for_pr(95.0, 5, &records).is_max_weight_pr);
        assert!(!check_for_pr(100.0, 5, &records).is_max_weight_pr);
    }

    #[test]
    fn test_e1rm_pr_against_baseline() {
        let records = RecordState {
            e1rm: Some(120.0),
            ..Default::default()
        };

        // 100x5 estimates 116.65, below the 120 baseline
        assert!(!check_for_pr(100.0, 5, &records).is_e1rm_pr);
        // 110x5 estimates 128.3
        assert!(check_for_pr(110.0, 5, &records).is_e1rm_pr);
    }

    #[test]
    fn test_reps_pr_uses_tenth_kg_key() {
        let mut map = HashMap::new();
        map.insert(weight_key(82.5), 8);
        let records = RecordState {
            max_reps_at_weight: Some(map),
            ..Default::default()
        };

        assert!(check_for_pr(82.5, 9, &records).is_max_reps_pr);
        assert!(!check_for_pr(82.5, 8, &records).is_max_reps_pr);
        // Unseen weight counts as a PR when the map exists
        assert!(check_for_pr(90.0, 3, &records).is_max_reps_pr);
    }

    #[test]
    fn test_intensity_percentage() {
        assert_eq!(intensity_percentage(85.0, 100.0), 85.0);
        assert_eq!(intensity_percentage(90.0, 120.0), 75.0);
        assert_eq!(intensity_percentage(100.0, 0.0), 0.0);
    }
}
