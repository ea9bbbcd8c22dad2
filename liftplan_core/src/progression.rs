//! Week-by-week program progression.
//!
//! Given a workout's base targets and a progression strategy, this module
//! computes the adjusted sets/reps/weight/rest for any week of a program,
//! along with a coaching note and a suggested RPE band:
//! - STRENGTH: weight up, reps taper toward a floor, rest grows
//! - HYPERTROPHY: volume first, +1 set past the program midpoint
//! - ENDURANCE: reps up, rest down, deliberately gentler weight growth
//! - LINEAR: weight only
//! - NONE: base targets pass through untouched
//!
//! Like the metrics module, everything here is pure and never fails:
//! malformed rep strings fall back to a default range, and out-of-range
//! weeks saturate instead of erroring.

use crate::{ProgressionBase, ProgressionResult, ProgressionType, RepRange, WeekPreview};
use chrono::{DateTime, Utc};

/// Weekly growth applied to the starting weight for STRENGTH,
/// HYPERTROPHY, and LINEAR (percent, linear in weeks elapsed)
pub const WEEKLY_GROWTH_PCT: f64 = 2.5;

/// Weekly growth for ENDURANCE, deliberately smaller than
/// [`WEEKLY_GROWTH_PCT`] since endurance work de-emphasizes load
pub const ENDURANCE_WEEKLY_GROWTH_PCT: f64 = 1.0;

/// Plate increment that computed weights are rounded to
pub const PLATE_INCREMENT_KG: f64 = 2.5;

/// Fallback range when a rep string cannot be parsed
pub const DEFAULT_REP_RANGE: RepRange = RepRange { low: 8, high: 12 };

/// Rep floor that the STRENGTH taper never drops below
pub const STRENGTH_REP_FLOOR: u32 = 4;

/// Rest floor for the ENDURANCE rest ramp-down
pub const ENDURANCE_REST_FLOOR_SECS: u32 = 30;

/// Rest added per two full weeks on STRENGTH
const STRENGTH_REST_STEP_SECS: u32 = 15;

/// Total rep gain ENDURANCE ramps toward over a program
const ENDURANCE_REP_GAIN: f64 = 6.0;

/// Total rest reduction ENDURANCE ramps toward over a program
const ENDURANCE_REST_DROP_SECS: f64 = 30.0;

/// Parse a rep template: either a bare number ("10") or an inclusive
/// range ("8-12")
///
/// Malformed input silently falls back to [`DEFAULT_REP_RANGE`] rather
/// than erroring; downstream display depends on this.
pub fn parse_rep_range(reps_text: &str) -> RepRange {
    let text = reps_text.trim();

    if let Some((low, high)) = text.split_once('-') {
        return match (low.trim().parse(), high.trim().parse()) {
            (Ok(low), Ok(high)) => RepRange { low, high },
            _ => DEFAULT_REP_RANGE,
        };
    }

    match text.parse() {
        Ok(n) => RepRange { low: n, high: n },
        Err(_) => DEFAULT_REP_RANGE,
    }
}

/// Format a rep range back into template form
pub fn format_rep_range(low: u32, high: u32) -> String {
    if low == high {
        low.to_string()
    } else {
        format!("{}-{}", low, high)
    }
}

/// Round a weight to the nearest plate increment
pub fn round_to_plate(value: f64) -> f64 {
    (value / PLATE_INCREMENT_KG).round() * PLATE_INCREMENT_KG
}

/// Current week number of a running program, clamped to `[1, total_weeks]`
///
/// A program that has not started yet reports week 1; a finished program
/// reports its final week.
pub fn calculate_week_number(start_date: DateTime<Utc>, total_weeks: u32) -> u32 {
    week_number_at(start_date, Utc::now(), total_weeks)
}

/// Week number at an explicit point in time (week 1 = the start week)
pub fn week_number_at(start_date: DateTime<Utc>, now: DateTime<Utc>, total_weeks: u32) -> u32 {
    let elapsed_weeks = (now - start_date).num_weeks();
    let week = elapsed_weeks + 1;
    week.clamp(1, i64::from(total_weeks.max(1))) as u32
}

/// Compute the concrete targets for one exercise at one week
///
/// `starting_weight` is a client-specific baseline in kg; when absent (or
/// non-positive) weight progression is expressed as a relative percentage
/// annotation instead of an absolute target.
pub fn apply_progression(
    base: &ProgressionBase,
    week_number: u32,
    progression_type: ProgressionType,
    total_weeks: u32,
    starting_weight: Option<f64>,
) -> ProgressionResult {
    // NONE is a terminal passthrough: no notes, no RPE, no weight math.
    if progression_type == ProgressionType::None {
        return ProgressionResult {
            target_sets: base.target_sets,
            target_reps: base.target_reps.clone(),
            target_weight: base.target_weight.clone(),
            rest_seconds: base.rest_seconds,
            progression_note: String::new(),
            target_weight_kg: None,
            suggested_weight_change: None,
            target_rpe: None,
        };
    }

    let weeks_elapsed = week_number.saturating_sub(1);
    let we = weeks_elapsed as f64;
    let halfway_week = (total_weeks + 1) / 2;
    // Denominator for per-week ramps; single-week programs ramp over 1
    let span = total_weeks.saturating_sub(1).max(1) as f64;

    let range = parse_rep_range(&base.target_reps);
    let mut low = i64::from(range.low);
    let mut high = i64::from(range.high);
    let mut sets = base.target_sets;
    let mut rest = i64::from(base.rest_seconds);

    // Shared weight progression for STRENGTH/HYPERTROPHY/LINEAR. Applied
    // to the original starting weight each week, so growth is linear in
    // weeks elapsed rather than compounding.
    let mut absolute_kg = None;
    let mut relative_change = None;
    if matches!(
        progression_type,
        ProgressionType::Strength | ProgressionType::Hypertrophy | ProgressionType::Linear
    ) {
        let multiplier = 1.0 + (WEEKLY_GROWTH_PCT / 100.0) * we;
        match starting_weight {
            Some(sw) if sw > 0.0 => {
                absolute_kg = Some(round_to_plate(sw * multiplier));
            }
            _ => {
                if weeks_elapsed > 0 {
                    relative_change = Some(format!("+{:.1}%", WEEKLY_GROWTH_PCT * we));
                }
            }
        }
    }

    let progression_note = match progression_type {
        ProgressionType::Strength => {
            let rep_drop =
                (((range.high as f64) - STRENGTH_REP_FLOOR as f64) / span * we).round() as i64;
            low = (low - rep_drop).max(i64::from(STRENGTH_REP_FLOOR));
            high = (high - rep_drop).max(i64::from(STRENGTH_REP_FLOOR));
            rest += i64::from(weeks_elapsed / 2) * i64::from(STRENGTH_REST_STEP_SECS);

            if weeks_elapsed == 0 {
                "Base week".to_string()
            } else {
                format!("Wk {}: heavier weight, fewer reps", week_number)
            }
        }

        ProgressionType::Hypertrophy => {
            if week_number > halfway_week {
                sets += 1;
                format!("Wk {}: +1 set, pushing intensity", week_number)
            } else {
                format!("Wk {}: building volume", week_number)
            }
        }

        ProgressionType::Endurance => {
            let rep_gain = (ENDURANCE_REP_GAIN / span * we).round() as i64;
            low += rep_gain;
            high += rep_gain;

            // Endurance replaces the shared weight model with its own
            // smaller one and has no relative-percentage fallback.
            absolute_kg = None;
            relative_change = None;
            if let Some(sw) = starting_weight {
                if sw > 0.0 {
                    let multiplier = 1.0 + (ENDURANCE_WEEKLY_GROWTH_PCT / 100.0) * we;
                    absolute_kg = Some(round_to_plate(sw * multiplier));
                }
            }

            let rest_drop = (ENDURANCE_REST_DROP_SECS / span * we).round() as i64;
            rest = (rest - rest_drop).max(i64::from(ENDURANCE_REST_FLOOR_SECS));

            if weeks_elapsed == 0 {
                "Base week".to_string()
            } else {
                format!("Wk {}: more reps, shorter rest", week_number)
            }
        }

        ProgressionType::Linear => {
            if weeks_elapsed == 0 {
                "Base week".to_string()
            } else {
                format!("Wk {}: +{:.1}% weight", week_number, WEEKLY_GROWTH_PCT * we)
            }
        }

        ProgressionType::None => unreachable!("handled above"),
    };

    let progress_fraction = if total_weeks <= 1 {
        0.0
    } else {
        we / (total_weeks - 1) as f64
    };
    let target_rpe = match progression_type {
        ProgressionType::Strength => {
            if progress_fraction < 0.33 {
                "7-8"
            } else if progress_fraction < 0.66 {
                "8-9"
            } else {
                "9-10"
            }
        }
        ProgressionType::Hypertrophy => {
            if week_number <= halfway_week {
                "7-8"
            } else {
                "8-9"
            }
        }
        ProgressionType::Endurance => {
            if progress_fraction < 0.5 {
                "6-7"
            } else {
                "7-8"
            }
        }
        ProgressionType::Linear => {
            if progress_fraction < 0.5 {
                "7-8"
            } else {
                "8-9"
            }
        }
        ProgressionType::None => unreachable!("handled above"),
    };

    // Display precedence: absolute kg, then annotated label, then label.
    let target_weight = if let Some(kg) = absolute_kg {
        format!("{} kg", kg)
    } else if let Some(ref change) = relative_change {
        if base.target_weight.is_empty() {
            change.clone()
        } else {
            format!("{} ({})", base.target_weight, change)
        }
    } else {
        base.target_weight.clone()
    };

    ProgressionResult {
        target_sets: sets,
        target_reps: format_rep_range(low.max(0) as u32, high.max(0) as u32),
        target_weight,
        rest_seconds: rest.max(0) as u32,
        progression_note,
        target_weight_kg: absolute_kg,
        suggested_weight_change: relative_change,
        target_rpe: Some(target_rpe.to_string()),
    }
}

/// Compute targets for every week of a program, week 1 through
/// `total_weeks`
pub fn generate_progression_preview(
    base: &ProgressionBase,
    progression_type: ProgressionType,
    total_weeks: u32,
    starting_weight: Option<f64>,
) -> Vec<WeekPreview> {
    (1..=total_weeks)
        .map(|week| WeekPreview {
            week,
            targets: apply_progression(base, week, progression_type, total_weeks, starting_weight),
        })
        .collect()
}
