//! Core domain types for the Liftplan training engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Set logs and logged-set journal entries
//! - Personal-record baselines
//! - Progression templates, strategies, and computed targets
//! - The exercise catalog

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

// ============================================================================
// Set and Record Types
// ============================================================================

/// One logged repetition attempt as supplied by a caller
///
/// A set contributes to volume only when it is completed and both
/// weight and reps are present and greater than zero.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct SetLog {
    pub weight: Option<f64>,
    pub reps: Option<u32>,
    pub completed: bool,
}

/// A client's best-known performance snapshot for one exercise
///
/// This is a read-only input to PR detection; the metrics engine never
/// mutates it. Reps-at-weight is keyed on tenths of a kilogram (see
/// [`weight_key`]) so lookups never depend on raw float equality.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct RecordState {
    pub e1rm: Option<f64>,
    pub max_weight: Option<f64>,
    pub max_reps_at_weight: Option<HashMap<u32, u32>>,
}

/// Convert a weight into the fixed-precision key used by
/// [`RecordState::max_reps_at_weight`] (tenths of a kilogram).
pub fn weight_key(weight: f64) -> u32 {
    (weight * 10.0).round() as u32
}

/// Outcome of a PR check for a single attempt
///
/// All flags report whether the attempt *would* beat the stored baseline;
/// persisting the new record is the caller's responsibility.
#[derive(Clone, Debug, PartialEq)]
pub struct PrCheck {
    pub is_e1rm_pr: bool,
    pub is_max_weight_pr: bool,
    pub is_max_reps_pr: bool,
    pub new_e1rm: f64,
}

// ============================================================================
// Progression Types
// ============================================================================

/// Program-wide progression strategy
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgressionType {
    None,
    Strength,
    Hypertrophy,
    Endurance,
    Linear,
}

impl ProgressionType {
    /// Parse a strategy name leniently (CLI and config input)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" => Some(Self::None),
            "strength" => Some(Self::Strength),
            "hypertrophy" => Some(Self::Hypertrophy),
            "endurance" => Some(Self::Endurance),
            "linear" => Some(Self::Linear),
            _ => None,
        }
    }
}

/// An inclusive rep range parsed from a template string like "8-12"
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepRange {
    pub low: u32,
    pub high: u32,
}

/// The unprogressed (week-0) target definition for one exercise
///
/// `target_reps` encodes either a single number ("10") or an inclusive
/// range ("8-12"). `target_weight` is a free-text label and may be empty
/// or non-numeric (e.g. "bodyweight").
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressionBase {
    pub target_sets: u32,
    pub target_reps: String,
    pub target_weight: String,
    pub rest_seconds: u32,
}

/// Computed targets for one exercise at one specific week
///
/// Recomputed on demand for any (exercise, week) pair; purely a function
/// of its inputs and never persisted by the engine itself.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProgressionResult {
    pub target_sets: u32,
    pub target_reps: String,
    pub target_weight: String,
    pub rest_seconds: u32,
    pub progression_note: String,
    pub target_weight_kg: Option<f64>,
    pub suggested_weight_change: Option<String>,
    pub target_rpe: Option<String>,
}

/// One week's entry in a whole-program preview
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WeekPreview {
    pub week: u32,
    pub targets: ProgressionResult,
}

// ============================================================================
// Journal and Record-Book Types
// ============================================================================

/// A set as recorded in the on-disk journal
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggedSet {
    pub id: Uuid,
    pub exercise_id: String,
    pub performed_at: DateTime<Utc>,
    pub weight: Option<f64>,
    pub reps: Option<u32>,
    pub completed: bool,
}

impl From<&LoggedSet> for SetLog {
    fn from(set: &LoggedSet) -> Self {
        SetLog {
            weight: set.weight,
            reps: set.reps,
            completed: set.completed,
        }
    }
}

/// Per-exercise record baselines, persisted across sessions
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct RecordBook {
    pub records: HashMap<String, RecordState>,
}

// ============================================================================
// Catalog Types
// ============================================================================

/// Broad muscle-group classification for catalog exercises
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Chest,
    Back,
    Legs,
    Shoulders,
    Arms,
    Core,
    FullBody,
}

/// An exercise definition (e.g. "Back Squat")
///
/// `uses_weight` distinguishes barbell/dumbbell work from bodyweight
/// movements, which progress by relative percentage only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub muscle_group: MuscleGroup,
    pub uses_weight: bool,
}

/// The complete catalog of known exercises
#[derive(Clone, Debug)]
pub struct Catalog {
    pub exercises: HashMap<String, Exercise>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_key_fixed_precision() {
        assert_eq!(weight_key(82.5), 825);
        assert_eq!(weight_key(100.0), 1000);
        // Values that differ past the first decimal collapse to the same key
        assert_eq!(weight_key(82.5000001), weight_key(82.5));
    }

    #[test]
    fn test_progression_type_parse() {
        assert_eq!(ProgressionType::parse("STRENGTH"), Some(ProgressionType::Strength));
        assert_eq!(ProgressionType::parse("linear"), Some(ProgressionType::Linear));
        assert_eq!(ProgressionType::parse("none"), Some(ProgressionType::None));
        assert_eq!(ProgressionType::parse("waves"), None);
    }

    #[test]
    fn test_progression_type_wire_format() {
        let json = serde_json::to_string(&ProgressionType::Hypertrophy).unwrap();
        assert_eq!(json, "\"HYPERTROPHY\"");

        let parsed: ProgressionType = serde_json::from_str("\"ENDURANCE\"").unwrap();
        assert_eq!(parsed, ProgressionType::Endurance);
    }

    #[test]
    fn test_logged_set_to_set_log() {
        let logged = LoggedSet {
            id: Uuid::new_v4(),
            exercise_id: "back_squat".into(),
            performed_at: Utc::now(),
            weight: Some(100.0),
            reps: Some(5),
            completed: true,
        };

        let set = SetLog::from(&logged);
        assert_eq!(set.weight, Some(100.0));
        assert_eq!(set.reps, Some(5));
        assert!(set.completed);
    }
}
