//! Training history loading with a rolling day window.
//!
//! This module loads recent sets from both the journal and archived CSV
//! files to provide context for volume summaries and progress reports.

use crate::metrics::{progressive_overload, total_volume};
use crate::{LoggedSet, Result, SetLog};
use chrono::{DateTime, Duration, Utc};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use uuid::Uuid;

/// CSV row format for reading archived sets
#[derive(Debug, Deserialize)]
struct CsvRow {
    id: String,
    exercise_id: String,
    performed_at: String,
    weight: Option<f64>,
    reps: Option<u32>,
    completed: bool,
}

impl TryFrom<CsvRow> for LoggedSet {
    type Error = crate::Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| crate::Error::Other(format!("Invalid UUID: {}", e)))?;

        let performed_at = DateTime::parse_from_rfc3339(&row.performed_at)
            .map_err(|e| crate::Error::Other(format!("Invalid date: {}", e)))?
            .with_timezone(&Utc);

        Ok(LoggedSet {
            id,
            exercise_id: row.exercise_id,
            performed_at,
            weight: row.weight,
            reps: row.reps,
            completed: row.completed,
        })
    }
}

/// Load sets from the last N days from both journal and CSV
///
/// Returns sets sorted by performed_at (newest first).
/// Automatically deduplicates sets that appear in both journal and CSV.
pub fn load_recent_sets(
    journal_path: &Path,
    csv_path: &Path,
    days: i64,
) -> Result<Vec<LoggedSet>> {
    let cutoff = Utc::now() - Duration::days(days);
    let mut sets = Vec::new();
    let mut seen_ids = HashSet::new();

    // Load from journal first (most recent)
    if journal_path.exists() {
        let journal_sets = crate::journal::read_sets(journal_path)?;
        for set in journal_sets {
            if set.performed_at >= cutoff {
                seen_ids.insert(set.id);
                sets.push(set);
            }
        }
        tracing::debug!("Loaded {} sets from journal", sets.len());
    }

    // Load from CSV (archived)
    if csv_path.exists() {
        let csv_sets = load_sets_from_csv(csv_path)?;
        let mut csv_count = 0;
        for set in csv_sets {
            if set.performed_at >= cutoff && !seen_ids.contains(&set.id) {
                seen_ids.insert(set.id);
                sets.push(set);
                csv_count += 1;
            }
        }
        tracing::debug!("Loaded {} sets from CSV", csv_count);
    }

    // Sort by performed_at, newest first
    sets.sort_by(|a, b| b.performed_at.cmp(&a.performed_at));

    tracing::info!("Loaded {} total sets from last {} days", sets.len(), days);

    Ok(sets)
}

/// Load all sets from a CSV file
fn load_sets_from_csv(path: &Path) -> Result<Vec<LoggedSet>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let mut sets = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        match result {
            Ok(row) => match LoggedSet::try_from(row) {
                Ok(set) => sets.push(set),
                Err(e) => {
                    tracing::warn!("Failed to parse CSV row: {}", e);
                    // Continue processing other rows
                }
            },
            Err(e) => {
                tracing::warn!("Failed to deserialize CSV row: {}", e);
            }
        }
    }

    Ok(sets)
}

/// Total completed volume for one exercise inside a time window
pub fn window_volume(
    sets: &[LoggedSet],
    exercise_id: &str,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> f64 {
    let window: Vec<SetLog> = sets
        .iter()
        .filter(|s| s.exercise_id == exercise_id && s.performed_at >= from && s.performed_at < to)
        .map(SetLog::from)
        .collect();
    total_volume(&window)
}

/// Compare the most recent window against the one before it
///
/// Returns (current volume, previous volume, percent change).
pub fn volume_trend(
    sets: &[LoggedSet],
    exercise_id: &str,
    now: DateTime<Utc>,
    window_days: i64,
) -> (f64, f64, f64) {
    let window = Duration::days(window_days);
    let current = window_volume(sets, exercise_id, now - window, now);
    let previous = window_volume(sets, exercise_id, now - window - window, now - window);
    let change = progressive_overload(current, previous);
    (current, previous, change)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::SetSink;

    fn create_test_set(exercise_id: &str, days_ago: i64) -> LoggedSet {
        LoggedSet {
            id: Uuid::new_v4(),
            exercise_id: exercise_id.into(),
            performed_at: Utc::now() - Duration::days(days_ago),
            weight: Some(80.0),
            reps: Some(10),
            completed: true,
        }
    }

    #[test]
    fn test_load_recent_sets_from_journal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal_path = temp_dir.path().join("sets.jsonl");
        let csv_path = temp_dir.path().join("sets.csv");

        // Create sets at different days
        let mut sink = crate::journal::JsonlSink::new(&journal_path);
        sink.append(&create_test_set("bench_press", 1)).unwrap();
        sink.append(&create_test_set("bench_press", 3)).unwrap();
        sink.append(&create_test_set("bench_press", 10)).unwrap(); // Too old

        let sets = load_recent_sets(&journal_path, &csv_path, 7).unwrap();
        assert_eq!(sets.len(), 2);
    }

    #[test]
    fn test_deduplication_across_journal_and_csv() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal_path = temp_dir.path().join("sets.jsonl");
        let csv_path = temp_dir.path().join("sets.csv");

        // Add set to journal
        let set = create_test_set("bench_press", 1);
        let set_id = set.id;
        let mut sink = crate::journal::JsonlSink::new(&journal_path);
        sink.append(&set).unwrap();

        // Roll up to CSV (which includes the same set)
        crate::archive::journal_to_csv_and_archive(&journal_path, &csv_path).unwrap();

        // Load - should get only 1 set despite it being in CSV
        let sets = load_recent_sets(
            &temp_dir.path().join("nonexistent.jsonl"),
            &csv_path,
            7,
        )
        .unwrap();

        let count = sets.iter().filter(|s| s.id == set_id).count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_sets_sorted_newest_first() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal_path = temp_dir.path().join("sets.jsonl");
        let csv_path = temp_dir.path().join("sets.csv");

        let mut sink = crate::journal::JsonlSink::new(&journal_path);
        let old = create_test_set("back_squat", 5);
        let new = create_test_set("deadlift", 1);

        // Add in reverse chronological order
        sink.append(&old).unwrap();
        sink.append(&new).unwrap();

        let sets = load_recent_sets(&journal_path, &csv_path, 7).unwrap();

        // Should be sorted newest first
        assert_eq!(sets[0].exercise_id, "deadlift");
        assert_eq!(sets[1].exercise_id, "back_squat");
    }

    #[test]
    fn test_window_volume_filters_exercise_and_time() {
        let now = Utc::now();
        let sets = vec![
            create_test_set("bench_press", 1),
            create_test_set("bench_press", 2),
            create_test_set("back_squat", 1),
            create_test_set("bench_press", 20),
        ];

        let volume = window_volume(&sets, "bench_press", now - Duration::days(7), now);
        // Two in-window bench sets at 80.0 x 10
        assert_eq!(volume, 1600.0);
    }

    #[test]
    fn test_volume_trend_compares_windows() {
        let now = Utc::now();
        let sets = vec![
            create_test_set("bench_press", 1),
            create_test_set("bench_press", 2),
            create_test_set("bench_press", 9), // previous window
        ];

        let (current, previous, change) = volume_trend(&sets, "bench_press", now, 7);
        assert_eq!(current, 1600.0);
        assert_eq!(previous, 800.0);
        assert_eq!(change, 100.0);
    }

    #[test]
    fn test_volume_trend_empty_previous_window() {
        let now = Utc::now();
        let sets = vec![create_test_set("bench_press", 1)];

        let (_, previous, change) = volume_trend(&sets, "bench_press", now, 7);
        assert_eq!(previous, 0.0);
        assert_eq!(change, 0.0);
    }
}
