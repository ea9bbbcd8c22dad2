//! CSV rollup functionality for archiving journaled sets.
//!
//! This module implements atomic journal-to-CSV conversion with proper
//! error handling to prevent data loss.

use crate::{LoggedSet, Result};
use std::fs::OpenOptions;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: String,
    exercise_id: String,
    performed_at: String,
    weight: Option<f64>,
    reps: Option<u32>,
    completed: bool,
}

impl From<&LoggedSet> for CsvRow {
    fn from(set: &LoggedSet) -> Self {
        CsvRow {
            id: set.id.to_string(),
            exercise_id: set.exercise_id.clone(),
            performed_at: set.performed_at.to_rfc3339(),
            weight: set.weight,
            reps: set.reps,
            completed: set.completed,
        }
    }
}

/// Roll up journaled sets into CSV and archive the journal atomically
///
/// This function:
/// 1. Reads all sets from the journal
/// 2. Appends them to the CSV file (creates with headers if needed)
/// 3. Syncs the CSV to disk
/// 4. Renames the journal to .processed
/// 5. Returns the number of sets processed
///
/// # Safety
/// - CSV is fsynced before the journal is renamed
/// - Journal is renamed (not deleted) to allow manual recovery if needed
/// - Processed journal files can be cleaned up manually
pub fn journal_to_csv_and_archive(journal_path: &Path, csv_path: &Path) -> Result<usize> {
    // Read all sets from the journal
    let sets = crate::journal::read_sets(journal_path)?;

    if sets.is_empty() {
        tracing::info!("No sets in journal to roll up");
        return Ok(0);
    }

    // Ensure parent directory exists
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Open CSV file for appending
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;

    // Determine if we need to write headers by checking file size after opening
    let needs_headers = file.metadata()?.len() == 0;

    // For appending, we need to skip headers manually if file already has content
    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    // Write all sets to CSV
    for set in &sets {
        let row = CsvRow::from(set);
        writer.serialize(row)?;
    }

    // Flush and sync to disk
    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Wrote {} sets to CSV", sets.len());

    // Atomically archive the journal by renaming it
    let processed_path = journal_path.with_extension("jsonl.processed");
    std::fs::rename(journal_path, &processed_path)?;

    tracing::info!("Archived journal to {:?}", processed_path);

    Ok(sets.len())
}

/// Clean up old processed journal files
///
/// This removes all .jsonl.processed files in the given directory.
pub fn cleanup_processed_journals(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if let Some(extension) = path.extension() {
            if extension == "processed" {
                std::fs::remove_file(&path)?;
                tracing::debug!("Removed processed journal: {:?}", path);
                count += 1;
            }
        }
    }

    if count > 0 {
        tracing::info!("Cleaned up {} processed journal files", count);
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::SetSink;
    use chrono::Utc;
    use std::fs::File;
    use uuid::Uuid;

    fn create_test_set(exercise_id: &str) -> LoggedSet {
        LoggedSet {
            id: Uuid::new_v4(),
            exercise_id: exercise_id.into(),
            performed_at: Utc::now(),
            weight: Some(80.0),
            reps: Some(8),
            completed: true,
        }
    }

    #[test]
    fn test_journal_to_csv_creates_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal_path = temp_dir.path().join("sets.jsonl");
        let csv_path = temp_dir.path().join("sets.csv");

        // Write sets to journal
        let mut sink = crate::journal::JsonlSink::new(&journal_path);
        for exercise in ["bench_press", "back_squat", "deadlift"] {
            sink.append(&create_test_set(exercise)).unwrap();
        }

        // Roll up to CSV
        let count = journal_to_csv_and_archive(&journal_path, &csv_path).unwrap();
        assert_eq!(count, 3);

        // Verify CSV exists
        assert!(csv_path.exists());

        // Verify journal was archived
        assert!(!journal_path.exists());
        assert!(journal_path.with_extension("jsonl.processed").exists());
    }

    #[test]
    fn test_journal_to_csv_appends() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal_path = temp_dir.path().join("sets.jsonl");
        let csv_path = temp_dir.path().join("sets.csv");

        // First rollup
        let mut sink = crate::journal::JsonlSink::new(&journal_path);
        sink.append(&create_test_set("bench_press")).unwrap();
        let count1 = journal_to_csv_and_archive(&journal_path, &csv_path).unwrap();
        assert_eq!(count1, 1);

        // Second rollup (appends)
        let mut sink = crate::journal::JsonlSink::new(&journal_path);
        sink.append(&create_test_set("back_squat")).unwrap();
        let count2 = journal_to_csv_and_archive(&journal_path, &csv_path).unwrap();
        assert_eq!(count2, 1);

        // Verify CSV has both entries
        let reader = csv::Reader::from_path(&csv_path).unwrap();
        let record_count = reader.into_records().count();
        assert_eq!(record_count, 2);
    }

    #[test]
    fn test_empty_journal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal_path = temp_dir.path().join("empty.jsonl");
        let csv_path = temp_dir.path().join("sets.csv");

        // Create empty journal
        File::create(&journal_path).unwrap();

        let count = journal_to_csv_and_archive(&journal_path, &csv_path).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_cleanup_processed_journals() {
        let temp_dir = tempfile::tempdir().unwrap();

        // Create some processed journal files
        File::create(temp_dir.path().join("s1.jsonl.processed")).unwrap();
        File::create(temp_dir.path().join("s2.jsonl.processed")).unwrap();
        File::create(temp_dir.path().join("keep.jsonl")).unwrap();

        let count = cleanup_processed_journals(temp_dir.path()).unwrap();
        assert_eq!(count, 2);

        // Verify only .processed files were removed
        assert!(!temp_dir.path().join("s1.jsonl.processed").exists());
        assert!(!temp_dir.path().join("s2.jsonl.processed").exists());
        assert!(temp_dir.path().join("keep.jsonl").exists());
    }
}
