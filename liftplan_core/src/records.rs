//! Personal record persistence with file locking.
//!
//! This module handles saving and loading per-exercise personal records
//! with proper file locking to prevent concurrent access issues.

use crate::metrics::{calculate_e1rm, check_for_pr};
use crate::types::weight_key;
use crate::{Error, PrCheck, RecordBook, RecordState, Result};
use fs2::FileExt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

impl RecordBook {
    /// Load the record book from a file with shared locking
    ///
    /// Returns an empty book if the file doesn't exist.
    /// If the file is corrupted, logs a warning and returns an empty book.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No records file found, starting fresh");
            return Ok(Self::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(
                    "Unable to open records file {:?}: {}. Starting fresh.",
                    path,
                    e
                );
                return Ok(Self::default());
            }
        };

        // Acquire shared lock for reading
        if let Err(e) = file.lock_shared() {
            tracing::warn!(
                "Unable to lock records file {:?}: {}. Starting fresh.",
                path,
                e
            );
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!(
                "Failed to read records file {:?}: {}. Starting fresh.",
                path,
                e
            );
            return Ok(Self::default());
        }

        file.unlock()?;

        match serde_json::from_str::<RecordBook>(&contents) {
            Ok(book) => {
                tracing::debug!("Loaded records from {:?}", path);
                Ok(book)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse records file {:?}: {}. Starting fresh.",
                    path,
                    e
                );
                Ok(Self::default())
            }
        }
    }

    /// Save the record book to a file with exclusive locking
    ///
    /// Atomically writes by:
    /// 1. Writing to a temp file
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Create unique temp file in the same directory for atomic rename
        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "records path missing parent")
        })?)?;

        // Acquire exclusive lock on the temp file to serialize concurrent writers
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        // Atomically replace old records file
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved records to {:?}", path);
        Ok(())
    }

    /// Load records, modify them, and save them back atomically
    ///
    /// This is a convenience method that handles the load-modify-save pattern
    /// with proper error handling.
    pub fn update<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(&mut RecordBook) -> Result<()>,
    {
        let mut book = Self::load(path)?;
        f(&mut book)?;
        book.save(path)?;
        Ok(book)
    }

    /// Record an attempt against an exercise and fold any new PRs into
    /// the stored records
    ///
    /// Returns the PR evaluation so callers can report what changed.
    pub fn record_attempt(&mut self, exercise_id: &str, weight: f64, reps: u32) -> PrCheck {
        let records = self.records.entry(exercise_id.to_string()).or_default();
        let check = check_for_pr(weight, reps, records);

        if check.is_e1rm_pr {
            records.e1rm = Some(calculate_e1rm(weight, reps));
        }
        if check.is_max_weight_pr {
            records.max_weight = Some(weight);
        }
        if check.is_max_reps_pr {
            if let Some(map) = records.max_reps_at_weight.as_mut() {
                map.insert(weight_key(weight), reps);
            }
        }

        check
    }
}
