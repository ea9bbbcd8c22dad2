//! Set journal for workout persistence.
//!
//! Logged sets are appended to a JSONL (JSON Lines) file with file
//! locking to ensure safe concurrent access.

use crate::{LoggedSet, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Set sink trait for persisting logged sets
pub trait SetSink {
    fn append(&mut self, set: &LoggedSet) -> Result<()>;
}

/// JSONL-based set sink with file locking
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    /// Create a new JSONL sink for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl SetSink for JsonlSink {
    fn append(&mut self, set: &LoggedSet) -> Result<()> {
        self.ensure_parent_dir()?;

        // Open file for appending
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        // Acquire exclusive lock
        file.lock_exclusive()?;

        // Write set as JSON line
        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(set)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        // Lock is automatically released when file is dropped
        file.unlock()?;

        tracing::debug!("Appended set {} to journal", set.id);
        Ok(())
    }
}

/// Read all sets from a journal file
pub fn read_sets(path: &Path) -> Result<Vec<LoggedSet>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    // Acquire shared lock for reading
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut sets = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<LoggedSet>(&line) {
            Ok(set) => sets.push(set),
            Err(e) => {
                tracing::warn!("Failed to parse set at line {}: {}", line_num + 1, e);
                // Continue reading, don't fail completely
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} sets from journal", sets.len());
    Ok(sets)
}
