//! Append-only JSONL log of feedback entries.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::domain::FeedbackEntry;
use crate::error::{PlannerError, Result};

const FEEDBACK_FILE: &str = "feedback.jsonl";

/// One entry per line, oldest first on disk.
#[derive(Debug, Clone)]
pub struct FeedbackLog {
    path: PathBuf,
}

impl FeedbackLog {
    /// Create a log under `data_dir`, creating the directory if needed.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir)?;
        Ok(Self {
            path: data_dir.join(FEEDBACK_FILE),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an entry.
    pub fn append(&self, entry: &FeedbackEntry) -> Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{}", serde_json::to_string(entry)?)?;
        Ok(())
    }

    /// Every entry in file order (oldest first).
    pub fn all(&self) -> Result<Vec<FeedbackEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut entries = Vec::new();
        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let entry: FeedbackEntry = serde_json::from_str(&line).map_err(|e| {
                PlannerError::Storage(format!("{}:{}: {}", self.path.display(), number + 1, e))
            })?;
            entries.push(entry);
        }
        Ok(entries)
    }

    /// The `n` newest entries, most recent first.
    pub fn recent(&self, n: usize) -> Result<Vec<FeedbackEntry>> {
        Ok(self.all()?.into_iter().rev().take(n).collect())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.all()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
