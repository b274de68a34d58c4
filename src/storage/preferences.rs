//! JSON-file preference store.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::UserPreferences;
use crate::error::{PlannerError, Result};

const PREFERENCES_FILE: &str = "preferences.json";

/// Stores one `UserPreferences` document under a data directory.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    /// Create a store rooted at `data_dir`, creating the directory if needed.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir)?;
        Ok(Self {
            path: data_dir.join(PREFERENCES_FILE),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored preferences, or defaults when nothing has been saved yet.
    pub fn load(&self) -> Result<UserPreferences> {
        if !self.path.exists() {
            log::debug!("No preferences at {}, using defaults", self.path.display());
            return Ok(UserPreferences::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let prefs: UserPreferences = serde_json::from_str(&content)
            .map_err(|e| PlannerError::Storage(format!("Corrupt preferences {}: {}", self.path.display(), e)))?;

        if !prefs.hours_are_valid() {
            return Err(PlannerError::Storage(format!(
                "Invalid working hours {}-{} in {}",
                prefs.preferred_start_hour,
                prefs.preferred_end_hour,
                self.path.display()
            )));
        }

        Ok(prefs)
    }

    /// Write `prefs`, replacing the previous document atomically.
    pub fn save(&self, prefs: &UserPreferences) -> Result<()> {
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file = File::create(&tmp)?;
            file.write_all(serde_json::to_string_pretty(prefs)?.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        log::debug!("Saved preferences to {}", self.path.display());
        Ok(())
    }

    /// Remove stored preferences so the next load returns defaults.
    pub fn reset(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
