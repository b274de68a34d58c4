//! Externally owned busy time

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A window the scheduler must route around (e.g. a calendar event)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub title: Option<String>,
}

impl BlockedInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end, title: None }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Half-open overlap: `start < self.end && self.start < end`.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start < self.end && self.start < end
    }

    /// Label used in logs.
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or("busy")
    }
}
