//! Task types crossing the scheduling boundary
//!
//! `TaskForScheduling` is the immutable input to a scheduling run and
//! `ScheduledTask` is its output. Importance labels are normalized into a
//! closed enum once, at deserialization time.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Importance label attached to a task
///
/// Parsing is total: anything unrecognized (including an empty label)
/// becomes `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Importance {
    Pareto,
    High,
    MedHigh,
    #[default]
    Medium,
    MedLow,
    Low,
}

impl Importance {
    /// All labels, highest first.
    pub const ALL: [Importance; 6] = [
        Importance::Pareto,
        Importance::High,
        Importance::MedHigh,
        Importance::Medium,
        Importance::MedLow,
        Importance::Low,
    ];

    /// Normalize a free-form label (trimmed, case-insensitive).
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "pareto" => Importance::Pareto,
            "high" => Importance::High,
            "med-high" => Importance::MedHigh,
            "medium" => Importance::Medium,
            "med-low" => Importance::MedLow,
            "low" => Importance::Low,
            _ => Importance::Medium,
        }
    }

    /// Canonical label as shown to users and the assistant.
    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::Pareto => "Pareto",
            Importance::High => "High",
            Importance::MedHigh => "Med-High",
            Importance::Medium => "Medium",
            Importance::MedLow => "Med-Low",
            Importance::Low => "Low",
        }
    }

    /// High and Med-High are what feedback learning tracks as "important".
    pub fn is_high_priority(&self) -> bool {
        matches!(self, Importance::High | Importance::MedHigh)
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for Importance {
    fn from(label: String) -> Self {
        Importance::parse(&label)
    }
}

impl From<&str> for Importance {
    fn from(label: &str) -> Self {
        Importance::parse(label)
    }
}

impl From<Importance> for String {
    fn from(importance: Importance) -> Self {
        importance.as_str().to_string()
    }
}

/// Longest span a single task may occupy (one year).
pub const MAX_TASK_MINUTES: i64 = 365 * 24 * 60;

/// `instant + span`, saturating at the end of chrono's range.
pub fn saturating_add(instant: DateTime<Utc>, span: Duration) -> DateTime<Utc> {
    instant.checked_add_signed(span).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// A pending task handed to the scheduler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskForScheduling {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    /// Minutes
    pub duration: i64,
    #[serde(default)]
    pub importance: Importance,
    #[serde(default)]
    pub current_start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub current_end_time: Option<DateTime<Utc>>,
}

impl TaskForScheduling {
    pub fn new(id: i64, title: impl Into<String>, duration: i64, importance: impl Into<Importance>) -> Self {
        Self {
            id,
            title: title.into(),
            duration,
            importance: importance.into(),
            current_start_time: None,
            current_end_time: None,
        }
    }

    /// Attach an existing placement used as an anchor hint.
    pub fn with_current_placement(mut self, start: DateTime<Utc>) -> Self {
        self.current_start_time = Some(start);
        self.current_end_time = Some(saturating_add(start, self.duration()));
        self
    }

    /// Duration as a chrono span, clamped to `0..=MAX_TASK_MINUTES`.
    pub fn duration(&self) -> Duration {
        Duration::minutes(self.duration.clamp(0, MAX_TASK_MINUTES))
    }
}

/// One placement in a produced schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTask {
    pub task_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl ScheduledTask {
    pub fn new(task_id: i64, start_time: DateTime<Utc>, duration: Duration) -> Self {
        Self {
            task_id,
            start_time,
            end_time: saturating_add(start_time, duration),
        }
    }

    /// Half-open overlap test against another `[start, end)` interval.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && start < self.end_time
    }
}
