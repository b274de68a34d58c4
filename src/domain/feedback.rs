//! Feedback records about previously produced schedules
//!
//! The log is append-only; entries are never mutated after creation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::task::Importance;

/// Kind of signal the user gave about a schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackType {
    /// Schedule accepted as-is
    Approved,
    /// User moved tasks around
    Corrected,
    /// Free-text comment only
    Verbal,
}

impl FeedbackType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackType::Approved => "approved",
            FeedbackType::Corrected => "corrected",
            FeedbackType::Verbal => "verbal",
        }
    }
}

impl fmt::Display for FeedbackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Task attributes captured when the feedback was given
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSnapshot {
    pub task_id: i64,
    #[serde(default)]
    pub priority: Importance,
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub title: String,
}

/// One entry of the feedback history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntry {
    pub feedback_type: FeedbackType,
    #[serde(default)]
    pub feedback_reason: Option<String>,
    #[serde(default)]
    pub task_metadata: Option<Vec<TaskSnapshot>>,
    pub created_at: DateTime<Utc>,
}

impl FeedbackEntry {
    pub fn new(feedback_type: FeedbackType) -> Self {
        Self {
            feedback_type,
            feedback_reason: None,
            task_metadata: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.feedback_reason = Some(reason.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Vec<TaskSnapshot>) -> Self {
        self.task_metadata = Some(metadata);
        self
    }

    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// The reason text, if present and not blank.
    pub fn reason(&self) -> Option<&str> {
        self.feedback_reason.as_deref().map(str::trim).filter(|r| !r.is_empty())
    }
}
