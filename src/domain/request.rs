//! Input snapshot for one scheduling run

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::interval::BlockedInterval;
use super::task::TaskForScheduling;

/// Everything a scheduling run needs besides preferences and feedback history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub tasks: Vec<TaskForScheduling>,
    pub target_date: NaiveDate,
    #[serde(default = "Utc::now")]
    pub now: DateTime<Utc>,
    /// `local = UTC - offset`
    #[serde(default)]
    pub timezone_offset_minutes: i32,
    #[serde(default)]
    pub blocked_intervals: Vec<BlockedInterval>,
}

impl ScheduleRequest {
    pub fn new(tasks: Vec<TaskForScheduling>, target_date: NaiveDate) -> Self {
        Self {
            tasks,
            target_date,
            now: Utc::now(),
            timezone_offset_minutes: 0,
            blocked_intervals: Vec::new(),
        }
    }

    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn with_offset(mut self, offset_minutes: i32) -> Self {
        self.timezone_offset_minutes = offset_minutes;
        self
    }

    pub fn with_blocked(mut self, blocked: Vec<BlockedInterval>) -> Self {
        self.blocked_intervals = blocked;
        self
    }

    /// Look up an input task by id.
    pub fn task(&self, id: i64) -> Option<&TaskForScheduling> {
        self.tasks.iter().find(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_from_json_with_defaults() {
        let json = r#"{
            "tasks": [{"id": 1, "title": "Email", "duration": 15, "importance": "Low"}],
            "targetDate": "2025-03-10"
        }"#;
        let request: ScheduleRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.tasks.len(), 1);
        assert_eq!(request.timezone_offset_minutes, 0);
        assert!(request.blocked_intervals.is_empty());
        assert_eq!(request.target_date, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
    }

    #[test]
    fn test_task_lookup() {
        let request = ScheduleRequest::new(
            vec![TaskForScheduling::new(4, "Gym", 60, "High")],
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
        );
        assert_eq!(request.task(4).map(|t| t.duration), Some(60));
        assert!(request.task(5).is_none());
    }
}
