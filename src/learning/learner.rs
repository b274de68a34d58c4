//! Preference learning from schedule feedback.
//!
//! Numeric preferences move 20% of the way toward what the user did, so a
//! single odd correction cannot swing them far.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::{FeedbackEntry, FeedbackType, PreferencesDelta, ScheduledTask, TaskSnapshot, UserPreferences};
use crate::learning::keywords::apply_reason;
use crate::scheduler::clock;

pub const BLEND_FACTOR: f64 = 0.2;
/// Gaps at or beyond this many minutes are not breaks
pub const MAX_BREAK_GAP_MINUTES: i64 = 120;

/// Everything the user told us about one produced schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEvent {
    pub feedback_type: FeedbackType,
    #[serde(default)]
    pub proposed_schedule: Vec<ScheduledTask>,
    #[serde(default)]
    pub corrected_schedule: Option<Vec<ScheduledTask>>,
    #[serde(default)]
    pub task_metadata: Option<Vec<TaskSnapshot>>,
    #[serde(default)]
    pub reason: Option<String>,
    /// `local = UTC - offset`
    #[serde(default)]
    pub timezone_offset_minutes: i32,
}

impl FeedbackEvent {
    pub fn new(feedback_type: FeedbackType, proposed: Vec<ScheduledTask>) -> Self {
        Self {
            feedback_type,
            proposed_schedule: proposed,
            corrected_schedule: None,
            task_metadata: None,
            reason: None,
            timezone_offset_minutes: 0,
        }
    }

    pub fn approved(proposed: Vec<ScheduledTask>) -> Self {
        Self::new(FeedbackType::Approved, proposed)
    }

    pub fn corrected(proposed: Vec<ScheduledTask>, corrected: Vec<ScheduledTask>, metadata: Vec<TaskSnapshot>) -> Self {
        Self {
            corrected_schedule: Some(corrected),
            task_metadata: Some(metadata),
            ..Self::new(FeedbackType::Corrected, proposed)
        }
    }

    pub fn verbal(reason: impl Into<String>) -> Self {
        Self::new(FeedbackType::Verbal, Vec::new()).with_reason(reason)
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_offset(mut self, offset_minutes: i32) -> Self {
        self.timezone_offset_minutes = offset_minutes;
        self
    }

    /// The history record for this event.
    pub fn to_entry(&self) -> FeedbackEntry {
        FeedbackEntry {
            feedback_type: self.feedback_type,
            feedback_reason: self.reason.clone(),
            task_metadata: self.task_metadata.clone(),
            created_at: chrono::Utc::now(),
        }
    }
}

/// Compute the preference update implied by `event`.
pub fn learn(current: &UserPreferences, event: &FeedbackEvent) -> PreferencesDelta {
    match event.feedback_type {
        FeedbackType::Approved => PreferencesDelta {
            total_approved: Some(current.total_approved.saturating_add(1)),
            ..Default::default()
        },
        FeedbackType::Corrected => learn_correction(current, event),
        FeedbackType::Verbal => PreferencesDelta::default(),
    }
}

fn learn_correction(current: &UserPreferences, event: &FeedbackEvent) -> PreferencesDelta {
    let mut delta = PreferencesDelta {
        total_corrected: Some(current.total_corrected.saturating_add(1)),
        ..Default::default()
    };

    match (&event.corrected_schedule, &event.task_metadata) {
        (Some(corrected), Some(metadata)) if !corrected.is_empty() => {
            let corrected = chronological(corrected);
            let proposed = chronological(&event.proposed_schedule);

            if high_priority_moved_later(&proposed, &corrected, metadata) {
                delta.high_priority_time_preference = Some(current.high_priority_time_preference.later());
            }

            if let Some(average) = average_gap(&corrected) {
                delta.break_duration = Some(blend(f64::from(current.break_duration), average).max(0.0) as u32);
            }

            let first_hour = clock::local_hour(corrected[0].start_time, event.timezone_offset_minutes);
            let hour = blend(f64::from(current.preferred_start_hour), f64::from(first_hour));
            delta.preferred_start_hour = Some(hour.clamp(0.0, 23.0) as u32);
        }
        _ => log::debug!("Correction without schedule or metadata, only counting it"),
    }

    if let Some(reason) = event.reason.as_deref() {
        apply_reason(reason, current, &mut delta);
    }

    delta
}

/// Move `current` 20% of the way toward `target`, rounded.
pub fn blend(current: f64, target: f64) -> f64 {
    (current + (target - current) * BLEND_FACTOR).round()
}

fn chronological(schedule: &[ScheduledTask]) -> Vec<ScheduledTask> {
    let mut sorted = schedule.to_vec();
    sorted.sort_by_key(|s| s.start_time);
    sorted
}

/// Mean position of high-priority tasks in an ordered schedule.
pub fn average_rank(schedule: &[ScheduledTask], ids: &HashSet<i64>) -> Option<f64> {
    let ranks: Vec<f64> = schedule
        .iter()
        .enumerate()
        .filter(|(_, s)| ids.contains(&s.task_id))
        .map(|(i, _)| i as f64)
        .collect();

    (!ranks.is_empty()).then(|| ranks.iter().sum::<f64>() / ranks.len() as f64)
}

fn high_priority_moved_later(proposed: &[ScheduledTask], corrected: &[ScheduledTask], metadata: &[TaskSnapshot]) -> bool {
    let ids: HashSet<i64> = metadata
        .iter()
        .filter(|t| t.priority.is_high_priority())
        .map(|t| t.task_id)
        .collect();

    match (average_rank(proposed, &ids), average_rank(corrected, &ids)) {
        (Some(before), Some(after)) => after - before > 1.0,
        _ => false,
    }
}

/// Mean idle minutes between consecutive tasks, ignoring gaps outside (0, 120).
pub fn average_gap(schedule: &[ScheduledTask]) -> Option<f64> {
    let gaps: Vec<i64> = schedule
        .windows(2)
        .map(|pair| (pair[1].start_time - pair[0].end_time).num_minutes())
        .filter(|gap| *gap > 0 && *gap < MAX_BREAK_GAP_MINUTES)
        .collect();

    (!gaps.is_empty()).then(|| gaps.iter().sum::<i64>() as f64 / gaps.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Importance, TimePreference};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, h, m, 0).unwrap()
    }

    fn slot(id: i64, h: u32, m: u32, minutes: i64) -> ScheduledTask {
        ScheduledTask::new(id, at(h, m), Duration::minutes(minutes))
    }

    fn snapshot(id: i64, priority: Importance) -> TaskSnapshot {
        TaskSnapshot {
            task_id: id,
            priority,
            duration: 30,
            title: format!("Task {}", id),
        }
    }

    fn metadata() -> Vec<TaskSnapshot> {
        vec![
            snapshot(1, Importance::High),
            snapshot(2, Importance::Low),
            snapshot(3, Importance::Low),
            snapshot(4, Importance::Low),
        ]
    }

    fn proposed() -> Vec<ScheduledTask> {
        vec![slot(1, 9, 0, 30), slot(2, 9, 30, 30), slot(3, 10, 0, 30), slot(4, 10, 30, 30)]
    }

    #[test]
    fn test_approved_only_counts() {
        let current = UserPreferences::default();
        let delta = learn(&current, &FeedbackEvent::approved(proposed()));
        assert_eq!(
            delta,
            PreferencesDelta {
                total_approved: Some(1),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_approved_ignores_reason() {
        let event = FeedbackEvent::approved(proposed()).with_reason("evening please");
        let delta = learn(&UserPreferences::default(), &event);
        assert!(delta.high_priority_time_preference.is_none());
    }

    #[test]
    fn test_verbal_is_empty() {
        let delta = learn(&UserPreferences::default(), &FeedbackEvent::verbal("later is better, no break"));
        assert!(delta.is_empty());
    }

    #[test]
    fn test_high_priority_moved_later_advances_preference() {
        // Task 1 goes from first to last: rank 0 -> 3
        let corrected = vec![slot(2, 9, 0, 30), slot(3, 9, 30, 30), slot(4, 10, 0, 30), slot(1, 10, 30, 30)];
        let event = FeedbackEvent::corrected(proposed(), corrected, metadata());
        let delta = learn(&UserPreferences::default(), &event);
        assert_eq!(delta.total_corrected, Some(1));
        assert_eq!(delta.high_priority_time_preference, Some(TimePreference::Afternoon));
    }

    #[test]
    fn test_one_slot_later_is_not_enough() {
        let corrected = vec![slot(2, 9, 0, 30), slot(1, 9, 30, 30), slot(3, 10, 0, 30), slot(4, 10, 30, 30)];
        let event = FeedbackEvent::corrected(proposed(), corrected, metadata());
        let delta = learn(&UserPreferences::default(), &event);
        assert!(delta.high_priority_time_preference.is_none());
    }

    #[test]
    fn test_ranks_use_chronological_order() {
        // Same corrected schedule as above, listed out of order
        let corrected = vec![slot(1, 10, 30, 30), slot(4, 10, 0, 30), slot(2, 9, 0, 30), slot(3, 9, 30, 30)];
        let event = FeedbackEvent::corrected(proposed(), corrected, metadata());
        let delta = learn(&UserPreferences::default(), &event);
        assert_eq!(delta.high_priority_time_preference, Some(TimePreference::Afternoon));
    }

    #[test]
    fn test_evening_does_not_wrap() {
        let corrected = vec![slot(2, 9, 0, 30), slot(3, 9, 30, 30), slot(4, 10, 0, 30), slot(1, 10, 30, 30)];
        let mut current = UserPreferences::default();
        current.high_priority_time_preference = TimePreference::Evening;
        let delta = learn(&current, &FeedbackEvent::corrected(proposed(), corrected, metadata()));
        assert_eq!(delta.high_priority_time_preference, Some(TimePreference::Evening));
    }

    #[test]
    fn test_break_nudged_toward_observed_gaps() {
        // Gaps: 10, 20 -> average 15; 0 + 0.2 * 15 = 3
        let corrected = vec![slot(1, 9, 0, 30), slot(2, 9, 40, 30), slot(3, 10, 30, 30)];
        let event = FeedbackEvent::corrected(proposed(), corrected, metadata());
        let delta = learn(&UserPreferences::default(), &event);
        assert_eq!(delta.break_duration, Some(3));
    }

    #[test]
    fn test_noise_gaps_ignored() {
        // 0 and 150 minute gaps are both outside (0, 120)
        let corrected = vec![slot(1, 9, 0, 30), slot(2, 9, 30, 30), slot(3, 12, 30, 30)];
        let event = FeedbackEvent::corrected(proposed(), corrected, metadata());
        let delta = learn(&UserPreferences::default().with_break(10), &event);
        assert!(delta.break_duration.is_none());
        assert_eq!(average_gap(&[slot(1, 9, 0, 30)]), None);
    }

    #[test]
    fn test_start_hour_nudged_toward_first_task() {
        // 9 + 0.2 * (14 - 9) = 10
        let corrected = vec![slot(1, 14, 0, 30), slot(2, 14, 30, 30)];
        let event = FeedbackEvent::corrected(proposed(), corrected, metadata());
        let delta = learn(&UserPreferences::default(), &event);
        assert_eq!(delta.preferred_start_hour, Some(10));
    }

    #[test]
    fn test_start_hour_uses_local_time() {
        // 14:00 UTC is 09:00 at offset 300; 9 stays 9
        let corrected = vec![slot(1, 14, 0, 30)];
        let event = FeedbackEvent::corrected(proposed(), corrected, metadata()).with_offset(300);
        let delta = learn(&UserPreferences::default(), &event);
        assert_eq!(delta.preferred_start_hour, Some(9));
    }

    #[test]
    fn test_correction_without_data_still_counts_and_reads_reason() {
        let event = FeedbackEvent::new(FeedbackType::Corrected, proposed()).with_reason("after lunch please");
        let mut current = UserPreferences::default();
        current.total_corrected = 4;
        let delta = learn(&current, &event);
        assert_eq!(delta.total_corrected, Some(5));
        assert_eq!(delta.high_priority_time_preference, Some(TimePreference::Afternoon));
        assert!(delta.preferred_start_hour.is_none());
        assert!(delta.break_duration.is_none());
    }

    #[test]
    fn test_keywords_override_numeric_nudges() {
        // Numeric nudge would give break 3; "no break" floors it to 0
        let corrected = vec![slot(1, 9, 0, 30), slot(2, 9, 40, 30), slot(3, 10, 30, 30)];
        let event = FeedbackEvent::corrected(proposed(), corrected, metadata()).with_reason("No break between tasks");
        let delta = learn(&UserPreferences::default(), &event);
        assert_eq!(delta.break_duration, Some(0));
    }

    #[test]
    fn test_blend_rounds() {
        assert_eq!(blend(9.0, 14.0), 10.0);
        assert_eq!(blend(9.0, 12.0), 10.0);
        assert_eq!(blend(9.0, 10.0), 9.0);
        assert_eq!(blend(10.0, 0.0), 8.0);
    }

    #[test]
    fn test_average_rank() {
        let ids: HashSet<i64> = [1, 3].into_iter().collect();
        assert_eq!(average_rank(&proposed(), &ids), Some(1.0));
        assert_eq!(average_rank(&proposed(), &HashSet::new()), None);
    }

    #[test]
    fn test_event_from_json() {
        let json = r#"{
            "feedbackType": "corrected",
            "proposedSchedule": [{"taskId": 1, "startTime": "2025-03-10T09:00:00Z", "endTime": "2025-03-10T09:30:00Z"}],
            "correctedSchedule": [{"taskId": 1, "startTime": "2025-03-10T13:00:00Z", "endTime": "2025-03-10T13:30:00Z"}],
            "taskMetadata": [{"taskId": 1, "priority": "High", "duration": 30, "title": "Report"}],
            "reason": "afternoon works better"
        }"#;
        let event: FeedbackEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.feedback_type, FeedbackType::Corrected);
        assert_eq!(event.corrected_schedule.as_ref().map(Vec::len), Some(1));

        let entry = event.to_entry();
        assert_eq!(entry.reason(), Some("afternoon works better"));
        assert_eq!(entry.task_metadata.map(|m| m.len()), Some(1));
    }
}
