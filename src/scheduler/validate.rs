//! Structural checks on a produced schedule.

use std::collections::HashSet;

use crate::domain::{BlockedInterval, ScheduledTask, TaskForScheduling};
use crate::error::{PlannerError, Result};

/// Check that `schedule` covers `tasks` exactly once each with the right durations.
pub fn validate_schedule(tasks: &[TaskForScheduling], schedule: &[ScheduledTask]) -> Result<()> {
    let mut seen = HashSet::new();

    for slot in schedule {
        let task = tasks
            .iter()
            .find(|t| t.id == slot.task_id)
            .ok_or_else(|| PlannerError::InvalidInput(format!("unknown task id {}", slot.task_id)))?;

        if !seen.insert(slot.task_id) {
            return Err(PlannerError::InvalidInput(format!("task {} scheduled twice", slot.task_id)));
        }

        if slot.end_time - slot.start_time != task.duration() {
            return Err(PlannerError::InvalidInput(format!(
                "task {} spans {} minutes, expected {}",
                slot.task_id,
                (slot.end_time - slot.start_time).num_minutes(),
                task.duration
            )));
        }
    }

    let missing: Vec<i64> = tasks.iter().map(|t| t.id).filter(|id| !seen.contains(id)).collect();
    if !missing.is_empty() {
        return Err(PlannerError::InvalidInput(format!("tasks not scheduled: {:?}", missing)));
    }

    Ok(())
}

/// Pairs of task ids whose placements overlap each other.
pub fn overlapping_pairs(schedule: &[ScheduledTask]) -> Vec<(i64, i64)> {
    let mut pairs = Vec::new();
    for (i, a) in schedule.iter().enumerate() {
        for b in &schedule[i + 1..] {
            if a.overlaps(b.start_time, b.end_time) {
                pairs.push((a.task_id, b.task_id));
            }
        }
    }
    pairs
}

/// Placements that overlap a blocked interval, with the interval's label.
pub fn blocked_collisions<'a>(schedule: &[ScheduledTask], blocked: &'a [BlockedInterval]) -> Vec<(i64, &'a str)> {
    schedule
        .iter()
        .flat_map(|slot| {
            blocked
                .iter()
                .filter(|b| b.overlaps(slot.start_time, slot.end_time))
                .map(|b| (slot.task_id, b.label()))
        })
        .collect()
}
