//! Deterministic priority-weighted placement.
//!
//! Tasks are placed one after another, highest weight first, starting at an
//! anchor time. Each placement is routed around blocked intervals and, if it
//! would end after the working day, moved wholesale to the next day's start
//! hour. The rolled-over placement is not re-checked against blocked
//! intervals.
//!
//! This path is total: it never fails and always returns one entry per task.

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};

use crate::domain::{BlockedInterval, ScheduleRequest, ScheduledTask, TaskForScheduling, UserPreferences, saturating_add};
use crate::scheduler::clock;
use crate::scheduler::conflict::ConflictResolver;
use crate::scheduler::priority::sort_by_priority;

/// Build a schedule for `tasks` on `target_date`.
pub fn schedule(
    tasks: &[TaskForScheduling],
    target_date: NaiveDate,
    prefs: &UserPreferences,
    offset_minutes: i32,
    blocked: &[BlockedInterval],
) -> Vec<ScheduledTask> {
    if tasks.is_empty() {
        return Vec::new();
    }

    let ordered = sort_by_priority(tasks, &prefs.priority_weights);
    let anchor = anchor_time(tasks, target_date, prefs, offset_minutes);
    let resolver = ConflictResolver::new(blocked, prefs.break_duration);
    let gap = Duration::minutes(i64::from(prefs.break_duration));

    log::debug!(
        "Placing {} tasks from anchor {} ({} blocked intervals)",
        ordered.len(),
        clock::format_local_datetime(anchor, offset_minutes),
        blocked.len()
    );

    let (placed, _cursor) = ordered.into_iter().fold(
        (Vec::with_capacity(tasks.len()), anchor),
        |(mut placed, cursor), task| {
            let slot = place(task, cursor, &resolver, prefs, offset_minutes);
            let next_cursor = saturating_add(slot.end_time, gap);
            placed.push(slot);
            (placed, next_cursor)
        },
    );

    placed
}

/// Convenience wrapper over `schedule` for a full request.
pub fn schedule_request(request: &ScheduleRequest, prefs: &UserPreferences) -> Vec<ScheduledTask> {
    schedule(
        &request.tasks,
        request.target_date,
        prefs,
        request.timezone_offset_minutes,
        &request.blocked_intervals,
    )
}

/// Where sequential placement begins.
///
/// The earliest existing placement wins; otherwise the target date at the
/// preferred start hour. Anything before the start hour is clamped forward
/// to the start hour of the same local day.
pub fn anchor_time(
    tasks: &[TaskForScheduling],
    target_date: NaiveDate,
    prefs: &UserPreferences,
    offset_minutes: i32,
) -> DateTime<Utc> {
    let anchor = tasks
        .iter()
        .filter_map(|t| t.current_start_time)
        .min()
        .unwrap_or_else(|| clock::local_at(target_date, prefs.preferred_start_hour, 0, offset_minutes));

    if clock::local_hour(anchor, offset_minutes) < prefs.preferred_start_hour {
        let day = clock::local_date(anchor, offset_minutes);
        clock::local_at(day, prefs.preferred_start_hour, 0, offset_minutes)
    } else {
        anchor
    }
}

/// True when `[start, end)` runs past the preferred end hour in local time.
pub fn exceeds_work_day(start: DateTime<Utc>, end: DateTime<Utc>, prefs: &UserPreferences, offset_minutes: i32) -> bool {
    let start_local = clock::to_local(start, offset_minutes);
    let end_local = clock::to_local(end, offset_minutes);
    end_local.hour() > prefs.preferred_end_hour || end_local.date() > start_local.date()
}

fn place(
    task: &TaskForScheduling,
    cursor: DateTime<Utc>,
    resolver: &ConflictResolver<'_>,
    prefs: &UserPreferences,
    offset_minutes: i32,
) -> ScheduledTask {
    let duration = task.duration();
    let resolution = resolver.resolve(cursor, duration);
    let proposal = resolution.proposal;

    if exceeds_work_day(proposal.start, proposal.end, prefs, offset_minutes) {
        let day = clock::next_day(clock::local_date(cursor, offset_minutes));
        let start = clock::local_at(day, prefs.preferred_start_hour, 0, offset_minutes);
        log::debug!(
            "Task {} would end at {}, rolling to {}",
            task.id,
            clock::format_local_datetime(proposal.end, offset_minutes),
            clock::format_local_datetime(start, offset_minutes)
        );
        return ScheduledTask::new(task.id, start, duration);
    }

    ScheduledTask::new(task.id, proposal.start, duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, h, m, 0).unwrap()
    }

    fn task(id: i64, duration: i64, importance: &str) -> TaskForScheduling {
        TaskForScheduling::new(id, format!("Task {}", id), duration, importance)
    }

    fn prefs() -> UserPreferences {
        UserPreferences::default().with_hours(8, 18)
    }

    #[test]
    fn test_empty_tasks() {
        assert!(schedule(&[], date(), &prefs(), 0, &[]).is_empty());
    }

    #[test]
    fn test_three_tasks_priority_order() {
        let tasks = vec![task(1, 30, "High"), task(2, 60, "Low"), task(3, 15, "Pareto")];
        let result = schedule(&tasks, date(), &prefs(), 0, &[]);

        let ids: Vec<i64> = result.iter().map(|s| s.task_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!((result[0].start_time, result[0].end_time), (at(8, 0), at(8, 15)));
        assert_eq!((result[1].start_time, result[1].end_time), (at(8, 15), at(8, 45)));
        assert_eq!((result[2].start_time, result[2].end_time), (at(8, 45), at(9, 45)));
    }

    #[test]
    fn test_offset_applies_to_anchor() {
        // UTC-5: 08:00 local is 13:00 UTC
        let tasks = vec![task(1, 30, "High")];
        let result = schedule(&tasks, date(), &prefs(), 300, &[]);
        assert_eq!(result[0].start_time, at(13, 0));
    }

    #[test]
    fn test_break_between_tasks() {
        let tasks = vec![task(1, 30, "High"), task(2, 30, "Low")];
        let result = schedule(&tasks, date(), &prefs().with_break(10), 0, &[]);
        assert_eq!(result[1].start_time, at(8, 40));
    }

    #[test]
    fn test_blocked_interval_pushes_task() {
        let tasks = vec![task(1, 60, "High")];
        let blocked = vec![BlockedInterval::new(at(8, 0), at(8, 30))];
        let result = schedule(&tasks, date(), &prefs(), 0, &blocked);
        assert_eq!(result[0].start_time, at(8, 30));
        assert_eq!(result[0].end_time, at(9, 30));
    }

    #[test]
    fn test_blocked_interval_pushes_task_with_break() {
        let tasks = vec![task(1, 60, "High")];
        let blocked = vec![BlockedInterval::new(at(8, 0), at(8, 30))];
        let result = schedule(&tasks, date(), &prefs().with_break(15), 0, &blocked);
        assert_eq!(result[0].start_time, at(8, 45));
    }

    #[test]
    fn test_anchor_uses_earliest_existing_placement() {
        let tasks = vec![
            task(1, 30, "High").with_current_placement(at(11, 0)),
            task(2, 30, "Low").with_current_placement(at(10, 0)),
        ];
        assert_eq!(anchor_time(&tasks, date(), &prefs(), 0), at(10, 0));

        let result = schedule(&tasks, date(), &prefs(), 0, &[]);
        assert_eq!(result[0].task_id, 1);
        assert_eq!(result[0].start_time, at(10, 0));
        assert_eq!(result[1].start_time, at(10, 30));
    }

    #[test]
    fn test_anchor_clamped_to_start_hour() {
        let tasks = vec![task(1, 30, "High").with_current_placement(at(6, 30))];
        assert_eq!(anchor_time(&tasks, date(), &prefs(), 0), at(8, 0));
    }

    #[test]
    fn test_overflow_rolls_to_next_day() {
        let tasks = vec![task(1, 120, "High").with_current_placement(at(17, 30))];
        let result = schedule(&tasks, date(), &prefs(), 0, &[]);
        assert_eq!(result[0].start_time, Utc.with_ymd_and_hms(2025, 3, 11, 8, 0, 0).unwrap());
        assert_eq!(result[0].end_time, Utc.with_ymd_and_hms(2025, 3, 11, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_end_within_last_hour_is_allowed() {
        // Ends at 18:30; local end hour 18 does not exceed 18
        let tasks = vec![task(1, 60, "High").with_current_placement(at(17, 30))];
        let result = schedule(&tasks, date(), &prefs(), 0, &[]);
        assert_eq!(result[0].start_time, at(17, 30));
        assert_eq!(result[0].end_time, at(18, 30));
    }

    #[test]
    fn test_following_tasks_continue_after_rollover() {
        let tasks = vec![
            task(1, 120, "High").with_current_placement(at(17, 30)),
            task(2, 30, "Low"),
        ];
        let result = schedule(&tasks, date(), &prefs(), 0, &[]);
        let next_day = |h, m| Utc.with_ymd_and_hms(2025, 3, 11, h, m, 0).unwrap();
        assert_eq!(result[0].start_time, next_day(8, 0));
        assert_eq!(result[1].start_time, next_day(10, 0));
    }

    #[test]
    fn test_rollover_ignores_blocked_intervals_on_next_day() {
        let next_day = |h, m| Utc.with_ymd_and_hms(2025, 3, 11, h, m, 0).unwrap();
        let tasks = vec![task(1, 120, "High").with_current_placement(at(17, 30))];
        let blocked = vec![BlockedInterval::new(next_day(8, 0), next_day(9, 0))];
        let result = schedule(&tasks, date(), &prefs(), 0, &blocked);
        assert_eq!(result[0].start_time, next_day(8, 0));
    }

    #[test]
    fn test_task_longer_than_work_day_still_scheduled() {
        let tasks = vec![task(1, 12 * 60, "High"), task(2, 12 * 60, "Low")];
        let result = schedule(&tasks, date(), &prefs(), 0, &[]);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].start_time, Utc.with_ymd_and_hms(2025, 3, 11, 8, 0, 0).unwrap());
        assert_eq!(result[1].start_time, Utc.with_ymd_and_hms(2025, 3, 12, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_huge_duration_is_clamped_not_panicking() {
        let tasks = vec![task(1, 1_000_000_000_000, "High"), task(2, 30, "Low")];
        let result = schedule(&tasks, date(), &prefs(), 0, &[]);
        assert_eq!(result.len(), 2);
        assert_eq!(
            result[0].end_time - result[0].start_time,
            Duration::minutes(crate::domain::MAX_TASK_MINUTES)
        );
        assert!(result[1].start_time >= result[0].end_time);
    }

    #[test]
    fn test_exceeds_work_day_across_midnight() {
        let p = UserPreferences::default().with_hours(8, 23);
        let start = at(23, 30);
        assert!(exceeds_work_day(start, start + Duration::minutes(60), &p, 0));
        assert!(!exceeds_work_day(start, start + Duration::minutes(20), &p, 0));
    }

    #[test]
    fn test_schedule_request_wrapper_matches() {
        let request = ScheduleRequest::new(vec![task(1, 30, "Low"), task(2, 30, "High")], date())
            .with_blocked(vec![BlockedInterval::new(at(8, 10), at(8, 20))]);
        assert_eq!(
            schedule_request(&request, &prefs()),
            schedule(&request.tasks, date(), &prefs(), 0, &request.blocked_intervals)
        );
    }
}
