//! Prompt composition for the assisted scheduler
//!
//! The user message is a handlebars template rendered against a context of
//! pre-formatted strings. Every time in it is local wall-clock time for the
//! request's offset.

use serde::Serialize;

use crate::assistant::render::PromptRenderer;
use crate::domain::{ScheduleRequest, UserPreferences};
use crate::error::Result;
use crate::scheduler::clock;

/// System message sent with every scheduling request
pub const SYSTEM_PROMPT: &str = "You are a precise daily planner. \
You place tasks into a single day and reply with JSON only.";

const DEFAULT_RULES: [&str; 4] = [
    "Schedule higher-priority tasks earlier in the day.",
    "Tasks must not overlap each other or any blocked interval.",
    "Keep every task inside the working hours.",
    "Leave the break duration between consecutive tasks.",
];

const RESPONSE_FORMAT: &str = "Respond with ONLY a JSON array in chronological order, one object per task, \
each object shaped as {\"taskId\": <id>, \"startHour\": <0-23>, \"startMinute\": <0-59>}. \
Include every task exactly once.";

const PROMPT_TEMPLATE: &str = r#"Plan the tasks below for {{target_date}}.
{{#if today}}
The target date is today. The current local time is {{today.now}}. Every task must start strictly after it, no earlier than {{today.earliest}}.
{{/if}}

Working hours: {{work_start}} to {{work_end}}.
Break between tasks: {{break_minutes}} minutes.
High-priority work is preferred in the {{time_preference}}.

{{#if blocked}}
Blocked intervals (do not schedule anything here):
{{#each blocked}}
- {{start}}-{{end}} {{label}}
{{/each}}
{{else}}
Blocked intervals: none.
{{/if}}
{{#if rules}}

User rules (these take priority over the default rules when they conflict):
{{#each rules}}
- {{this}}
{{/each}}
{{/if}}

Tasks:
{{#each tasks}}
- id {{id}}: "{{title}}", priority {{priority}}, {{duration}} minutes{{#if current}}, currently at {{current}}{{/if}}
{{/each}}

Default rules:
{{#each default_rules}}
- {{this}}
{{/each}}

{{response_format}}"#;

#[derive(Serialize)]
struct PromptContext<'a> {
    target_date: String,
    today: Option<TodayContext>,
    work_start: String,
    work_end: String,
    break_minutes: u32,
    time_preference: String,
    blocked: Vec<BlockedContext<'a>>,
    rules: &'a [String],
    tasks: Vec<TaskContext<'a>>,
    default_rules: &'static [&'static str],
    response_format: &'static str,
}

#[derive(Serialize)]
struct TodayContext {
    now: String,
    earliest: String,
}

#[derive(Serialize)]
struct BlockedContext<'a> {
    start: String,
    end: String,
    label: &'a str,
}

#[derive(Serialize)]
struct TaskContext<'a> {
    id: i64,
    title: &'a str,
    priority: &'static str,
    duration: i64,
    current: Option<String>,
}

/// Whether `request.target_date` is the caller's current local date.
pub fn is_today(request: &ScheduleRequest) -> bool {
    clock::is_local_date(request.now, request.target_date, request.timezone_offset_minutes)
}

fn context<'a>(request: &'a ScheduleRequest, prefs: &UserPreferences, rules: &'a [String]) -> PromptContext<'a> {
    let offset = request.timezone_offset_minutes;

    let today = is_today(request).then(|| TodayContext {
        now: clock::format_local(request.now, offset),
        earliest: clock::next_five_minute_boundary(request.now, offset)
            .format("%H:%M")
            .to_string(),
    });

    PromptContext {
        target_date: request.target_date.format("%A %Y-%m-%d").to_string(),
        today,
        work_start: format!("{:02}:00", prefs.preferred_start_hour),
        work_end: format!("{:02}:00", prefs.preferred_end_hour),
        break_minutes: prefs.break_duration,
        time_preference: prefs.high_priority_time_preference.to_string(),
        blocked: request
            .blocked_intervals
            .iter()
            .map(|b| BlockedContext {
                start: clock::format_local(b.start, offset),
                end: clock::format_local(b.end, offset),
                label: b.label(),
            })
            .collect(),
        rules,
        tasks: request
            .tasks
            .iter()
            .map(|t| TaskContext {
                id: t.id,
                title: &t.title,
                priority: t.importance.as_str(),
                duration: t.duration,
                current: t.current_start_time.map(|start| clock::format_local(start, offset)),
            })
            .collect(),
        default_rules: &DEFAULT_RULES,
        response_format: RESPONSE_FORMAT,
    }
}

/// Compose the user message for one scheduling request.
pub fn build_prompt(request: &ScheduleRequest, prefs: &UserPreferences, rules: &[String]) -> Result<String> {
    PromptRenderer::new().render_with(PROMPT_TEMPLATE, &context(request, prefs, rules))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BlockedInterval, TaskForScheduling};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn request() -> ScheduleRequest {
        ScheduleRequest::new(
            vec![
                TaskForScheduling::new(1, "Write report", 60, "High"),
                TaskForScheduling::new(2, "Email", 15, "bogus")
                    .with_current_placement(Utc.with_ymd_and_hms(2025, 3, 10, 15, 0, 0).unwrap()),
            ],
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
        )
        .with_now(Utc.with_ymd_and_hms(2025, 3, 9, 20, 0, 0).unwrap())
    }

    #[test]
    fn test_prompt_lists_tasks() {
        let prompt = build_prompt(&request(), &UserPreferences::default(), &[]).unwrap();
        assert!(prompt.contains("- id 1: \"Write report\", priority High, 60 minutes"));
        assert!(prompt.contains("- id 2: \"Email\", priority Medium, 15 minutes, currently at 15:00"));
        assert!(prompt.contains("Working hours: 09:00 to 18:00."));
        assert!(prompt.contains("Blocked intervals: none."));
        assert!(prompt.contains("\"taskId\""));
        assert!(!prompt.contains("User rules"));
    }

    #[test]
    fn test_prompt_not_today() {
        let prompt = build_prompt(&request(), &UserPreferences::default(), &[]).unwrap();
        assert!(!is_today(&request()));
        assert!(!prompt.contains("strictly after"));
    }

    #[test]
    fn test_prompt_today_rounds_to_next_boundary() {
        let req = request().with_now(Utc.with_ymd_and_hms(2025, 3, 10, 10, 7, 0).unwrap());
        assert!(is_today(&req));
        let prompt = build_prompt(&req, &UserPreferences::default(), &[]).unwrap();
        assert!(prompt.contains("current local time is 10:07"));
        assert!(prompt.contains("no earlier than 10:10"));
    }

    #[test]
    fn test_prompt_today_on_boundary_moves_forward() {
        let req = request().with_now(Utc.with_ymd_and_hms(2025, 3, 10, 10, 10, 0).unwrap());
        let prompt = build_prompt(&req, &UserPreferences::default(), &[]).unwrap();
        assert!(prompt.contains("no earlier than 10:15"));
    }

    #[test]
    fn test_prompt_uses_local_time_for_blocked() {
        let start = Utc.with_ymd_and_hms(2025, 3, 10, 14, 0, 0).unwrap();
        let req = request()
            .with_offset(300)
            .with_blocked(vec![BlockedInterval::new(start, start + chrono::Duration::minutes(30)).with_title("Standup")]);
        let prompt = build_prompt(&req, &UserPreferences::default(), &[]).unwrap();
        assert!(prompt.contains("- 09:00-09:30 Standup"));
    }

    #[test]
    fn test_prompt_flags_user_rules() {
        let rules = vec!["No calls before 10".to_string()];
        let prompt = build_prompt(&request(), &UserPreferences::default(), &rules).unwrap();
        assert!(prompt.contains("take priority over the default rules"));
        assert!(prompt.contains("- No calls before 10"));
    }

    #[test]
    fn test_prompt_keeps_titles_verbatim() {
        let req = ScheduleRequest::new(
            vec![TaskForScheduling::new(7, "R&D <draft> notes", 30, "Low")],
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
        );
        let prompt = build_prompt(&req, &UserPreferences::default(), &[]).unwrap();
        assert!(prompt.contains("- id 7: \"R&D <draft> notes\", priority Low, 30 minutes\n"));
        assert!(prompt.ends_with("Include every task exactly once."));
    }
}
