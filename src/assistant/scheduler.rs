//! Assisted scheduler: asks the LLM for a plan, falls back to the
//! deterministic placement on any failure.

use std::sync::Arc;

use crate::assistant::parse::{SlotSuggestion, parse_suggestions};
use crate::assistant::prompt::{SYSTEM_PROMPT, build_prompt};
use crate::assistant::rules::{DEFAULT_MAX_RULES, DEFAULT_MIN_RULE_LEN, extract_user_rules};
use crate::domain::{FeedbackEntry, ScheduleRequest, ScheduledTask, UserPreferences};
use crate::error::{PlannerError, Result};
use crate::llm::{CompletionRequest, LlmClient, StopReason};
use crate::scheduler::{clock, schedule_request, validate_schedule};

/// Knobs for the assisted path
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantSettings {
    pub temperature: f32,
    pub max_tokens: u32,
    pub max_rules: usize,
    pub min_rule_len: usize,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: 1000,
            max_rules: DEFAULT_MAX_RULES,
            min_rule_len: DEFAULT_MIN_RULE_LEN,
        }
    }
}

/// Which path produced a schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanSource {
    Assistant,
    Fallback(String),
    /// Nothing to place; neither path ran.
    Empty,
}

impl PlanSource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, PlanSource::Fallback(_))
    }
}

/// A schedule together with how it was produced
#[derive(Debug, Clone, PartialEq)]
pub struct AssistedPlan {
    pub schedule: Vec<ScheduledTask>,
    pub source: PlanSource,
}

/// Scheduler that consults an optional LLM client
pub struct AssistedScheduler {
    client: Option<Arc<dyn LlmClient>>,
    settings: AssistantSettings,
}

impl AssistedScheduler {
    pub fn new(client: Option<Arc<dyn LlmClient>>) -> Self {
        Self {
            client,
            settings: AssistantSettings::default(),
        }
    }

    /// A scheduler that always takes the deterministic path
    pub fn offline() -> Self {
        Self::new(None)
    }

    pub fn with_settings(mut self, settings: AssistantSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &AssistantSettings {
        &self.settings
    }

    /// Rules that would be sent with the next request for `history`.
    pub fn user_rules(&self, history: &[FeedbackEntry]) -> Vec<String> {
        extract_user_rules(history, self.settings.max_rules, self.settings.min_rule_len)
    }

    /// Produce a schedule. Never fails; see `plan` for the provenance.
    pub async fn schedule(
        &self,
        request: &ScheduleRequest,
        prefs: &UserPreferences,
        history: &[FeedbackEntry],
    ) -> Vec<ScheduledTask> {
        self.plan(request, prefs, history).await.schedule
    }

    /// Produce a schedule and report which path made it.
    pub async fn plan(
        &self,
        request: &ScheduleRequest,
        prefs: &UserPreferences,
        history: &[FeedbackEntry],
    ) -> AssistedPlan {
        if request.tasks.is_empty() {
            return AssistedPlan {
                schedule: Vec::new(),
                source: PlanSource::Empty,
            };
        }

        let client = match &self.client {
            Some(client) if client.is_ready() => client,
            _ => {
                log::info!("No LLM client available, using deterministic scheduler");
                return fallback(request, prefs, "no LLM client configured".to_string());
            }
        };

        let rules = self.user_rules(history);
        match self.ask(&**client, request, prefs, &rules).await {
            Ok(schedule) => {
                log::info!("Assistant placed {} tasks using {}", schedule.len(), client.model());
                AssistedPlan {
                    schedule,
                    source: PlanSource::Assistant,
                }
            }
            Err(e) => {
                log::warn!("Assisted scheduling failed, falling back: {}", e);
                fallback(request, prefs, e.to_string())
            }
        }
    }

    async fn ask(
        &self,
        client: &dyn LlmClient,
        request: &ScheduleRequest,
        prefs: &UserPreferences,
        rules: &[String],
    ) -> Result<Vec<ScheduledTask>> {
        let completion = CompletionRequest::new(SYSTEM_PROMPT, build_prompt(request, prefs, rules)?)
            .with_temperature(self.settings.temperature)
            .with_max_tokens(self.settings.max_tokens);

        log::debug!("Requesting plan for {} tasks ({} user rules)", request.tasks.len(), rules.len());
        let response = client.complete(completion).await?;
        log::debug!("Assistant used {} tokens", response.usage.total());
        if response.stop_reason == StopReason::ContentFilter {
            return Err(PlannerError::Llm("response blocked by content filter".to_string()));
        }
        if response.stop_reason.is_truncated() {
            log::debug!("Assistant response hit the token limit");
        }

        let suggestions = parse_suggestions(&response.content)?;
        to_schedule(request, &suggestions)
    }
}

/// Turn local-time suggestions into absolute placements.
///
/// Rejects unknown ids and any list that does not cover every task exactly
/// once. The result is sorted by start time.
pub fn to_schedule(request: &ScheduleRequest, suggestions: &[SlotSuggestion]) -> Result<Vec<ScheduledTask>> {
    let mut schedule = suggestions
        .iter()
        .map(|s| {
            let task = request
                .task(s.task_id)
                .ok_or_else(|| PlannerError::InvalidInput(format!("unknown task id {}", s.task_id)))?;
            let start = clock::local_at(
                request.target_date,
                s.start_hour,
                s.start_minute,
                request.timezone_offset_minutes,
            );
            Ok(ScheduledTask::new(task.id, start, task.duration()))
        })
        .collect::<Result<Vec<_>>>()?;

    validate_schedule(&request.tasks, &schedule)?;
    schedule.sort_by_key(|s| s.start_time);
    Ok(schedule)
}

fn fallback(request: &ScheduleRequest, prefs: &UserPreferences, reason: String) -> AssistedPlan {
    AssistedPlan {
        schedule: schedule_request(request, prefs),
        source: PlanSource::Fallback(reason),
    }
}
