//! LLM-assisted scheduling
//!
//! The assistant is asked for a full day plan; its reply is parsed as
//! untrusted text and validated against the input tasks. Anything short of
//! a complete, well-formed plan is discarded in favour of the deterministic
//! scheduler, so callers always get a total schedule.

mod parse;
mod prompt;
mod render;
mod rules;
mod scheduler;

pub use parse::{SlotSuggestion, extract_json_array, parse_suggestions};
pub use prompt::{SYSTEM_PROMPT, build_prompt, is_today};
pub use render::PromptRenderer;
pub use rules::{DEFAULT_MAX_RULES, DEFAULT_MIN_RULE_LEN, extract_user_rules, normalize_rule};
pub use scheduler::{AssistantSettings, AssistedPlan, AssistedScheduler, PlanSource, to_schedule};
