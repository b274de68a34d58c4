//! File-backed persistence for preferences and feedback history.
//!
//! Both live under one data directory:
//! - `preferences.json`: the current `UserPreferences`
//! - `feedback.jsonl`: append-only `FeedbackEntry` log

mod feedback_log;
mod preferences;

pub use feedback_log::FeedbackLog;
pub use preferences::PreferenceStore;
