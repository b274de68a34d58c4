//! Domain types for questplan
//!
//! This module contains the values that cross the scheduling boundary:
//! - TaskForScheduling / ScheduledTask: scheduler input and output
//! - BlockedInterval: busy time owned by someone else (calendar events)
//! - UserPreferences / PreferencesDelta: configuration and learned updates
//! - FeedbackEntry: append-only history of user reactions to schedules
//! - ScheduleRequest: the per-run input snapshot
//!
//! All of them are constructed by the caller for each invocation; the
//! scheduling core never mutates them.

pub mod feedback;
pub mod interval;
pub mod preferences;
pub mod request;
pub mod task;

pub use feedback::{FeedbackEntry, FeedbackType, TaskSnapshot};
pub use interval::BlockedInterval;
pub use preferences::{PreferencesDelta, PriorityWeights, TimePreference, UserPreferences};
pub use request::ScheduleRequest;
pub use task::{Importance, MAX_TASK_MINUTES, ScheduledTask, TaskForScheduling, saturating_add};
