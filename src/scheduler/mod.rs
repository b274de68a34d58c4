//! Deterministic scheduler for placing tasks into a day.
//!
//! This module provides:
//! - **Priority scoring**: maps importance labels to the user's weights and
//!   orders tasks by score, then duration.
//! - **Conflict resolution**: pushes a proposed slot past overlapping blocked
//!   intervals, with a bounded number of moves.
//! - **Placement**: the greedy fold that turns an ordered task list into a
//!   conflict-free, time-ordered schedule.
//! - **Clock helpers**: conversions between UTC and the user's wall clock.
//!
//! # Example
//!
//! ```ignore
//! use questplan::scheduler::schedule;
//!
//! let placed = schedule(&tasks, target_date, &prefs, offset_minutes, &blocked);
//! ```

pub mod clock;
mod conflict;
mod placement;
mod priority;
mod validate;

pub use conflict::{ConflictResolver, EXTRA_ITERATIONS, Proposal, Resolution};
pub use placement::{anchor_time, exceeds_work_day, schedule, schedule_request};
pub use priority::{compare, sort_by_priority, task_weight, weight};
pub use validate::{blocked_collisions, overlapping_pairs, validate_schedule};
