//! Priority scoring for task placement.
//!
//! Tasks are ordered by:
//! - Importance weight, taken from the user's `PriorityWeights` (higher first)
//! - Duration as a tie-breaker (shorter first)
//!
//! Scoring is total: unknown labels resolve to the Medium weight.

use std::cmp::Ordering;

use crate::domain::{Importance, PriorityWeights, TaskForScheduling};

/// Weight for a raw importance label.
pub fn weight(importance: &str, weights: &PriorityWeights) -> f64 {
    weights.weight(Importance::parse(importance))
}

/// Weight for a task's (already normalized) importance.
pub fn task_weight(task: &TaskForScheduling, weights: &PriorityWeights) -> f64 {
    weights.weight(task.importance)
}

/// Ordering used for placement: score descending, then duration ascending.
pub fn compare(a: &TaskForScheduling, b: &TaskForScheduling, weights: &PriorityWeights) -> Ordering {
    task_weight(b, weights)
        .total_cmp(&task_weight(a, weights))
        .then_with(|| a.duration.cmp(&b.duration))
}

/// Stable sort of `tasks` into placement order.
pub fn sort_by_priority<'a>(tasks: &'a [TaskForScheduling], weights: &PriorityWeights) -> Vec<&'a TaskForScheduling> {
    let mut ordered: Vec<&TaskForScheduling> = tasks.iter().collect();
    ordered.sort_by(|a, b| compare(a, b, weights));
    ordered
}
