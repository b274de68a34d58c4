//! Blocked-interval conflict resolution.
//!
//! A proposed `[start, start + duration)` is checked against the blocked
//! intervals in start order. On the first overlap the proposal moves to the
//! end of that interval plus the break, and the check starts over. The number
//! of moves is capped at `blocked.len() + EXTRA_ITERATIONS`; past the cap the
//! last proposal is kept as-is.

use chrono::{DateTime, Duration, Utc};

use crate::domain::{BlockedInterval, saturating_add};

/// Moves allowed beyond one per blocked interval.
pub const EXTRA_ITERATIONS: usize = 5;

/// A candidate placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Proposal {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Proposal {
    pub fn new(start: DateTime<Utc>, duration: Duration) -> Self {
        Self {
            start,
            end: saturating_add(start, duration),
        }
    }

    fn shifted_to(&self, start: DateTime<Utc>) -> Self {
        Self {
            start,
            end: saturating_add(start, self.end - self.start),
        }
    }
}

/// Outcome of resolving one proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub proposal: Proposal,
    /// How many times the proposal was pushed past a blocked interval.
    pub moves: usize,
    /// True when the iteration cap stopped resolution with a conflict left.
    pub capped: bool,
}

/// Routes proposals around a fixed set of blocked intervals.
#[derive(Debug, Clone)]
pub struct ConflictResolver<'a> {
    blocked: Vec<&'a BlockedInterval>,
    break_duration: Duration,
}

impl<'a> ConflictResolver<'a> {
    pub fn new(blocked: &'a [BlockedInterval], break_minutes: u32) -> Self {
        let mut sorted: Vec<&BlockedInterval> = blocked.iter().collect();
        sorted.sort_by_key(|b| b.start);
        Self {
            blocked: sorted,
            break_duration: Duration::minutes(i64::from(break_minutes)),
        }
    }

    pub fn max_moves(&self) -> usize {
        self.blocked.len() + EXTRA_ITERATIONS
    }

    /// First blocked interval (by start) that overlaps `proposal`.
    pub fn first_conflict(&self, proposal: &Proposal) -> Option<&'a BlockedInterval> {
        self.blocked
            .iter()
            .copied()
            .find(|b| b.overlaps(proposal.start, proposal.end))
    }

    /// Advance `start` past every overlapping blocked interval.
    pub fn resolve(&self, start: DateTime<Utc>, duration: Duration) -> Resolution {
        let mut proposal = Proposal::new(start, duration);
        let mut moves = 0;

        while let Some(blocked) = self.first_conflict(&proposal) {
            // Unreachable for well-formed intervals: a move lands at or after
            // the interval's end, so each interval moves a proposal at most once.
            if moves >= self.max_moves() {
                log::warn!(
                    "Conflict resolution capped after {} moves; keeping {} despite overlap with '{}'",
                    moves,
                    proposal.start,
                    blocked.label()
                );
                return Resolution {
                    proposal,
                    moves,
                    capped: true,
                };
            }

            let next_start = saturating_add(blocked.end, self.break_duration);
            log::debug!(
                "Proposal at {} overlaps '{}' ({} - {}), moving to {}",
                proposal.start,
                blocked.label(),
                blocked.start,
                blocked.end,
                next_start
            );
            proposal = proposal.shifted_to(next_start);
            moves += 1;
        }

        Resolution {
            proposal,
            moves,
            capped: false,
        }
    }
}
