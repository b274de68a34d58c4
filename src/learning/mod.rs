//! Feedback learning
//!
//! Turns a user's reaction to a schedule into a `PreferencesDelta`. The
//! caller applies and persists the delta; nothing here holds state.

mod keywords;
mod learner;

pub use keywords::{BREAK_STEP, BreakChange, MAX_BREAK, ReasonAdjustment, apply_reason, scan_reason};
pub use learner::{BLEND_FACTOR, FeedbackEvent, MAX_BREAK_GAP_MINUTES, average_gap, average_rank, blend, learn};
