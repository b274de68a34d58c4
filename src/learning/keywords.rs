//! Keyword rules over free-text feedback reasons.
//!
//! Matching is case-insensitive substring search.

use crate::domain::{PreferencesDelta, TimePreference, UserPreferences};

pub const BREAK_STEP: u32 = 5;
pub const MAX_BREAK: u32 = 30;

/// Adjustments a reason asks for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReasonAdjustment {
    pub time_preference: Option<TimePreference>,
    pub break_change: Option<BreakChange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakChange {
    Longer,
    Shorter,
}

impl ReasonAdjustment {
    pub fn is_empty(&self) -> bool {
        self.time_preference.is_none() && self.break_change.is_none()
    }
}

/// Scan `reason` for the phrases learning reacts to.
pub fn scan_reason(reason: &str) -> ReasonAdjustment {
    let text = reason.to_lowercase();
    let has = |phrase: &str| text.contains(phrase);

    let mut time_preference = None;
    if has("morning") && has("important") {
        time_preference = Some(TimePreference::Morning);
    }
    if has("afternoon") || has("after lunch") {
        time_preference = Some(TimePreference::Afternoon);
    }
    if has("evening") || has("later") {
        time_preference = Some(TimePreference::Evening);
    }

    // "no break" contains "break", so check it first
    let break_change = if has("no break") || has("back to back") {
        Some(BreakChange::Shorter)
    } else if has("break") || has("rest") {
        Some(BreakChange::Longer)
    } else {
        None
    };

    ReasonAdjustment {
        time_preference,
        break_change,
    }
}

/// Layer the reason's keyword rules on top of `delta`.
pub fn apply_reason(reason: &str, current: &UserPreferences, delta: &mut PreferencesDelta) {
    let adjustment = scan_reason(reason);
    if adjustment.is_empty() {
        return;
    }
    log::debug!("Reason keywords: {:?}", adjustment);

    if let Some(pref) = adjustment.time_preference {
        delta.high_priority_time_preference = Some(pref);
    }

    if let Some(change) = adjustment.break_change {
        let base = delta.break_duration.unwrap_or(current.break_duration);
        delta.break_duration = Some(match change {
            BreakChange::Longer => (base + BREAK_STEP).min(MAX_BREAK),
            BreakChange::Shorter => base.saturating_sub(BREAK_STEP),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_morning_needs_important() {
        assert_eq!(scan_reason("I like mornings").time_preference, None);
        assert_eq!(
            scan_reason("Important work in the MORNING please").time_preference,
            Some(TimePreference::Morning)
        );
    }

    #[test]
    fn test_afternoon_phrases() {
        assert_eq!(scan_reason("afternoon is better").time_preference, Some(TimePreference::Afternoon));
        assert_eq!(scan_reason("Do it after lunch").time_preference, Some(TimePreference::Afternoon));
    }

    #[test]
    fn test_evening_overrides_earlier_rules() {
        let adj = scan_reason("Important stuff in the morning, the rest later");
        assert_eq!(adj.time_preference, Some(TimePreference::Evening));
    }

    #[test]
    fn test_no_break_beats_break() {
        assert_eq!(scan_reason("No break needed").break_change, Some(BreakChange::Shorter));
        assert_eq!(scan_reason("back to back is fine").break_change, Some(BreakChange::Shorter));
        assert_eq!(scan_reason("I need a break").break_change, Some(BreakChange::Longer));
        assert_eq!(scan_reason("let me rest").break_change, Some(BreakChange::Longer));
        assert!(scan_reason("looks good").is_empty());
    }

    #[test]
    fn test_apply_break_capped_and_floored() {
        let current = UserPreferences::default().with_break(28);
        let mut delta = PreferencesDelta::default();
        apply_reason("more break time", &current, &mut delta);
        assert_eq!(delta.break_duration, Some(MAX_BREAK));

        let current = UserPreferences::default().with_break(3);
        let mut delta = PreferencesDelta::default();
        apply_reason("no break", &current, &mut delta);
        assert_eq!(delta.break_duration, Some(0));
    }

    #[test]
    fn test_apply_builds_on_existing_delta() {
        let current = UserPreferences::default().with_break(0);
        let mut delta = PreferencesDelta {
            break_duration: Some(10),
            high_priority_time_preference: Some(TimePreference::Afternoon),
            ..Default::default()
        };
        apply_reason("important meetings in the morning, then a break", &current, &mut delta);
        assert_eq!(delta.break_duration, Some(15));
        assert_eq!(delta.high_priority_time_preference, Some(TimePreference::Morning));
    }

    #[test]
    fn test_apply_without_keywords_leaves_delta() {
        let mut delta = PreferencesDelta::default();
        apply_reason("fine", &UserPreferences::default(), &mut delta);
        assert!(delta.is_empty());
    }
}
