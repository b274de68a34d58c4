//! Per-user scheduling preferences and learned adjustments to them

use std::fmt;

use serde::{Deserialize, Serialize};

use super::task::Importance;

pub const DEFAULT_START_HOUR: u32 = 9;
pub const DEFAULT_END_HOUR: u32 = 18;

/// Numeric weight for each importance label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityWeights {
    pub pareto: f64,
    pub high: f64,
    #[serde(rename = "med-high")]
    pub med_high: f64,
    pub medium: f64,
    #[serde(rename = "med-low")]
    pub med_low: f64,
    pub low: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            pareto: 10.0,
            high: 8.0,
            med_high: 6.0,
            medium: 4.0,
            med_low: 2.0,
            low: 1.0,
        }
    }
}

impl PriorityWeights {
    pub fn weight(&self, importance: Importance) -> f64 {
        match importance {
            Importance::Pareto => self.pareto,
            Importance::High => self.high,
            Importance::MedHigh => self.med_high,
            Importance::Medium => self.medium,
            Importance::MedLow => self.med_low,
            Importance::Low => self.low,
        }
    }
}

/// When the user prefers to do high-priority work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePreference {
    #[default]
    Morning,
    Afternoon,
    Evening,
}

impl TimePreference {
    /// Next step along morning -> afternoon -> evening. Evening stays put.
    pub fn later(self) -> Self {
        match self {
            TimePreference::Morning => TimePreference::Afternoon,
            TimePreference::Afternoon | TimePreference::Evening => TimePreference::Evening,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimePreference::Morning => "morning",
            TimePreference::Afternoon => "afternoon",
            TimePreference::Evening => "evening",
        }
    }
}

impl fmt::Display for TimePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Scheduling preferences, mutated only through `PreferencesDelta`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    /// Local hour, 0-23
    pub preferred_start_hour: u32,
    /// Local hour, 0-23, greater than the start hour
    pub preferred_end_hour: u32,
    /// Minutes
    pub break_duration: u32,
    pub priority_weights: PriorityWeights,
    pub high_priority_time_preference: TimePreference,
    pub total_approved: u32,
    pub total_corrected: u32,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            preferred_start_hour: DEFAULT_START_HOUR,
            preferred_end_hour: DEFAULT_END_HOUR,
            break_duration: 0,
            priority_weights: PriorityWeights::default(),
            high_priority_time_preference: TimePreference::default(),
            total_approved: 0,
            total_corrected: 0,
        }
    }
}

impl UserPreferences {
    pub fn with_hours(mut self, start: u32, end: u32) -> Self {
        self.preferred_start_hour = start;
        self.preferred_end_hour = end;
        self
    }

    pub fn with_break(mut self, minutes: u32) -> Self {
        self.break_duration = minutes;
        self
    }

    /// Whether `preferred_start_hour < preferred_end_hour <= 23` holds.
    pub fn hours_are_valid(&self) -> bool {
        self.preferred_start_hour < self.preferred_end_hour && self.preferred_end_hour <= 23
    }
}

/// Partial update produced by feedback learning
///
/// Only the fields that learning touched are `Some`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_start_hour: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub break_duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_priority_time_preference: Option<TimePreference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_approved: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_corrected: Option<u32>,
}

impl PreferencesDelta {
    pub fn is_empty(&self) -> bool {
        *self == PreferencesDelta::default()
    }

    /// Fold this delta into `prefs`, returning the updated copy.
    pub fn apply(&self, prefs: &UserPreferences) -> UserPreferences {
        let mut updated = prefs.clone();

        if let Some(hour) = self.preferred_start_hour {
            updated.preferred_start_hour = hour.min(23);
        }
        if let Some(minutes) = self.break_duration {
            updated.break_duration = minutes;
        }
        if let Some(pref) = self.high_priority_time_preference {
            updated.high_priority_time_preference = pref;
        }
        if let Some(count) = self.total_approved {
            updated.total_approved = count;
        }
        if let Some(count) = self.total_corrected {
            updated.total_corrected = count;
        }

        // start < end must survive learning
        if updated.preferred_start_hour >= updated.preferred_end_hour {
            updated.preferred_start_hour = updated.preferred_end_hour.saturating_sub(1);
        }

        updated
    }
}
