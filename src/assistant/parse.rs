//! Parsing of the assistant's reply
//!
//! The reply is untrusted text. Either it yields a complete, in-range list
//! of placements or it is rejected as a whole.

use serde::Deserialize;

use crate::error::{PlannerError, Result};

/// One placement as the assistant states it, in local wall-clock time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotSuggestion {
    pub task_id: i64,
    pub start_hour: u32,
    pub start_minute: u32,
}

/// The outermost `[`..`]` slice of `text`, if any.
pub fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}

/// Parse a reply into suggestions, rejecting anything malformed or out of range.
pub fn parse_suggestions(text: &str) -> Result<Vec<SlotSuggestion>> {
    let json = extract_json_array(text)
        .ok_or_else(|| PlannerError::ResponseParse("no JSON array in response".to_string()))?;

    let suggestions: Vec<SlotSuggestion> =
        serde_json::from_str(json).map_err(|e| PlannerError::ResponseParse(format!("invalid slot list: {}", e)))?;

    if let Some(bad) = suggestions.iter().find(|s| s.start_hour > 23 || s.start_minute > 59) {
        return Err(PlannerError::ResponseParse(format!(
            "task {} has out-of-range start {}:{}",
            bad.task_id, bad.start_hour, bad.start_minute
        )));
    }

    Ok(suggestions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_array() {
        let parsed = parse_suggestions(r#"[{"taskId": 3, "startHour": 8, "startMinute": 0}]"#).unwrap();
        assert_eq!(
            parsed,
            vec![SlotSuggestion {
                task_id: 3,
                start_hour: 8,
                start_minute: 0
            }]
        );
    }

    #[test]
    fn test_array_with_surrounding_text() {
        let text = "Here is your plan:\n```json\n[{\"taskId\": 1, \"startHour\": 9, \"startMinute\": 30},\n {\"taskId\": 2, \"startHour\": 10, \"startMinute\": 45}]\n```\nEnjoy!";
        let parsed = parse_suggestions(text).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].start_minute, 45);
    }

    #[test]
    fn test_empty_array_parses() {
        assert!(parse_suggestions("[]").unwrap().is_empty());
    }

    #[test]
    fn test_no_array() {
        assert!(matches!(parse_suggestions("I cannot help"), Err(PlannerError::ResponseParse(_))));
        assert!(extract_json_array("] backwards [").is_none());
    }

    #[test]
    fn test_malformed_json() {
        let result = parse_suggestions(r#"[{"taskId": "one", "startHour": 9}]"#);
        assert!(matches!(result, Err(PlannerError::ResponseParse(_))));
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(parse_suggestions(r#"[{"taskId": 1, "startHour": 24, "startMinute": 0}]"#).is_err());
        assert!(parse_suggestions(r#"[{"taskId": 1, "startHour": 9, "startMinute": 60}]"#).is_err());
        assert!(parse_suggestions(r#"[{"taskId": 1, "startHour": -1, "startMinute": 0}]"#).is_err());
    }
}
