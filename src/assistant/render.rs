//! Handlebars rendering for assistant prompts

use handlebars::Handlebars;
use serde::Serialize;

use crate::error::{PlannerError, Result};

/// Renders prompt templates against a serializable context
pub struct PromptRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for PromptRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptRenderer {
    /// Missing fields render empty and output is never HTML-escaped.
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.register_escape_fn(handlebars::no_escape);
        Self { handlebars }
    }

    pub fn render_with<T: Serialize>(&self, template: &str, context: &T) -> Result<String> {
        self.handlebars
            .render_template(template, context)
            .map_err(|e| PlannerError::Prompt(format!("Failed to render template: {}", e)))
    }
}
