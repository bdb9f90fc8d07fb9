//! Prompt templates for reply generation.
//!
//! The answer template can be customized by placing `answer.toml` in the custom
//! prompts directory.

use crate::config::Settings;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("valid regex"));

/// Collection of all prompt templates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Prompts {
    pub answer: AnswerPrompts,
}

/// Template combining system prompt, retrieved context and the user's question.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerPrompts {
    pub template: String,
    /// Substituted for `{{context}}` when retrieval found nothing.
    pub empty_context: String,
}

impl Default for AnswerPrompts {
    fn default() -> Self {
        Self {
            template: r#"{{system_prompt}}

RELEVANT CONTEXT FROM DOCUMENTS:
{{context}}

USER QUESTION:
{{question}}

REPLY:
"#
            .to_string(),
            empty_context: "No relevant context found.".to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts, applying overrides from an optional custom directory.
    pub fn load(custom_dir: Option<&str>) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(dir) = custom_dir {
            let answer_path = Settings::expand_path(dir).join("answer.toml");
            if answer_path.exists() {
                let content = std::fs::read_to_string(&answer_path)?;
                prompts.answer = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// Placeholders are resolved in a single pass over the template, so substituted
    /// values are never expanded again. Unknown placeholders are left as written.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        PLACEHOLDER_REGEX
            .replace_all(template, |caps: &Captures| match vars.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Render the full answer prompt.
    pub fn render_answer(&self, system_prompt: &str, context: &str, question: &str) -> String {
        let context = if context.trim().is_empty() {
            self.answer.empty_context.as_str()
        } else {
            context
        };

        let mut vars = HashMap::new();
        vars.insert("system_prompt".to_string(), system_prompt.to_string());
        vars.insert("context".to_string(), context.to_string());
        vars.insert("question".to_string(), question.to_string());
        Self::render(&self.answer.template, &vars)
    }
}
