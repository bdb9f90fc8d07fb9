//! Natural-language reply generation from retrieved context.

use crate::config::{LlmSettings, Prompts};
use crate::error::{Result, VoxragError};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

/// Turns a system prompt, retrieved context and a user query into reply text.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Generate a reply. Failures are rendered into the reply text instead of being
    /// returned, so a query always produces something to say back.
    async fn generate_reply(&self, system_prompt: &str, context: &str, query: &str) -> String;
}

/// Chat-completion backed responder.
pub struct OpenAIResponder {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
    prompts: Prompts,
}

impl OpenAIResponder {
    /// Create a responder for the given model.
    pub fn new(model: &str) -> Self {
        Self {
            client: create_client(),
            model: model.to_string(),
            temperature: 0.7,
            prompts: Prompts::default(),
        }
    }

    /// Create a responder from settings.
    pub fn from_settings(settings: &LlmSettings) -> Self {
        Self::new(&settings.model).with_temperature(settings.temperature)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set custom prompts.
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    async fn complete(&self, prompt: String) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> =
            vec![ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| VoxragError::Llm(e.to_string()))?
                .into()];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| VoxragError::Llm(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| VoxragError::Llm(e.to_string()))?;

        response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| VoxragError::Llm("Empty response from LLM".to_string()))
    }
}

#[async_trait]
impl Responder for OpenAIResponder {
    #[instrument(skip(self, system_prompt, context))]
    async fn generate_reply(&self, system_prompt: &str, context: &str, query: &str) -> String {
        let prompt = self.prompts.render_answer(system_prompt, context, query);
        debug!("Prompt is {} chars", prompt.len());

        match self.complete(prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Reply generation failed: {}", e);
                format!("Error generating response: {}", e)
            }
        }
    }
}

/// Join retrieved chunk texts into the context block handed to the responder.
pub fn join_context<'a>(texts: impl IntoIterator<Item = &'a str>) -> String {
    texts.into_iter().collect::<Vec<_>>().join("\n")
}
