//! Gemini conversational session
//!
//! The REST API is stateless, so the session keeps the conversation locally
//! and resends it on every call.

use super::client::GeminiClient;
use super::types::{Content, GenerateContentRequest, GenerationConfig};
use async_trait::async_trait;
use std::sync::Arc;
use swarm_application::{GatewayError, LlmSession};
use swarm_domain::Model;
use tokio::sync::Mutex;

pub struct GeminiSession {
    client: Arc<GeminiClient>,
    model: Model,
    system_prompt: String,
    config: GenerationConfig,
    /// Alternating user/model turns
    history: Mutex<Vec<Content>>,
}

impl GeminiSession {
    pub fn new(
        client: Arc<GeminiClient>,
        model: Model,
        system_prompt: impl Into<String>,
        config: GenerationConfig,
    ) -> Self {
        Self {
            client,
            model,
            system_prompt: system_prompt.into(),
            config,
            history: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl LlmSession for GeminiSession {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn send(&self, content: &str) -> Result<String, GatewayError> {
        let mut history = self.history.lock().await;

        let mut contents = history.clone();
        contents.push(Content::user(content));
        let request = GenerateContentRequest {
            contents,
            system_instruction: Some(Content::system(&self.system_prompt)),
            generation_config: self.config.clone(),
        };

        // History only grows on success, so a retried send is not duplicated
        let answer = self.client.generate_content(&self.model, &request).await?;
        history.push(Content::user(content));
        history.push(Content::model(&answer));
        Ok(answer)
    }
}
