//! LLM Gateway port
//!
//! Defines the interface for communicating with the generative model:
//! one-shot structured generation and long-lived conversational sessions.

use async_trait::async_trait;
use serde_json::Value;
use swarm_domain::Model;
use thiserror::Error;

/// Message fragments that mark a rate-limited or overloaded service.
const TRANSIENT_MARKERS: &[&str] = &[
    "429",
    "503",
    "rate limit",
    "resource_exhausted",
    "overloaded",
    "unavailable",
    "too many requests",
];

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

impl GatewayError {
    /// HTTP status, when the failure came from an HTTP response.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Rate-limit or overload failures that are worth retrying.
    ///
    /// A known HTTP status decides on its own; message markers only apply
    /// to failures without one.
    pub fn is_transient(&self) -> bool {
        if let Some(status) = self.status() {
            return matches!(status, 429 | 503);
        }
        let message = self.to_string().to_lowercase();
        TRANSIENT_MARKERS.iter().any(|marker| message.contains(marker))
    }
}

/// Prompt and optional response schema for a one-shot generation.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub system: Option<String>,
    pub prompt: String,
    /// When present the model must answer with JSON matching this schema.
    pub schema: Option<Value>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }
}

/// Sampling options; `None` leaves the provider default.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerationOptions {
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub thinking_budget: Option<u32>,
}

impl GenerationOptions {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    pub fn with_thinking_budget(mut self, budget: u32) -> Self {
        self.thinking_budget = Some(budget);
        self
    }
}

/// Gateway for LLM communication
///
/// This port defines how the application layer communicates with the model
/// provider. Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// One-shot generation returning the raw text of the response.
    async fn generate(
        &self,
        model: &Model,
        request: &GenerationRequest,
        options: &GenerationOptions,
    ) -> Result<String, GatewayError>;

    /// Create a conversational session seeded with a system prompt
    async fn create_session_with_system_prompt(
        &self,
        model: &Model,
        system_prompt: &str,
        options: &GenerationOptions,
    ) -> Result<Box<dyn LlmSession>, GatewayError>;
}

/// An active conversational session
///
/// The session owns its history; each `send` appends the exchange.
#[async_trait]
pub trait LlmSession: Send + Sync {
    /// Get the model used by this session
    fn model(&self) -> &Model;

    /// Send a message and get a response
    async fn send(&self, content: &str) -> Result<String, GatewayError>;
}
