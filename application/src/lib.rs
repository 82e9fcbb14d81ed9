//! Application layer for doc-swarm
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{GenerationParams, OrchestrationParams, RetryPolicy, SwarmConfig};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    document_source::{DocumentSource, DocumentSourceError},
    llm_gateway::{GatewayError, GenerationOptions, GenerationRequest, LlmGateway, LlmSession},
    progress::{NoTurnProgress, TurnProgressNotifier},
};
pub use use_cases::agent_swarm::{AgentSwarm, DocumentAgent};
pub use use_cases::retry::call_with_retry;
pub use use_cases::run_control::CancellableRun;
pub use use_cases::run_turn::{RunTurnUseCase, SwarmError, TaskOutcome, TurnOutcome, TurnReport};
pub use use_cases::turn_controller::TurnController;
