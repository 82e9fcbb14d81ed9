//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`OrchestrationParams`]: loop bounds of a turn (review rounds, audit retries, history)
//! - [`RetryPolicy`]: backoff for remote calls
//! - [`GenerationParams`]: temperatures, token limits, thinking budgets
//! - [`SwarmConfig`]: container handed to the turn controller

pub mod generation_params;
pub mod orchestration_params;
pub mod retry_policy;
pub mod swarm_config;

pub use generation_params::GenerationParams;
pub use orchestration_params::OrchestrationParams;
pub use retry_policy::RetryPolicy;
pub use swarm_config::SwarmConfig;
