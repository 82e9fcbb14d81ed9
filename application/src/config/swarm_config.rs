//! Swarm configuration container.
//!
//! [`SwarmConfig`] groups the configuration slices the turn controller hands
//! to each stage. Use cases receive only the slices they need.

use super::{GenerationParams, OrchestrationParams, RetryPolicy};
use swarm_domain::{ModelConfig, PlanHeuristics, PolicyText};

#[derive(Debug, Clone, Default)]
pub struct SwarmConfig {
    pub models: ModelConfig,
    pub orchestration: OrchestrationParams,
    pub retry: RetryPolicy,
    pub generation: GenerationParams,
    pub policies: PolicyText,
    pub heuristics: PlanHeuristics,
}

impl SwarmConfig {
    pub fn new(models: ModelConfig) -> Self {
        Self {
            models,
            ..Self::default()
        }
    }

    pub fn with_orchestration(mut self, orchestration: OrchestrationParams) -> Self {
        self.orchestration = orchestration;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_generation(mut self, generation: GenerationParams) -> Self {
        self.generation = generation;
        self
    }

    pub fn with_policies(mut self, policies: PolicyText) -> Self {
        self.policies = policies;
        self
    }

    pub fn with_heuristics(mut self, heuristics: PlanHeuristics) -> Self {
        self.heuristics = heuristics;
        self
    }
}
