//! Role-based model configuration.
//!
//! Each stage of a turn can run on a different model: a strong model for
//! planning and synthesis, a cheap one for the per-document agents.

use crate::core::model::Model;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Creates and refines plans.
    pub planner: Model,
    /// Plan Review Board and Output Review Board.
    pub reviewer: Model,
    /// Per-document agent sessions.
    pub agent: Model,
    /// Final cited report.
    pub synthesizer: Model,
    /// Clarification gate.
    pub clarifier: Model,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            planner: Model::Gemini25Pro,
            reviewer: Model::Gemini25Flash,
            agent: Model::Gemini25Flash,
            synthesizer: Model::Gemini25Pro,
            clarifier: Model::Gemini25FlashLite,
        }
    }
}

impl ModelConfig {
    /// Run every role on the same model (`--model`).
    pub fn uniform(model: Model) -> Self {
        Self {
            planner: model.clone(),
            reviewer: model.clone(),
            agent: model.clone(),
            synthesizer: model.clone(),
            clarifier: model,
        }
    }

    pub fn with_planner(mut self, model: Model) -> Self {
        self.planner = model;
        self
    }

    pub fn with_reviewer(mut self, model: Model) -> Self {
        self.reviewer = model;
        self
    }

    pub fn with_agent(mut self, model: Model) -> Self {
        self.agent = model;
        self
    }

    pub fn with_synthesizer(mut self, model: Model) -> Self {
        self.synthesizer = model;
        self
    }

    pub fn with_clarifier(mut self, model: Model) -> Self {
        self.clarifier = model;
        self
    }
}
