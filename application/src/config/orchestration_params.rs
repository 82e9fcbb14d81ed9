//! Orchestration parameters: turn loop control.
//!
//! These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};

/// Loop bounds and switches for one user turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestrationParams {
    /// Maximum Plan Review Board rounds. Zero disables plan review.
    pub max_review_rounds: usize,
    /// Extra re-plan/re-execute cycles allowed after a rejected audit.
    pub audit_retry_budget: usize,
    /// Number of history entries embedded in prompts.
    pub history_window: usize,
    /// Ask the clarification gate before planning.
    pub enable_clarification: bool,
}

impl Default for OrchestrationParams {
    fn default() -> Self {
        Self {
            max_review_rounds: 5,
            audit_retry_budget: 1,
            history_window: 6,
            enable_clarification: true,
        }
    }
}

impl OrchestrationParams {
    // ==================== Builder Methods ====================

    pub fn with_max_review_rounds(mut self, rounds: usize) -> Self {
        self.max_review_rounds = rounds;
        self
    }

    pub fn with_audit_retry_budget(mut self, budget: usize) -> Self {
        self.audit_retry_budget = budget;
        self
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    pub fn with_clarification(mut self, enabled: bool) -> Self {
        self.enable_clarification = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = OrchestrationParams::default();
        assert_eq!(params.max_review_rounds, 5);
        assert_eq!(params.audit_retry_budget, 1);
        assert_eq!(params.history_window, 6);
        assert!(params.enable_clarification);
    }

    #[test]
    fn test_builder() {
        let params = OrchestrationParams::default()
            .with_max_review_rounds(0)
            .with_clarification(false);
        assert_eq!(params.max_review_rounds, 0);
        assert!(!params.enable_clarification);
    }
}
