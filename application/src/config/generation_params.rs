//! Generation parameters for each stage of a turn.

use serde::{Deserialize, Serialize};
use swarm_domain::PlanType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    pub planner_temperature: f32,
    pub reviewer_temperature: f32,
    pub agent_temperature: f32,
    pub synthesizer_temperature: f32,
    pub max_output_tokens: u32,
    /// Synthesizer thinking budget for SIMPLE_FACT plans.
    pub simple_thinking_budget: u32,
    /// Synthesizer thinking budget for DEEP_ANALYSIS plans.
    pub deep_thinking_budget: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            planner_temperature: 0.2,
            reviewer_temperature: 0.0,
            agent_temperature: 0.1,
            synthesizer_temperature: 0.3,
            max_output_tokens: 8192,
            simple_thinking_budget: 1024,
            deep_thinking_budget: 16384,
        }
    }
}

impl GenerationParams {
    /// Synthesis depth scales with the plan type.
    pub fn thinking_budget(&self, plan_type: PlanType) -> u32 {
        match plan_type {
            PlanType::SimpleFact => self.simple_thinking_budget,
            PlanType::DeepAnalysis => self.deep_thinking_budget,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thinking_budget_by_plan_type() {
        let params = GenerationParams::default();
        assert_eq!(params.thinking_budget(PlanType::SimpleFact), 1024);
        assert_eq!(params.thinking_budget(PlanType::DeepAnalysis), 16384);
    }
}
