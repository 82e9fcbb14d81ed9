//! Synthesis for the RunTurn use case.

use super::RunTurnUseCase;
use super::types::{SwarmError, TaskOutcome};
use crate::ports::llm_gateway::{GenerationOptions, GenerationRequest};
use crate::use_cases::retry::call_with_retry;
use crate::use_cases::shared::check_cancelled;
use swarm_domain::{ConversationTurn, Plan, SwarmPromptTemplate, TurnResult, render_history};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

impl RunTurnUseCase {
    /// Merge the task answers into one cited report.
    ///
    /// The thinking budget scales with the plan type. The leading reasoning
    /// block is split off from the visible report.
    pub async fn synthesize(
        &self,
        query: &str,
        plan: &Plan,
        history: &[ConversationTurn],
        outcomes: &[TaskOutcome],
        token: &CancellationToken,
    ) -> Result<TurnResult, SwarmError> {
        check_cancelled(token)?;

        let evidence = outcomes
            .iter()
            .map(TaskOutcome::to_evidence)
            .collect::<Vec<_>>()
            .join("\n\n");
        let history_text = render_history(history, self.config.orchestration.history_window);

        let request = GenerationRequest::new(SwarmPromptTemplate::synthesis_prompt(
            query,
            plan,
            &history_text,
            &evidence,
        ))
        .with_system(SwarmPromptTemplate::synthesizer_system());

        let model = &self.config.models.synthesizer;
        let generation = &self.config.generation;
        let mut options = GenerationOptions::default()
            .with_temperature(generation.synthesizer_temperature)
            .with_max_output_tokens(generation.max_output_tokens);
        if model.supports_thinking() {
            options = options.with_thinking_budget(generation.thinking_budget(plan.plan_type));
        }
        debug!("Synthesizing {} answer(s) with {:?}", outcomes.len(), options);

        let text = call_with_retry("synthesize", &self.config.retry, token, || {
            self.gateway.generate(model, &request, &options)
        })
        .await
        .map_err(|e| match e {
            SwarmError::Cancelled => SwarmError::Cancelled,
            other => SwarmError::SynthesisFailed(other.to_string()),
        })?;

        let result = TurnResult::from_model_output(&text);
        if result.is_empty() {
            return Err(SwarmError::SynthesisFailed(
                "the synthesizer returned no report".to_string(),
            ));
        }
        info!(
            "Report synthesized ({} citation(s))",
            result.citations().len()
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::*;
    use super::super::types::{SwarmError, TaskOutcome};
    use std::collections::VecDeque;
    use swarm_domain::{Plan, PlanType, Task};
    use tokio_util::sync::CancellationToken;

    #[tokio::test]
    async fn test_reasoning_split_from_report() {
        let script = Script {
            synthesize: VecDeque::from([ok(REPORT)]),
            ..Script::default()
        };
        let (use_case, _, _) =
            use_case_with(ScriptedGateway::new(script), &["Doc1.pdf"], fast_config()).await;
        let plan = Plan::new(PlanType::SimpleFact, "r", GOOD_STRATEGY);
        let outcomes = vec![TaskOutcome::success(
            Task::new("Doc1.pdf", "What was revenue?", ""),
            "Revenue was $5m",
        )];

        let result = use_case
            .synthesize("What was revenue?", &plan, &[], &outcomes, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(result.reasoning, "combined the answers");
        assert_eq!(result.citations().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_report_is_synthesis_failure() {
        let script = Script {
            synthesize: VecDeque::from([ok("<reasoning>nothing to say</reasoning>")]),
            ..Script::default()
        };
        let (use_case, _, _) =
            use_case_with(ScriptedGateway::new(script), &["Doc1.pdf"], fast_config()).await;
        let plan = Plan::new(PlanType::SimpleFact, "r", GOOD_STRATEGY);

        let err = use_case
            .synthesize("q", &plan, &[], &[], &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SwarmError::SynthesisFailed(_)));
    }
}
