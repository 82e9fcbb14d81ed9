//! Planning and the plan review loop for the RunTurn use case.

use super::types::SwarmError;
use super::{RunTurnUseCase, TurnContext};
use crate::ports::llm_gateway::GenerationRequest;
use crate::use_cases::shared::check_cancelled;
use swarm_domain::prompt::schema::plan_schema;
use swarm_domain::{
    ConversationTurn, DocumentId, FailureFeedback, Plan, PlanVerdict, SwarmPromptTemplate,
    TurnPhase, parse_plan_value, render_history,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

impl RunTurnUseCase {
    /// Produce a plan for `query`.
    ///
    /// With `feedback`, the prompt carries the remediation directive and the
    /// rejected plan. No default plan is ever fabricated: any failure other
    /// than cancellation is [`SwarmError::PlanningFailed`].
    pub async fn create_plan(
        &self,
        query: &str,
        documents: &[DocumentId],
        history: &[ConversationTurn],
        feedback: Option<&FailureFeedback>,
        token: &CancellationToken,
    ) -> Result<Plan, SwarmError> {
        check_cancelled(token)?;

        let history_text = render_history(history, self.config.orchestration.history_window);
        let request = GenerationRequest::new(SwarmPromptTemplate::planning_prompt(
            query,
            documents,
            &history_text,
            feedback,
        ))
        .with_system(SwarmPromptTemplate::planner_system())
        .with_schema(plan_schema());
        let options = self.json_options(self.config.generation.planner_temperature);

        let value = self
            .generate_structured("plan", &self.config.models.planner, &request, &options, token)
            .await
            .map_err(as_planning_failure)?;
        let plan = parse_plan_value(&value).map_err(|e| SwarmError::PlanningFailed(e.to_string()))?;

        info!(
            "Plan created: {} with {} step(s), {} task(s)",
            plan.plan_type,
            plan.steps.len(),
            plan.task_count()
        );
        Ok(plan)
    }

    /// `create_plan` with feedback built from a rejected verdict.
    ///
    /// `earlier` is the feedback the planning pass started with; its
    /// directive stays in every refinement prompt.
    #[allow(clippy::too_many_arguments)]
    pub async fn refine_plan(
        &self,
        query: &str,
        documents: &[DocumentId],
        history: &[ConversationTurn],
        rejected: &Plan,
        verdict: &PlanVerdict,
        earlier: Option<&FailureFeedback>,
        token: &CancellationToken,
    ) -> Result<Plan, SwarmError> {
        let feedback = FailureFeedback::from_plan_verdict(verdict, rejected).carrying(earlier);
        self.create_plan(query, documents, history, Some(&feedback), token)
            .await
    }

    /// Plan, then loop with the Plan Review Board.
    ///
    /// Ends on the first approval, when a refined plan no longer qualifies for
    /// review, or after `max_review_rounds`; the last plan produced is used
    /// either way.
    pub(super) async fn plan_with_review(
        &self,
        ctx: &mut TurnContext<'_>,
        feedback: Option<&FailureFeedback>,
        token: &CancellationToken,
    ) -> Result<Plan, SwarmError> {
        self.progress.on_phase_change(&TurnPhase::Plan);
        let mut plan = self
            .create_plan(ctx.query, &ctx.documents, ctx.history, feedback, token)
            .await?;
        self.record_proposal(ctx, &plan);

        let max_rounds = self.config.orchestration.max_review_rounds;
        let mut review_round = 0;

        while plan.requires_review() && review_round < max_rounds {
            review_round += 1;
            self.progress.on_phase_change(&TurnPhase::Review);

            let verdict = self
                .review_plan(ctx.query, &plan, &ctx.documents, token)
                .await?;
            ctx.record.record_critique(ctx.proposal_round, &verdict);
            self.progress.on_plan_verdict(ctx.proposal_round, &verdict);
            self.log_event("plan_critique", ctx.proposal_round, &verdict);

            if verdict.is_approved() {
                info!("Plan approved in review round {}", review_round);
                break;
            }
            if review_round == max_rounds {
                info!(
                    "Review round limit ({}) reached; proceeding with the latest plan",
                    max_rounds
                );
                break;
            }

            info!("Plan rejected in review round {}; refining", review_round);
            self.progress.on_phase_change(&TurnPhase::Plan);
            plan = self
                .refine_plan(
                    ctx.query,
                    &ctx.documents,
                    ctx.history,
                    &plan,
                    &verdict,
                    feedback,
                    token,
                )
                .await?;
            self.record_proposal(ctx, &plan);
        }

        Ok(plan)
    }

    fn record_proposal(&self, ctx: &mut TurnContext<'_>, plan: &Plan) {
        ctx.proposal_round += 1;
        ctx.record.record_proposal(ctx.proposal_round, plan);
        self.progress.on_plan_proposed(ctx.proposal_round, plan);
        self.log_event("plan_proposed", ctx.proposal_round, plan);
    }
}

fn as_planning_failure(err: SwarmError) -> SwarmError {
    match err {
        SwarmError::Cancelled => SwarmError::Cancelled,
        other => SwarmError::PlanningFailed(other.to_string()),
    }
}
