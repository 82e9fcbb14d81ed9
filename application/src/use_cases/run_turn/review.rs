//! Review boards for the RunTurn use case.
//!
//! - Plan Review Board: deterministic heuristics first, then a holistic
//!   remote judgment
//! - Output Review Board: remote audit of the synthesized report
//!
//! Unusable reviewer output approves by default; a review board never fails
//! a turn on its own.

use super::RunTurnUseCase;
use super::types::SwarmError;
use crate::ports::llm_gateway::GenerationRequest;
use crate::use_cases::shared::check_cancelled;
use swarm_domain::prompt::schema::{output_verdict_schema, plan_verdict_schema};
use swarm_domain::{DocumentId, OutputVerdict, Plan, PlanVerdict, SwarmPromptTemplate};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

impl RunTurnUseCase {
    /// Judge `plan` against the query and the available documents.
    pub async fn review_plan(
        &self,
        query: &str,
        plan: &Plan,
        documents: &[DocumentId],
        token: &CancellationToken,
    ) -> Result<PlanVerdict, SwarmError> {
        check_cancelled(token)?;

        let findings = self.config.heuristics.evaluate(query, plan, documents);
        if let Some(verdict) = PlanVerdict::from_findings(&findings) {
            info!("Plan rejected by {} heuristic finding(s)", findings.len());
            return Ok(verdict);
        }

        let request = GenerationRequest::new(SwarmPromptTemplate::plan_review_prompt(
            query,
            plan,
            documents,
            &self.config.policies.plan_review,
        ))
        .with_system(SwarmPromptTemplate::plan_review_system())
        .with_schema(plan_verdict_schema());
        let options = self.json_options(self.config.generation.reviewer_temperature);

        let verdict = self
            .generate_structured("plan_review", &self.config.models.reviewer, &request, &options, token)
            .await
            .and_then(|value| PlanVerdict::from_value(&value).map_err(SwarmError::from));

        match verdict {
            Ok(verdict) => Ok(verdict),
            Err(SwarmError::Cancelled) => Err(SwarmError::Cancelled),
            Err(e) => {
                warn!("Plan review unusable, approving by default: {}", e);
                Ok(PlanVerdict::approved(
                    "Reviewer output was unusable; approved by default.",
                ))
            }
        }
    }

    /// Audit the visible report of a synthesized turn.
    pub async fn audit_output(
        &self,
        query: &str,
        report: &str,
        plan: &Plan,
        token: &CancellationToken,
    ) -> Result<OutputVerdict, SwarmError> {
        check_cancelled(token)?;

        let request = GenerationRequest::new(SwarmPromptTemplate::audit_prompt(
            query,
            report,
            plan,
            &self.config.policies.audit,
        ))
        .with_system(SwarmPromptTemplate::audit_system())
        .with_schema(output_verdict_schema());
        let options = self.json_options(self.config.generation.reviewer_temperature);

        let verdict = self
            .generate_structured("audit", &self.config.models.reviewer, &request, &options, token)
            .await
            .and_then(|value| OutputVerdict::from_value(&value).map_err(SwarmError::from));

        match verdict {
            Ok(verdict) => {
                if !verdict.is_approved() {
                    info!(
                        "Audit rejected the report (missing data suspected: {})",
                        verdict.missing_data_suspected
                    );
                }
                Ok(verdict)
            }
            Err(SwarmError::Cancelled) => Err(SwarmError::Cancelled),
            Err(e) => {
                warn!("Audit unusable, approving by default: {}", e);
                Ok(OutputVerdict::approved(
                    "Auditor output was unusable; approved by default.",
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::*;
    use std::collections::VecDeque;
    use swarm_domain::{DocumentId, HeuristicFinding, Plan, PlanStep, PlanType, Task};
    use tokio_util::sync::CancellationToken;

    fn docs() -> Vec<DocumentId> {
        vec![DocumentId::from("Doc1.pdf"), DocumentId::from("Doc2.pdf")]
    }

    fn plan_touching(documents: &[&str]) -> Plan {
        let mut step = PlanStep::new("Extract", "Pull revenue per year");
        for d in documents {
            step = step.with_task(Task::new(
                *d,
                "What was total revenue reported for 2022 and 2023?",
                "trend",
            ));
        }
        Plan::new(PlanType::DeepAnalysis, "comparison", GOOD_STRATEGY)
            .with_step(step)
            .with_step(PlanStep::new("Compare", "Contrast"))
    }

    #[tokio::test]
    async fn test_board_rejects_any_single_file_candidate() {
        let (use_case, calls, _) = use_case_with(
            ScriptedGateway::new(Script::default()),
            &["Doc1.pdf", "Doc2.pdf"],
            fast_config(),
        )
        .await;
        let query = "Compare revenue trends across Doc1.pdf and Doc2.pdf";
        let token = CancellationToken::new();

        for only in ["Doc1.pdf", "Doc2.pdf"] {
            let verdict = use_case
                .review_plan(query, &plan_touching(&[only]), &docs(), &token)
                .await
                .unwrap();
            assert!(!verdict.is_approved());
            assert!(!verdict.directives.is_empty());
        }
        assert_eq!(calls.lock().unwrap().review, 0);

        let finding = use_case
            .config()
            .heuristics
            .evaluate(query, &plan_touching(&["Doc1.pdf"]), &docs());
        assert_eq!(
            finding,
            vec![HeuristicFinding::UnqueriedDocuments(vec![DocumentId::from("Doc2.pdf")])]
        );
    }

    #[tokio::test]
    async fn test_unparsable_review_approves_by_default() {
        let script = Script {
            review: VecDeque::from([ok("Looks fine to me!")]),
            ..Script::default()
        };
        let (use_case, _, _) = use_case_with(
            ScriptedGateway::new(script),
            &["Doc1.pdf", "Doc2.pdf"],
            fast_config(),
        )
        .await;

        let verdict = use_case
            .review_plan(
                "Compare revenue trends across Doc1.pdf and Doc2.pdf",
                &plan_touching(&["Doc1.pdf", "Doc2.pdf"]),
                &docs(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert!(verdict.is_approved());
    }

    #[tokio::test]
    async fn test_remote_rejection_is_returned() {
        let script = Script {
            review: VecDeque::from([ok(REJECT_PLAN)]),
            ..Script::default()
        };
        let (use_case, _, _) = use_case_with(
            ScriptedGateway::new(script),
            &["Doc1.pdf", "Doc2.pdf"],
            fast_config(),
        )
        .await;

        let verdict = use_case
            .review_plan(
                "Compare revenue trends across Doc1.pdf and Doc2.pdf",
                &plan_touching(&["Doc1.pdf", "Doc2.pdf"]),
                &docs(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert!(!verdict.is_approved());
        assert_eq!(verdict.directives, vec!["ask for margins".to_string()]);
    }

    #[tokio::test]
    async fn test_audit_parses_missing_data_suspicion() {
        let script = Script {
            audit: VecDeque::from([ok(REJECT_AUDIT), ok("{\"verdict\": ")]),
            ..Script::default()
        };
        let (use_case, _, _) =
            use_case_with(ScriptedGateway::new(script), &["Doc1.pdf"], fast_config()).await;
        let plan = plan_touching(&["Doc1.pdf"]);
        let token = CancellationToken::new();

        let verdict = use_case.audit_output("q", "report", &plan, &token).await.unwrap();
        assert!(!verdict.is_approved());
        assert!(verdict.missing_data_suspected);
        assert_eq!(
            verdict.remediation.as_deref(),
            Some("Ask Doc2.pdf for its revenue table")
        );

        // Truncated to `{"verdict": null}`: no decision, so approved by default
        let verdict = use_case.audit_output("q", "report", &plan, &token).await.unwrap();
        assert!(verdict.is_approved());
    }
}
