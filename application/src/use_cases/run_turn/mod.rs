//! Run Turn use case
//!
//! Drives one user turn through the swarm:
//!
//! | Phase            | Module            | Remote call            |
//! |------------------|-------------------|------------------------|
//! | 1. Clarify       | `clarification`   | generate (schema)      |
//! | 2. Plan          | `planning`        | generate (schema)      |
//! | 3. Review ⟲ Plan | `review`          | local heuristics, then generate |
//! | 4. Execute       | `execution`       | one `ask` per task, in parallel |
//! | 5. Synthesize    | `synthesis`       | generate (thinking)    |
//! | 6. Audit ⟲ 2–5   | `review`          | generate (schema)      |
//!
//! Both loops are bounded: review by `max_review_rounds`, audit by
//! `audit_retry_budget`. Clarification pauses the turn, so the controller
//! calls [`RunTurnUseCase::clarify`] separately before [`RunTurnUseCase::execute`].

mod clarification;
mod execution;
mod planning;
mod review;
mod synthesis;
mod types;

pub use types::{SwarmError, TaskOutcome, TurnOutcome, TurnReport};

use crate::config::SwarmConfig;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
use crate::ports::llm_gateway::{GenerationOptions, GenerationRequest, LlmGateway};
use crate::ports::progress::{NoTurnProgress, TurnProgressNotifier};
use crate::use_cases::agent_swarm::AgentSwarm;
use crate::use_cases::retry::call_with_retry;
use serde_json::Value;
use std::sync::Arc;
use swarm_domain::{
    CollaborationRecord, ConversationTurn, DocumentId, FailureFeedback, Model, TurnPhase,
    parse_structured,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Per-turn working state shared by the phases.
pub(super) struct TurnContext<'a> {
    pub(super) query: &'a str,
    pub(super) documents: Vec<DocumentId>,
    pub(super) history: &'a [ConversationTurn],
    pub(super) record: CollaborationRecord,
    /// Counts every plan produced during the turn, refinements included.
    pub(super) proposal_round: usize,
}

impl<'a> TurnContext<'a> {
    fn new(query: &'a str, documents: Vec<DocumentId>, history: &'a [ConversationTurn]) -> Self {
        Self {
            query,
            documents,
            history,
            record: CollaborationRecord::new(),
            proposal_round: 0,
        }
    }
}

/// Use case for running one turn of the swarm
#[derive(Clone)]
pub struct RunTurnUseCase {
    pub(super) gateway: Arc<dyn LlmGateway>,
    pub(super) swarm: Arc<AgentSwarm>,
    pub(super) config: SwarmConfig,
    pub(super) progress: Arc<dyn TurnProgressNotifier>,
    pub(super) logger: Arc<dyn ConversationLogger>,
}

impl RunTurnUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>, swarm: Arc<AgentSwarm>, config: SwarmConfig) -> Self {
        Self {
            gateway,
            swarm,
            config,
            progress: Arc::new(NoTurnProgress),
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn TurnProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }

    pub fn swarm(&self) -> &Arc<AgentSwarm> {
        &self.swarm
    }

    pub fn progress(&self) -> &Arc<dyn TurnProgressNotifier> {
        &self.progress
    }

    /// Plan, review, execute, synthesize and audit `query`.
    ///
    /// A rejected audit re-enters planning with the audit's remediation while
    /// the retry budget lasts; after that the latest report is accepted.
    pub async fn execute(
        &self,
        query: &str,
        history: &[ConversationTurn],
        token: &CancellationToken,
    ) -> Result<TurnReport, SwarmError> {
        let documents = self.swarm.list().await;
        if documents.is_empty() {
            return Err(SwarmError::NoDocuments);
        }

        let mut ctx = TurnContext::new(query, documents, history);
        let budget = self.config.orchestration.audit_retry_budget;
        let mut feedback: Option<FailureFeedback> = None;
        let mut attempt = 0;

        loop {
            attempt += 1;
            let plan = self.plan_with_review(&mut ctx, feedback.as_ref(), token).await?;

            self.progress.on_phase_change(&TurnPhase::Execute);
            let outcomes = self.execute_plan(&plan, token).await?;

            self.progress.on_phase_change(&TurnPhase::Synthesize);
            let result = self
                .synthesize(query, &plan, history, &outcomes, token)
                .await?;

            self.progress.on_phase_change(&TurnPhase::Audit);
            let verdict = self.audit_output(query, &result.report, &plan, token).await?;
            ctx.record.record_audit(attempt, &verdict);
            self.progress.on_audit_verdict(attempt, &verdict);
            self.log_event("output_audit", attempt, &verdict);

            if verdict.is_approved() || attempt > budget {
                if !verdict.is_approved() {
                    warn!(
                        "Audit still rejects the report after {} attempt(s); accepting it",
                        attempt
                    );
                }
                info!(
                    "Turn complete: {} task(s), {} audit attempt(s)",
                    outcomes.len(),
                    attempt
                );
                return Ok(TurnReport {
                    result,
                    plan,
                    collaboration: ctx.record,
                    task_outcomes: outcomes,
                    audit_attempts: attempt,
                });
            }

            info!("Audit rejected the report; re-planning ({}/{})", attempt, budget);
            feedback = Some(FailureFeedback::from_output_verdict(&verdict, &plan));
        }
    }

    /// Schema-constrained generation followed by tolerant parsing.
    pub(super) async fn generate_structured(
        &self,
        operation: &str,
        model: &Model,
        request: &GenerationRequest,
        options: &GenerationOptions,
        token: &CancellationToken,
    ) -> Result<Value, SwarmError> {
        let text = call_with_retry(operation, &self.config.retry, token, || {
            self.gateway.generate(model, request, options)
        })
        .await?;
        Ok(parse_structured(&text)?)
    }

    /// Structured options shared by the JSON-producing stages.
    pub(super) fn json_options(&self, temperature: f32) -> GenerationOptions {
        GenerationOptions::default()
            .with_temperature(temperature)
            .with_max_output_tokens(self.config.generation.max_output_tokens)
    }

    pub(super) fn log_event(&self, event_type: &'static str, round: usize, payload: &impl serde::Serialize) {
        let payload = serde_json::to_value(payload).unwrap_or(Value::Null);
        self.logger.log(ConversationEvent::new(
            event_type,
            serde_json::json!({ "round": round, "data": payload }),
        ));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    //! Scripted gateway shared by the phase tests.

    use super::*;
    use crate::config::{OrchestrationParams, RetryPolicy};
    use crate::ports::llm_gateway::{GatewayError, LlmSession};
    use async_trait::async_trait;
    use std::collections::{HashSet, VecDeque};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use swarm_domain::Document;
    use tokio::sync::Notify;

    /// Responses for `generate`, keyed by the system prompt's stage.
    #[derive(Default)]
    pub(crate) struct Script {
        pub(crate) clarify: VecDeque<Result<String, GatewayError>>,
        pub(crate) plan: VecDeque<Result<String, GatewayError>>,
        pub(crate) review: VecDeque<Result<String, GatewayError>>,
        pub(crate) synthesize: VecDeque<Result<String, GatewayError>>,
        pub(crate) audit: VecDeque<Result<String, GatewayError>>,
    }

    #[derive(Default)]
    pub(crate) struct Calls {
        pub(crate) clarify: usize,
        pub(crate) plan: usize,
        pub(crate) review: usize,
        pub(crate) synthesize: usize,
        pub(crate) audit: usize,
        pub(crate) asks: Vec<(String, String)>,
        pub(crate) plan_prompts: Vec<String>,
        pub(crate) synthesis_options: Vec<GenerationOptions>,
    }

    pub(crate) struct ScriptedGateway {
        pub(crate) script: Mutex<Script>,
        pub(crate) calls: Arc<Mutex<Calls>>,
        /// Documents whose agents answer with an error
        pub(crate) failing_documents: HashSet<String>,
        pub(crate) ask_gate: Option<AskGate>,
    }

    impl ScriptedGateway {
        pub(crate) fn new(script: Script) -> Self {
            Self {
                script: Mutex::new(script),
                calls: Arc::new(Mutex::new(Calls::default())),
                failing_documents: HashSet::new(),
                ask_gate: None,
            }
        }

        pub(crate) fn with_ask_gate(mut self, gate: AskGate) -> Self {
            self.ask_gate = Some(gate);
            self
        }
    }

    /// Holds the first `held` agent answers until the turn is cancelled.
    #[derive(Clone)]
    pub(crate) struct AskGate {
        /// Notified once per held ask
        pub(crate) started: Arc<Notify>,
        held: Arc<AtomicUsize>,
    }

    impl AskGate {
        pub(crate) fn new(held: usize) -> Self {
            Self {
                started: Arc::new(Notify::new()),
                held: Arc::new(AtomicUsize::new(held)),
            }
        }

        async fn pass(&self) {
            let hold = self
                .held
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if hold {
                self.started.notify_one();
                std::future::pending::<()>().await;
            }
        }
    }

    fn next(queue: &mut VecDeque<Result<String, GatewayError>>, stage: &str) -> Result<String, GatewayError> {
        queue
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Other(format!("no scripted {} response", stage))))
    }

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        async fn generate(
            &self,
            _model: &Model,
            request: &GenerationRequest,
            options: &GenerationOptions,
        ) -> Result<String, GatewayError> {
            let system = request.system.clone().unwrap_or_default();
            let mut script = self.script.lock().unwrap();
            let mut calls = self.calls.lock().unwrap();
            if system.contains("whether a user's question") {
                calls.clarify += 1;
                next(&mut script.clarify, "clarify")
            } else if system.contains("planner of a research team") {
                calls.plan += 1;
                calls.plan_prompts.push(request.prompt.clone());
                next(&mut script.plan, "plan")
            } else if system.contains("adversarial plan reviewer") {
                calls.review += 1;
                next(&mut script.review, "review")
            } else if system.contains("final report") {
                calls.synthesize += 1;
                calls.synthesis_options.push(*options);
                next(&mut script.synthesize, "synthesize")
            } else if system.contains("auditor") {
                calls.audit += 1;
                next(&mut script.audit, "audit")
            } else {
                Err(GatewayError::Other("unknown stage".into()))
            }
        }

        async fn create_session_with_system_prompt(
            &self,
            model: &Model,
            system_prompt: &str,
            _options: &GenerationOptions,
        ) -> Result<Box<dyn LlmSession>, GatewayError> {
            let document = system_prompt.split('"').nth(1).unwrap_or_default().to_string();
            Ok(Box::new(ScriptedSession {
                model: model.clone(),
                fails: self.failing_documents.contains(&document),
                document,
                calls: Arc::clone(&self.calls),
                gate: self.ask_gate.clone(),
            }))
        }
    }

    struct ScriptedSession {
        model: Model,
        document: String,
        fails: bool,
        calls: Arc<Mutex<Calls>>,
        gate: Option<AskGate>,
    }

    #[async_trait]
    impl LlmSession for ScriptedSession {
        fn model(&self) -> &Model {
            &self.model
        }

        async fn send(&self, content: &str) -> Result<String, GatewayError> {
            self.calls
                .lock()
                .unwrap()
                .asks
                .push((self.document.clone(), content.to_string()));
            if let Some(gate) = &self.gate {
                gate.pass().await;
            }
            if self.fails {
                return Err(GatewayError::Http {
                    status: 500,
                    message: "internal error".into(),
                });
            }
            Ok(format!(
                r#"<claim source="{}" page="1" quote="figure">Answer from {}</claim>"#,
                self.document, self.document
            ))
        }
    }

    pub(crate) const GOOD_STRATEGY: &str =
        "Extract yearly revenue from each filing, then contrast growth rates and explain divergences.";

    pub(crate) fn simple_plan_json(document: &str) -> String {
        format!(
            r#"{{"plan_type": "SIMPLE_FACT", "reasoning": "single lookup", "strategy": "{}",
               "steps": [{{"title": "Look up", "description": "d",
                 "tasks": [{{"document": "{}", "question": "What was total revenue reported for 2023?", "rationale": "direct"}}]}}]}}"#,
            GOOD_STRATEGY, document
        )
    }

    pub(crate) fn deep_plan_json(documents: &[&str]) -> String {
        let tasks = documents
            .iter()
            .map(|d| {
                format!(
                    r#"{{"document": "{}", "question": "What was total revenue reported for 2022 and 2023?", "rationale": "trend"}}"#,
                    d
                )
            })
            .collect::<Vec<_>>()
            .join(",");
        format!(
            r#"{{"plan_type": "DEEP_ANALYSIS", "reasoning": "comparison", "strategy": "{}",
               "steps": [{{"title": "Extract", "description": "d", "tasks": [{}]}},
                         {{"title": "Compare", "description": "contrast", "tasks": []}}]}}"#,
            GOOD_STRATEGY, tasks
        )
    }

    pub(crate) const APPROVE_PLAN: &str = r#"{"verdict": "APPROVED", "critique": "complete"}"#;
    pub(crate) const REJECT_PLAN: &str =
        r#"{"verdict": "REJECTED", "critique": "too shallow", "directives": ["ask for margins"]}"#;
    pub(crate) const APPROVE_AUDIT: &str =
        r#"{"verdict": "APPROVED", "quality": "good", "missing_data_suspected": false}"#;
    pub(crate) const REJECT_AUDIT: &str = r#"{"verdict": "REJECTED", "quality": "Doc2 marked not found", "missing_data_suspected": true, "remediation": "Ask Doc2.pdf for its revenue table"}"#;
    pub(crate) const REPORT: &str =
        "<reasoning>combined the answers</reasoning>\n## Revenue\n<claim source=\"Doc1.pdf\" page=\"1\" quote=\"figure\">Revenue grew</claim>";

    pub(crate) fn ok(text: &str) -> Result<String, GatewayError> {
        Ok(text.to_string())
    }

    pub(crate) fn fast_config() -> SwarmConfig {
        SwarmConfig::default()
            .with_retry(RetryPolicy::new(1, 1, 0))
            .with_orchestration(OrchestrationParams::default())
    }

    pub(crate) async fn use_case_with(
        gateway: ScriptedGateway,
        documents: &[&str],
        config: SwarmConfig,
    ) -> (RunTurnUseCase, Arc<Mutex<Calls>>, Arc<AgentSwarm>) {
        let calls = Arc::clone(&gateway.calls);
        let gateway: Arc<dyn LlmGateway> = Arc::new(gateway);
        let swarm = Arc::new(AgentSwarm::new(
            Arc::clone(&gateway),
            Model::default(),
            config.retry.clone(),
        ));
        let token = CancellationToken::new();
        for name in documents {
            let document = Document::new(*name, format!("Contents of {}", name)).unwrap();
            swarm.brief(&document, &token).await.unwrap();
        }
        let use_case = RunTurnUseCase::new(gateway, Arc::clone(&swarm), config);
        (use_case, calls, swarm)
    }

    #[tokio::test]
    async fn test_simple_fact_turn_skips_review() {
        let script = Script {
            plan: VecDeque::from([ok(&simple_plan_json("Doc1.pdf"))]),
            synthesize: VecDeque::from([ok(REPORT)]),
            audit: VecDeque::from([ok(APPROVE_AUDIT)]),
            ..Script::default()
        };
        let (use_case, calls, _) =
            use_case_with(ScriptedGateway::new(script), &["Doc1.pdf"], fast_config()).await;

        let report = use_case
            .execute("What was revenue in 2023?", &[], &CancellationToken::new())
            .await
            .unwrap();

        let calls = calls.lock().unwrap();
        assert_eq!(calls.review, 0);
        assert_eq!(calls.asks.len(), 1);
        assert_eq!(report.audit_attempts, 1);
        assert_eq!(report.result.reasoning, "combined the answers");
        assert!(report.result.report.starts_with("## Revenue"));
        assert_eq!(report.collaboration.count(swarm_domain::EntryKind::PlanCritique), 0);
        // SIMPLE_FACT synthesis uses the small thinking budget
        assert_eq!(calls.synthesis_options[0].thinking_budget, Some(1024));
    }

    #[tokio::test]
    async fn test_rejected_audit_triggers_exactly_one_replan_cycle() {
        let script = Script {
            plan: VecDeque::from([
                ok(&deep_plan_json(&["Doc1.pdf", "Doc2.pdf"])),
                ok(&deep_plan_json(&["Doc1.pdf", "Doc2.pdf"])),
            ]),
            review: VecDeque::from([ok(APPROVE_PLAN), ok(APPROVE_PLAN)]),
            synthesize: VecDeque::from([ok(REPORT), ok(REPORT)]),
            audit: VecDeque::from([ok(REJECT_AUDIT), ok(REJECT_AUDIT)]),
            ..Script::default()
        };
        let (use_case, calls, _) = use_case_with(
            ScriptedGateway::new(script),
            &["Doc1.pdf", "Doc2.pdf"],
            fast_config(),
        )
        .await;

        let report = use_case
            .execute(
                "Compare revenue trends across Doc1.pdf and Doc2.pdf",
                &[],
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        let calls = calls.lock().unwrap();
        assert_eq!(calls.plan, 2);
        assert_eq!(calls.synthesize, 2);
        assert_eq!(calls.audit, 2);
        assert_eq!(calls.asks.len(), 4);
        assert_eq!(report.audit_attempts, 2);
        assert!(!report.collaboration.entries().is_empty());
        // The re-plan carries the audit remediation
        assert!(calls.plan_prompts[1].contains("Ask Doc2.pdf for its revenue table"));
        assert!(!calls.plan_prompts[0].contains("Remediation required"));
        let audit_rounds: Vec<usize> = report
            .collaboration
            .of_kind(swarm_domain::EntryKind::OutputAudit)
            .map(|e| e.round)
            .collect();
        assert_eq!(audit_rounds, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_approved_audit_ends_turn() {
        let script = Script {
            plan: VecDeque::from([ok(&deep_plan_json(&["Doc1.pdf", "Doc2.pdf"]))]),
            review: VecDeque::from([ok(APPROVE_PLAN)]),
            synthesize: VecDeque::from([ok(REPORT)]),
            audit: VecDeque::from([ok(APPROVE_AUDIT)]),
            ..Script::default()
        };
        let (use_case, calls, _) = use_case_with(
            ScriptedGateway::new(script),
            &["Doc1.pdf", "Doc2.pdf"],
            fast_config(),
        )
        .await;

        let report = use_case
            .execute("Compare revenue trends across Doc1.pdf and Doc2.pdf", &[], &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(report.audit_attempts, 1);
        assert_eq!(calls.lock().unwrap().plan, 1);
        // DEEP_ANALYSIS synthesis uses the large thinking budget
        assert_eq!(
            calls.lock().unwrap().synthesis_options[0].thinking_budget,
            Some(16384)
        );
    }

    #[tokio::test]
    async fn test_no_documents() {
        let (use_case, calls, _) =
            use_case_with(ScriptedGateway::new(Script::default()), &[], fast_config()).await;
        let err = use_case
            .execute("anything", &[], &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SwarmError::NoDocuments));
        assert_eq!(calls.lock().unwrap().plan, 0);
    }

    #[tokio::test]
    async fn test_cancelled_token_makes_no_remote_call() {
        let (use_case, calls, _) = use_case_with(
            ScriptedGateway::new(Script::default()),
            &["Doc1.pdf"],
            fast_config(),
        )
        .await;
        let token = CancellationToken::new();
        token.cancel();

        let err = use_case.execute("What is X?", &[], &token).await.unwrap_err();
        assert!(err.is_cancelled());
        let calls = calls.lock().unwrap();
        assert_eq!(calls.plan + calls.review + calls.synthesize + calls.audit, 0);
        assert!(calls.asks.is_empty());
    }

    #[tokio::test]
    async fn test_planning_failure_is_fatal() {
        let script = Script {
            plan: VecDeque::from([ok("I'd rather not make a plan.")]),
            ..Script::default()
        };
        let (use_case, calls, _) =
            use_case_with(ScriptedGateway::new(script), &["Doc1.pdf"], fast_config()).await;

        let err = use_case
            .execute("What is X?", &[], &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SwarmError::PlanningFailed(_)));
        assert_eq!(calls.lock().unwrap().synthesize, 0);
    }

    #[tokio::test]
    async fn test_truncated_plan_without_steps_is_fatal() {
        let script = Script {
            plan: VecDeque::from([ok(
                r#"{"plan_type": "DEEP_ANALYSIS", "reasoning": "compare the two fil"#,
            )]),
            synthesize: VecDeque::from([ok(REPORT)]),
            audit: VecDeque::from([ok(APPROVE_AUDIT)]),
            ..Script::default()
        };
        let (use_case, calls, _) = use_case_with(
            ScriptedGateway::new(script),
            &["Doc1.pdf", "Doc2.pdf"],
            fast_config(),
        )
        .await;

        let err = use_case
            .execute(
                "Compare revenue trends across Doc1.pdf and Doc2.pdf",
                &[],
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SwarmError::PlanningFailed(_)));

        let calls = calls.lock().unwrap();
        assert!(calls.asks.is_empty());
        assert_eq!(calls.review + calls.synthesize + calls.audit, 0);
    }
}
