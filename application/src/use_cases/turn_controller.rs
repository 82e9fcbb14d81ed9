//! Turn Controller
//!
//! The surface the presentation layer talks to. It owns the single-flight
//! run token, the in-memory conversation history and the pending
//! clarification, and turns every exit path of a turn into a
//! [`TurnOutcome`] instead of an error.

use crate::use_cases::agent_swarm::AgentSwarm;
use crate::use_cases::run_control::CancellableRun;
use crate::use_cases::run_turn::{RunTurnUseCase, SwarmError, TurnOutcome};
use std::sync::{Arc, Mutex};
use swarm_domain::{
    ClarificationAnswers, ClarificationError, ClarificationRequest, ConversationTurn, Document,
    DocumentId, TurnPhase,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// A query waiting for the user's clarification answers
#[derive(Debug, Clone)]
struct PendingClarification {
    query: String,
    request: ClarificationRequest,
}

pub struct TurnController {
    use_case: RunTurnUseCase,
    run: CancellableRun,
    history: Mutex<Vec<ConversationTurn>>,
    pending: Mutex<Option<PendingClarification>>,
}

impl TurnController {
    pub fn new(use_case: RunTurnUseCase) -> Self {
        Self {
            use_case,
            run: CancellableRun::new(),
            history: Mutex::new(Vec::new()),
            pending: Mutex::new(None),
        }
    }

    fn swarm(&self) -> &Arc<AgentSwarm> {
        self.use_case.swarm()
    }

    /// Start a turn for `query`.
    ///
    /// Cancels any running turn and drops an unanswered clarification. The
    /// turn pauses with [`TurnOutcome::Clarification`] when the gate asks
    /// questions; answer them with [`Self::submit_clarification_answers`].
    pub async fn submit_query(&self, query: &str) -> TurnOutcome {
        let token = self.run.begin();
        self.pending_slot().take();

        let query = query.trim();
        if self.use_case.config().orchestration.enable_clarification {
            let documents = self.swarm().list().await;
            match self.use_case.clarify(query, &documents, &token).await {
                Ok(request) if request.should_pause() => {
                    *self.pending_slot() = Some(PendingClarification {
                        query: query.to_string(),
                        request: request.clone(),
                    });
                    return TurnOutcome::Clarification(request);
                }
                Ok(_) => {}
                Err(e) => return self.fail(e),
            }
        }

        self.run_turn(query, &token).await
    }

    /// Resume the paused turn with the user's answers.
    ///
    /// Invalid answers leave the clarification pending so the user can fix
    /// them.
    pub async fn submit_clarification_answers(
        &self,
        answers: &ClarificationAnswers,
    ) -> Result<TurnOutcome, ClarificationError> {
        let pending = {
            let mut slot = self.pending_slot();
            let Some(pending) = slot.as_ref() else {
                return Err(ClarificationError::NotPending);
            };
            answers.validate(&pending.request)?;
            slot.take().ok_or(ClarificationError::NotPending)?
        };

        let query = format!(
            "{}\n\n{}",
            pending.query,
            answers.to_prompt_block(&pending.request)
        );
        let token = self.run.begin();
        Ok(self.run_turn(&query, &token).await)
    }

    pub fn pending_clarification(&self) -> Option<ClarificationRequest> {
        self.pending_slot().as_ref().map(|p| p.request.clone())
    }

    /// Cancel the running turn. Returns `false` if nothing was running.
    pub fn cancel_current_turn(&self) -> bool {
        let cancelled = self.run.cancel_current();
        if cancelled {
            info!("Cancellation requested");
        }
        cancelled
    }

    pub async fn brief_document(&self, document: &Document) -> Result<DocumentId, SwarmError> {
        let token = self.run.begin();
        let result = self.swarm().brief(document, &token).await;
        self.use_case
            .progress()
            .on_document_briefed(&document.id, result.is_ok());
        result
    }

    /// Brief a batch of documents. Documents that fail are reported through
    /// progress and left out of the returned ids.
    pub async fn brief_documents(
        &self,
        documents: &[Document],
    ) -> Result<Vec<DocumentId>, SwarmError> {
        let token = self.run.begin();
        let briefed = self.swarm().brief_all(documents, &token).await?;
        for document in documents {
            self.use_case
                .progress()
                .on_document_briefed(&document.id, briefed.contains(&document.id));
        }
        Ok(briefed)
    }

    pub async fn remove_document(&self, document_id: &DocumentId) -> bool {
        self.swarm().remove(document_id).await
    }

    pub async fn list_active_agents(&self) -> Vec<DocumentId> {
        self.swarm().list().await
    }

    /// Snapshot of the conversation so far
    pub fn history(&self) -> Vec<ConversationTurn> {
        self.history.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn clear_history(&self) {
        self.history.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    async fn run_turn(&self, query: &str, token: &CancellationToken) -> TurnOutcome {
        let history = self.history();
        match self.use_case.execute(query, &history, token).await {
            // A superseded run's results are discarded
            Ok(_) if token.is_cancelled() => self.fail(SwarmError::Cancelled),
            Ok(report) => {
                {
                    let mut history = self.history.lock().unwrap_or_else(|e| e.into_inner());
                    history.push(ConversationTurn::user(query));
                    history.push(ConversationTurn::assistant(report.result.report.clone()));
                }
                self.use_case.progress().on_phase_change(&TurnPhase::Done);
                TurnOutcome::Completed(Box::new(report))
            }
            Err(e) => self.fail(e),
        }
    }

    fn fail(&self, e: SwarmError) -> TurnOutcome {
        if e.is_cancelled() {
            info!("Turn stopped");
            self.use_case.progress().on_phase_change(&TurnPhase::Cancelled);
            TurnOutcome::Stopped
        } else {
            error!("Turn failed: {}", e);
            self.use_case.progress().on_phase_change(&TurnPhase::Failed);
            TurnOutcome::Failed(e.to_string())
        }
    }

    fn pending_slot(&self) -> std::sync::MutexGuard<'_, Option<PendingClarification>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}
