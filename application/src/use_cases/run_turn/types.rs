//! Type definitions for the RunTurn use case.

use crate::ports::llm_gateway::GatewayError;
use serde::Serialize;
use swarm_domain::{
    ClarificationRequest, CollaborationRecord, DocumentId, DomainError, Plan, Task, TurnResult,
};
use thiserror::Error;

/// Errors that can occur during a turn
#[derive(Error, Debug, Clone)]
pub enum SwarmError {
    #[error("Remote service still unavailable after {attempts} attempts: {message}")]
    TransientRemoteFailure { attempts: u32, message: String },

    #[error("Remote call failed: {0}")]
    PermanentRemoteFailure(GatewayError),

    #[error("Unparsable model output: {0}")]
    UnparsableOutput(String),

    #[error("No agent is briefed for document '{0}'")]
    AgentUnavailable(DocumentId),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Planning failed: {0}")]
    PlanningFailed(String),

    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    #[error("No documents have been briefed")]
    NoDocuments,

    #[error(transparent)]
    Domain(DomainError),
}

impl SwarmError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SwarmError::Cancelled)
    }
}

impl From<DomainError> for SwarmError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::UnparsableOutput(text) => SwarmError::UnparsableOutput(text),
            DomainError::Cancelled => SwarmError::Cancelled,
            other => SwarmError::Domain(other),
        }
    }
}

/// Answer (or isolated failure) of one plan task
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskOutcome {
    pub task: Task,
    pub result: Result<String, String>,
}

impl TaskOutcome {
    pub fn success(task: Task, answer: impl Into<String>) -> Self {
        Self {
            task,
            result: Ok(answer.into()),
        }
    }

    pub fn failure(task: Task, error: impl Into<String>) -> Self {
        Self {
            task,
            result: Err(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Block handed to the synthesizer; failures become inline error text.
    pub fn to_evidence(&self) -> String {
        let answer = match &self.result {
            Ok(answer) => answer.clone(),
            Err(error) => format!("ERROR: the agent could not answer ({})", error),
        };
        format!(
            "### {}\nQuestion: {}\nAnswer:\n{}",
            self.task.document, self.task.question, answer
        )
    }
}

/// Everything a completed turn produced
#[derive(Debug, Clone, Serialize)]
pub struct TurnReport {
    pub result: TurnResult,
    /// The plan that produced `result`
    pub plan: Plan,
    pub collaboration: CollaborationRecord,
    pub task_outcomes: Vec<TaskOutcome>,
    /// Number of execute/synthesize/audit cycles that ran
    pub audit_attempts: usize,
}

/// Result of submitting a query or clarification answers
#[derive(Debug, Clone)]
pub enum TurnOutcome {
    /// The turn is paused until the user answers these questions
    Clarification(ClarificationRequest),
    Completed(Box<TurnReport>),
    /// Cancelled by the user
    Stopped,
    Failed(String),
}

impl TurnOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, TurnOutcome::Completed(_))
    }
}
