//! Turn state machine phases

use serde::{Deserialize, Serialize};

/// Phase of one user turn.
///
/// `CLARIFY? → PLAN → [REVIEW ⟲ PLAN]* → EXECUTE → SYNTHESIZE → AUDIT → DONE`,
/// with `Cancelled` and `Failed` as the other terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    Clarify,
    Plan,
    Review,
    Execute,
    Synthesize,
    Audit,
    Done,
    Cancelled,
    Failed,
}

impl TurnPhase {
    pub fn as_str(&self) -> &str {
        match self {
            TurnPhase::Clarify => "clarify",
            TurnPhase::Plan => "plan",
            TurnPhase::Review => "review",
            TurnPhase::Execute => "execute",
            TurnPhase::Synthesize => "synthesize",
            TurnPhase::Audit => "audit",
            TurnPhase::Done => "done",
            TurnPhase::Cancelled => "cancelled",
            TurnPhase::Failed => "failed",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            TurnPhase::Clarify => "Clarification",
            TurnPhase::Plan => "Planning",
            TurnPhase::Review => "Plan Review",
            TurnPhase::Execute => "Task Execution",
            TurnPhase::Synthesize => "Synthesis",
            TurnPhase::Audit => "Output Audit",
            TurnPhase::Done => "Done",
            TurnPhase::Cancelled => "Stopped",
            TurnPhase::Failed => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnPhase::Done | TurnPhase::Cancelled | TurnPhase::Failed)
    }
}

impl std::fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
