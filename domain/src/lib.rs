//! Domain layer for doc-swarm
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Swarm
//!
//! One conversational agent per briefed [`Document`]. A planner breaks the
//! user's question into per-document [`Task`]s; agents answer in parallel and
//! a synthesizer merges the answers into a cited [`TurnResult`].
//!
//! ## Review boards
//!
//! - **Plan Review Board**: local [`PlanHeuristics`] first, then a holistic
//!   remote judgment, producing a [`PlanVerdict`]
//! - **Output Review Board**: audits the report, producing an [`OutputVerdict`]
//!
//! Every proposal and verdict lands in the append-only [`CollaborationRecord`].

pub mod clarification;
pub mod collaboration;
pub mod config;
pub mod core;
pub mod document;
pub mod orchestration;
pub mod parsing;
pub mod plan;
pub mod prompt;
pub mod report;
pub mod session;

// Re-export commonly used types
pub use clarification::{
    ClarificationAnswers, ClarificationError, ClarificationRequest, Question, QuestionOption,
};
pub use collaboration::{CollaborationEntry, CollaborationPayload, CollaborationRecord, EntryKind};
pub use config::{ConfigIssue, ConfigIssueCode, ModelConfig, OutputFormat, Severity};
pub use core::{error::DomainError, model::Model};
pub use document::{Document, DocumentId};
pub use orchestration::TurnPhase;
pub use parsing::{parse_structured, parse_structured_as};
pub use plan::{
    FailureFeedback, HeuristicFinding, OutputVerdict, Plan, PlanHeuristics, PlanStep, PlanType,
    PlanVerdict, ReviewOutcome, Task, parse_plan, parse_plan_value,
};
pub use prompt::{PolicyText, SwarmPromptTemplate};
pub use report::{Citation, Segment, TurnResult};
pub use session::entities::{ConversationTurn, Role, render_history};
