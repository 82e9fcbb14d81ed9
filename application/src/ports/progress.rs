//! Turn progress port
//!
//! [`TurnProgressNotifier`] is an **output port** that the presentation layer
//! implements to display what the swarm is doing. All callback argument types
//! come from the domain layer, and every method defaults to a no-op so
//! implementers only override what they display.

use swarm_domain::{ClarificationRequest, DocumentId, OutputVerdict, Plan, PlanVerdict, Task, TurnPhase};

pub trait TurnProgressNotifier: Send + Sync {
    /// Called when the turn enters a new phase
    fn on_phase_change(&self, _phase: &TurnPhase) {}

    /// Called when a document agent has been briefed (or failed to be)
    fn on_document_briefed(&self, _document: &DocumentId, _success: bool) {}

    /// Called when the turn pauses for clarification
    fn on_clarification_requested(&self, _request: &ClarificationRequest) {}

    /// Called for every plan produced, including refinements
    fn on_plan_proposed(&self, _round: usize, _plan: &Plan) {}

    /// Called with each Plan Review Board verdict
    fn on_plan_verdict(&self, _round: usize, _verdict: &PlanVerdict) {}

    /// Called before tasks are dispatched
    fn on_execution_start(&self, _task_count: usize) {}

    /// Called when a task is dispatched to its agent
    fn on_task_start(&self, _task: &Task) {}

    /// Called when a task completes (success or failure)
    fn on_task_complete(&self, _task: &Task, _success: bool) {}

    /// Called with each Output Review Board verdict
    fn on_audit_verdict(&self, _attempt: usize, _verdict: &OutputVerdict) {}
}

/// No-op progress notifier for tests and quiet mode
pub struct NoTurnProgress;

impl TurnProgressNotifier for NoTurnProgress {}
