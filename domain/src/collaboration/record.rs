use crate::plan::{OutputVerdict, Plan, PlanVerdict};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryKind {
    PlanProposal,
    PlanCritique,
    OutputAudit,
}

impl EntryKind {
    pub fn as_str(&self) -> &str {
        match self {
            EntryKind::PlanProposal => "PLAN_PROPOSAL",
            EntryKind::PlanCritique => "PLAN_CRITIQUE",
            EntryKind::OutputAudit => "OUTPUT_AUDIT",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CollaborationPayload {
    Plan(Plan),
    PlanVerdict(PlanVerdict),
    OutputVerdict(OutputVerdict),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaborationEntry {
    pub kind: EntryKind,
    pub round: usize,
    pub payload: CollaborationPayload,
    pub timestamp: DateTime<Utc>,
}

/// Append-only; entries are never edited or removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollaborationRecord {
    entries: Vec<CollaborationEntry>,
}

impl CollaborationRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_proposal(&mut self, round: usize, plan: &Plan) -> &CollaborationEntry {
        self.push(EntryKind::PlanProposal, round, CollaborationPayload::Plan(plan.clone()))
    }

    pub fn record_critique(&mut self, round: usize, verdict: &PlanVerdict) -> &CollaborationEntry {
        self.push(
            EntryKind::PlanCritique,
            round,
            CollaborationPayload::PlanVerdict(verdict.clone()),
        )
    }

    pub fn record_audit(&mut self, round: usize, verdict: &OutputVerdict) -> &CollaborationEntry {
        self.push(
            EntryKind::OutputAudit,
            round,
            CollaborationPayload::OutputVerdict(verdict.clone()),
        )
    }

    fn push(&mut self, kind: EntryKind, round: usize, payload: CollaborationPayload) -> &CollaborationEntry {
        self.entries.push(CollaborationEntry {
            kind,
            round,
            payload,
            timestamp: Utc::now(),
        });
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[CollaborationEntry] {
        &self.entries
    }

    pub fn of_kind(&self, kind: EntryKind) -> impl Iterator<Item = &CollaborationEntry> {
        self.entries.iter().filter(move |e| e.kind == kind)
    }

    pub fn count(&self, kind: EntryKind) -> usize {
        self.of_kind(kind).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
