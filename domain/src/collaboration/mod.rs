//! Collaboration record: the append-only log of plan proposals, critiques and
//! output audits produced during one turn.
//!
//! The record exists for observability and replay. Control flow never reads it.

pub mod record;

pub use record::{CollaborationEntry, CollaborationPayload, CollaborationRecord, EntryKind};
