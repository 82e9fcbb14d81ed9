//! Documents briefed into the swarm.
//!
//! A [`Document`] is plain data handed over by the presentation layer; the
//! application layer turns each one into a conversational agent.

pub mod entities;

pub use entities::{Document, DocumentId};
