//! Orchestration domain
//!
//! The phases a user turn moves through; used by progress notifications.

pub mod phase;

pub use phase::TurnPhase;
