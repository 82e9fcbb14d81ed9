//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod agent_swarm;
pub mod retry;
pub mod run_control;
pub mod run_turn;
pub(crate) mod shared;
pub mod turn_controller;
