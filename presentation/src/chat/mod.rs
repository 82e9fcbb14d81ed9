//! Interactive chat module
//!
//! Provides a line-editor based chat interface over a [`TurnController`].
//!
//! [`TurnController`]: swarm_application::TurnController

mod clarify;
mod repl;

pub use clarify::{ClarificationPrompt, Selection, parse_selection};
pub use repl::{ChatRepl, run_turn_interactive};
