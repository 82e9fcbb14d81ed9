//! Gemini adapter
//!
//! Implements the gateway port over the Gemini REST API: one-shot
//! `generate` calls with optional response schema and thinking budget, and
//! client-side conversational sessions for document agents.

mod client;
pub mod gateway;
mod session;
pub mod types;

pub use gateway::GeminiGateway;
pub use session::GeminiSession;
