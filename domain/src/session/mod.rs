//! Conversation history domain.
//!
//! - [`entities::ConversationTurn`]: one user or assistant message of the chat
//! - [`entities::render_history`]: the recent-history block embedded in prompts

pub mod entities;
