//! Clarification domain
//!
//! Disambiguating questions asked before planning, and the user's answers.

pub mod answers;
pub mod request;

pub use answers::{ClarificationAnswers, ClarificationError};
pub use request::{ClarificationRequest, Question, QuestionOption};
