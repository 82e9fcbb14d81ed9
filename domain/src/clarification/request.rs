//! Clarification request produced by the clarification gate

use serde::{Deserialize, Serialize};

/// One selectable answer to a [`Question`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: String,
    pub text: String,
    /// Selecting this option requires the user to type their own answer
    #[serde(default, alias = "is_freeform", alias = "freeform")]
    pub is_freeform_slot: bool,
}

impl QuestionOption {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            is_freeform_slot: false,
        }
    }

    pub fn freeform(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            is_freeform_slot: true,
            ..Self::new(id, text)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub allows_multiple: bool,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
}

impl Question {
    pub fn single(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            allows_multiple: false,
            options: Vec::new(),
        }
    }

    pub fn multiple(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            allows_multiple: true,
            ..Self::single(id, text)
        }
    }

    pub fn with_option(mut self, option: QuestionOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn option(&self, option_id: &str) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.id == option_id)
    }
}

/// Output of the clarification gate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClarificationRequest {
    #[serde(default)]
    pub needs_clarification: bool,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl ClarificationRequest {
    /// The query is specific enough to plan directly.
    pub fn not_needed() -> Self {
        Self::default()
    }

    pub fn with_questions(questions: Vec<Question>) -> Self {
        Self {
            needs_clarification: true,
            questions,
        }
    }

    /// The turn pauses only when clarification is requested and there is
    /// something to ask.
    pub fn should_pause(&self) -> bool {
        self.needs_clarification && !self.questions.is_empty()
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }
}
