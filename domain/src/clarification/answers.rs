//! User answers to a clarification request

use super::request::{ClarificationRequest, Question};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClarificationError {
    #[error("No clarification is pending")]
    NotPending,

    #[error("Unknown question: {0}")]
    UnknownQuestion(String),

    #[error("Question '{question}' has no option '{option}'")]
    UnknownOption { question: String, option: String },

    #[error("Question '{0}' requires exactly one selection")]
    ExactlyOneRequired(String),

    #[error("Question '{0}' requires at least one selection")]
    SelectionRequired(String),

    #[error("Question '{0}' needs text for the free-form answer")]
    FreeformTextRequired(String),
}

/// Selection state per question.
///
/// Single-choice questions hold at most one option (selecting replaces);
/// multi-choice questions toggle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClarificationAnswers {
    selections: BTreeMap<String, Vec<String>>,
    freeform: BTreeMap<String, String>,
}

impl ClarificationAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, question: &Question, option_id: &str) -> Result<(), ClarificationError> {
        if question.option(option_id).is_none() {
            return Err(ClarificationError::UnknownOption {
                question: question.id.clone(),
                option: option_id.to_string(),
            });
        }

        let selected = self.selections.entry(question.id.clone()).or_default();
        if question.allows_multiple {
            if let Some(pos) = selected.iter().position(|id| id == option_id) {
                selected.remove(pos);
            } else {
                selected.push(option_id.to_string());
            }
        } else {
            selected.clear();
            selected.push(option_id.to_string());
        }
        Ok(())
    }

    pub fn set_freeform(&mut self, question_id: impl Into<String>, text: impl Into<String>) {
        self.freeform.insert(question_id.into(), text.into());
    }

    pub fn selected(&self, question_id: &str) -> &[String] {
        self.selections
            .get(question_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn freeform_text(&self, question_id: &str) -> Option<&str> {
        self.freeform
            .get(question_id)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    /// Check the answers are complete for `request`.
    pub fn validate(&self, request: &ClarificationRequest) -> Result<(), ClarificationError> {
        for question_id in self.selections.keys().chain(self.freeform.keys()) {
            if request.question(question_id).is_none() {
                return Err(ClarificationError::UnknownQuestion(question_id.clone()));
            }
        }

        for question in &request.questions {
            let selected = self.selected(&question.id);
            for option_id in selected {
                if question.option(option_id).is_none() {
                    return Err(ClarificationError::UnknownOption {
                        question: question.id.clone(),
                        option: option_id.clone(),
                    });
                }
            }

            if question.allows_multiple {
                if selected.is_empty() {
                    return Err(ClarificationError::SelectionRequired(question.id.clone()));
                }
            } else if selected.len() != 1 {
                return Err(ClarificationError::ExactlyOneRequired(question.id.clone()));
            }

            let wants_freeform = selected
                .iter()
                .filter_map(|id| question.option(id))
                .any(|o| o.is_freeform_slot);
            if wants_freeform && self.freeform_text(&question.id).is_none() {
                return Err(ClarificationError::FreeformTextRequired(question.id.clone()));
            }
        }
        Ok(())
    }

    /// Render the synthetic block appended to the original query.
    pub fn to_prompt_block(&self, request: &ClarificationRequest) -> String {
        let mut out = String::from("[Clarification]\n");
        for question in &request.questions {
            let answers: Vec<String> = self
                .selected(&question.id)
                .iter()
                .filter_map(|id| question.option(id))
                .map(|option| {
                    if option.is_freeform_slot {
                        self.freeform_text(&question.id)
                            .unwrap_or(&option.text)
                            .to_string()
                    } else {
                        option.text.clone()
                    }
                })
                .collect();
            out.push_str(&format!("- {}: {}\n", question.text, answers.join("; ")));
        }
        out
    }
}
