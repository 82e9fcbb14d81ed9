//! Terminal artifact of one user turn

use super::citation::{Citation, citations};
use serde::{Deserialize, Serialize};

const REASONING_OPEN: &str = "<reasoning>";
const REASONING_CLOSE: &str = "</reasoning>";

/// Synthesizer output split into the reasoning trace and the visible report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResult {
    pub reasoning: String,
    pub report: String,
}

impl TurnResult {
    pub fn new(reasoning: impl Into<String>, report: impl Into<String>) -> Self {
        Self {
            reasoning: reasoning.into(),
            report: report.into(),
        }
    }

    /// Separate the leading `<reasoning>` block from the report.
    ///
    /// Output without the block is all report. An unterminated block runs to
    /// the first blank line.
    pub fn from_model_output(text: &str) -> Self {
        let trimmed = text.trim_start();
        let Some(after_open) = strip_prefix_ignore_case(trimmed, REASONING_OPEN) else {
            return Self::new("", trimmed.trim_end());
        };

        if let Some(close) = find_ignore_case(after_open, REASONING_CLOSE) {
            let reasoning = after_open[..close].trim();
            let report = after_open[close + REASONING_CLOSE.len()..].trim();
            return Self::new(reasoning, report);
        }

        match after_open.find("\n\n") {
            Some(split) => Self::new(after_open[..split].trim(), after_open[split..].trim()),
            None => Self::new(after_open.trim(), ""),
        }
    }

    pub fn citations(&self) -> Vec<Citation> {
        citations(&self.report)
    }

    pub fn is_empty(&self) -> bool {
        self.report.trim().is_empty()
    }
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    // Tags are ASCII, so lowercasing preserves byte offsets.
    haystack.to_ascii_lowercase().find(needle)
}
