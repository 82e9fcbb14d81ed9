//! Review verdicts
//!
//! Verdicts are parsed from schema-constrained JSON. Parsing is lenient about
//! label spelling (`APPROVE`, `approved`, `REVISE`…) but fails on anything
//! that carries no decision at all; callers decide whether to default.

use super::heuristics::HeuristicFinding;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Decision of a review board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewOutcome {
    Approved,
    Rejected,
}

impl ReviewOutcome {
    pub fn is_approved(&self) -> bool {
        matches!(self, ReviewOutcome::Approved)
    }

    pub fn as_str(&self) -> &str {
        match self {
            ReviewOutcome::Approved => "APPROVED",
            ReviewOutcome::Rejected => "REJECTED",
        }
    }

    fn parse_label(label: &str) -> Option<Self> {
        let upper = label.trim().to_uppercase();
        if upper.starts_with("APPROVE") || upper == "PASS" {
            Some(ReviewOutcome::Approved)
        } else if upper.starts_with("REJECT") || upper.starts_with("REVISE") || upper == "FAIL" {
            Some(ReviewOutcome::Rejected)
        } else {
            None
        }
    }
}

impl std::fmt::Display for ReviewOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn outcome_field(value: &Value) -> Result<ReviewOutcome, DomainError> {
    let label = value
        .get("verdict")
        .or_else(|| value.get("outcome"))
        .or_else(|| value.get("status"))
        .and_then(Value::as_str)
        .ok_or_else(|| DomainError::UnparsableOutput("verdict field missing".to_string()))?;
    ReviewOutcome::parse_label(label)
        .ok_or_else(|| DomainError::UnparsableOutput(format!("unknown verdict '{}'", label)))
}

fn text_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Verdict of one Plan Review Board round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanVerdict {
    pub outcome: ReviewOutcome,
    pub critique: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<String>,
}

impl PlanVerdict {
    pub fn approved(critique: impl Into<String>) -> Self {
        Self {
            outcome: ReviewOutcome::Approved,
            critique: critique.into(),
            directives: Vec::new(),
        }
    }

    pub fn rejected(critique: impl Into<String>, directives: Vec<String>) -> Self {
        Self {
            outcome: ReviewOutcome::Rejected,
            critique: critique.into(),
            directives,
        }
    }

    /// Rejection assembled from deterministic heuristic findings.
    ///
    /// Returns `None` when there are no findings.
    pub fn from_findings(findings: &[HeuristicFinding]) -> Option<Self> {
        if findings.is_empty() {
            return None;
        }
        let critique = findings
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        let directives = findings.iter().map(HeuristicFinding::directive).collect();
        Some(Self::rejected(critique, directives))
    }

    /// Parse the reviewer's JSON (`verdict`, `critique`, `directives`).
    pub fn from_value(value: &Value) -> Result<Self, DomainError> {
        let outcome = outcome_field(value)?;
        let critique = text_field(value, &["critique", "reasoning", "feedback"]).unwrap_or_default();
        let directives = value
            .get("directives")
            .or_else(|| value.get("improvement_directives"))
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Ok(Self {
            outcome,
            critique,
            directives,
        })
    }

    pub fn is_approved(&self) -> bool {
        self.outcome.is_approved()
    }

    /// Feedback text folded into the next planning prompt.
    pub fn as_feedback(&self) -> String {
        let mut feedback = format!("The review board rejected the plan: {}", self.critique);
        if !self.directives.is_empty() {
            feedback.push_str("\nRequired improvements:");
            for directive in &self.directives {
                feedback.push_str(&format!("\n- {}", directive));
            }
        }
        feedback
    }
}

/// Verdict of the Output Review Board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputVerdict {
    pub outcome: ReviewOutcome,
    pub quality: String,
    pub missing_data_suspected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl OutputVerdict {
    pub fn approved(quality: impl Into<String>) -> Self {
        Self {
            outcome: ReviewOutcome::Approved,
            quality: quality.into(),
            missing_data_suspected: false,
            remediation: None,
        }
    }

    pub fn rejected(
        quality: impl Into<String>,
        missing_data_suspected: bool,
        remediation: Option<String>,
    ) -> Self {
        Self {
            outcome: ReviewOutcome::Rejected,
            quality: quality.into(),
            missing_data_suspected,
            remediation,
        }
    }

    /// Parse the auditor's JSON (`verdict`, `quality`, `missing_data_suspected`, `remediation`).
    pub fn from_value(value: &Value) -> Result<Self, DomainError> {
        let outcome = outcome_field(value)?;
        let quality = text_field(value, &["quality", "assessment", "critique"]).unwrap_or_default();
        let missing_data_suspected = value
            .get("missing_data_suspected")
            .or_else(|| value.get("missing_data_suspicion"))
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let remediation = text_field(value, &["remediation", "remediation_text"]);
        Ok(Self {
            outcome,
            quality,
            missing_data_suspected,
            remediation,
        })
    }

    pub fn is_approved(&self) -> bool {
        self.outcome.is_approved()
    }

    /// Failure feedback for the re-plan cycle.
    pub fn as_feedback(&self) -> String {
        let mut feedback = format!("The previous report was rejected by the auditor: {}", self.quality);
        if self.missing_data_suspected {
            feedback.push_str(
                "\nThe auditor suspects data was reported as missing although the documents likely contain it.",
            );
        }
        if let Some(ref remediation) = self.remediation {
            feedback.push_str(&format!("\nRemediation: {}", remediation));
        }
        feedback
    }
}
