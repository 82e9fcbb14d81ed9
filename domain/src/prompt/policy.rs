//! Configurable policy wording embedded in prompts

use serde::{Deserialize, Serialize};

/// Free-text policies handed to the remote model.
///
/// The clarification policy decides vague vs. specific queries; the review
/// and audit policies steer the holistic judgments that run after the local
/// heuristics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyText {
    pub clarification: String,
    pub plan_review: String,
    pub audit: String,
}

impl Default for PolicyText {
    fn default() -> Self {
        Self {
            clarification: r#"Ask for clarification only when the query is vague enough that different readings would lead to materially different reports (e.g. "summarize", "compare them", "what do these say").
For such queries return 3-4 questions. Each question is single- or multi-select with 3-5 options; add a free-form option ("Other") when the listed options may not cover the user's intent.
For specific queries (named figures, named sections, a concrete comparison) return needs_clarification = false and no questions."#
                .to_string(),
            plan_review: r#"Approve the plan only if executing it would gather every fact needed to answer the query.
Reject plans that skip a relevant document, ask questions an agent could answer in more than one way, or whose strategy does not explain how the answers will be combined."#
                .to_string(),
            audit: r#"Approve the report only if it answers the query that was asked and every conclusion follows from the cited evidence.
Set missing_data_suspected when the report claims data is absent or "not found" although the documents plausibly contain it.
When rejecting, give remediation as concrete instructions for a new plan (which document to ask, and what)."#
                .to_string(),
        }
    }
}
