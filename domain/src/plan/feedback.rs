//! Failure feedback folded into a re-plan prompt

use super::entities::Plan;
use super::verdict::{OutputVerdict, PlanVerdict};
use serde::{Deserialize, Serialize};

/// Why the previous plan is being replaced, plus the plan itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureFeedback {
    pub directive: String,
    pub rejected_plan: Plan,
}

impl FailureFeedback {
    pub fn new(directive: impl Into<String>, rejected_plan: Plan) -> Self {
        Self {
            directive: directive.into(),
            rejected_plan,
        }
    }

    /// Feedback from a rejected Plan Review Board verdict.
    pub fn from_plan_verdict(verdict: &PlanVerdict, plan: &Plan) -> Self {
        Self::new(verdict.as_feedback(), plan.clone())
    }

    /// Keep an earlier directive (e.g. an audit remediation) ahead of this
    /// one so later refinements still see it.
    pub fn carrying(mut self, earlier: Option<&FailureFeedback>) -> Self {
        if let Some(earlier) = earlier
            && !self.directive.contains(&earlier.directive)
        {
            self.directive = format!("{}\n\n{}", earlier.directive, self.directive);
        }
        self
    }

    /// Feedback from a rejected output audit.
    pub fn from_output_verdict(verdict: &OutputVerdict, plan: &Plan) -> Self {
        Self::new(verdict.as_feedback(), plan.clone())
    }
}
