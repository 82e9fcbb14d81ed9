//! Plan domain entities

use crate::document::DocumentId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Classification of a query, decided once per planning attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanType {
    /// Retrieval or summary of facts
    SimpleFact,
    /// Comparison, thematic synthesis, multi-document reasoning
    DeepAnalysis,
}

impl PlanType {
    pub fn as_str(&self) -> &str {
        match self {
            PlanType::SimpleFact => "SIMPLE_FACT",
            PlanType::DeepAnalysis => "DEEP_ANALYSIS",
        }
    }

    /// Lenient parse of the planner's label.
    pub fn parse_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_uppercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "SIMPLE_FACT" | "SIMPLE" | "FACT" => Some(PlanType::SimpleFact),
            "DEEP_ANALYSIS" | "DEEP" | "ANALYSIS" => Some(PlanType::DeepAnalysis),
            _ => None,
        }
    }
}

impl std::fmt::Display for PlanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single question routed to one document agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Document whose agent answers this task
    pub document: DocumentId,
    /// The specific question to ask
    pub question: String,
    /// Why the planner wants this answered
    pub rationale: String,
}

impl Task {
    pub fn new(
        document: impl Into<DocumentId>,
        question: impl Into<String>,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            document: document.into(),
            question: question.into(),
            rationale: rationale.into(),
        }
    }
}

/// A titled group of tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    pub title: String,
    pub description: String,
    pub tasks: Vec<Task>,
}

impl PlanStep {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            tasks: Vec::new(),
        }
    }

    pub fn with_task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }
}

/// A structured multi-step plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub plan_type: PlanType,
    /// Why the planner chose this breakdown
    pub reasoning: String,
    /// Strategy explanation, also fed to the synthesizer
    pub strategy: String,
    pub steps: Vec<PlanStep>,
}

impl Plan {
    pub fn new(
        plan_type: PlanType,
        reasoning: impl Into<String>,
        strategy: impl Into<String>,
    ) -> Self {
        Self {
            plan_type,
            reasoning: reasoning.into(),
            strategy: strategy.into(),
            steps: Vec::new(),
        }
    }

    pub fn with_step(mut self, step: PlanStep) -> Self {
        self.steps.push(step);
        self
    }

    /// All tasks across all steps, in plan order
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.steps.iter().flat_map(|step| step.tasks.iter())
    }

    pub fn task_count(&self) -> usize {
        self.steps.iter().map(|step| step.tasks.len()).sum()
    }

    pub fn has_tasks(&self) -> bool {
        self.task_count() > 0
    }

    /// Documents addressed by at least one task
    pub fn targeted_documents(&self) -> BTreeSet<&DocumentId> {
        self.tasks().map(|task| &task.document).collect()
    }

    /// Only deep-analysis plans that actually dispatch work are reviewed.
    pub fn requires_review(&self) -> bool {
        self.plan_type == PlanType::DeepAnalysis && self.has_tasks()
    }

    /// Compact rendering used inside prompts.
    pub fn to_prompt_text(&self) -> String {
        let mut out = format!(
            "Plan type: {}\nReasoning: {}\nStrategy: {}\n",
            self.plan_type, self.reasoning, self.strategy
        );
        for (i, step) in self.steps.iter().enumerate() {
            out.push_str(&format!(
                "\nStep {}: {}\n  {}\n",
                i + 1,
                step.title,
                step.description
            ));
            for task in &step.tasks {
                out.push_str(&format!(
                    "  - [{}] {} (rationale: {})\n",
                    task.document, task.question, task.rationale
                ));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_doc_plan() -> Plan {
        Plan::new(PlanType::DeepAnalysis, "r", "s")
            .with_step(
                PlanStep::new("Extract", "Pull revenue figures")
                    .with_task(Task::new("Doc1.pdf", "What was revenue in 2023?", "baseline"))
                    .with_task(Task::new("Doc2.pdf", "What was revenue in 2023?", "baseline")),
            )
            .with_step(PlanStep::new("Compare", "Contrast the trends"))
    }

    #[test]
    fn test_task_flattening() {
        let plan = two_doc_plan();
        assert_eq!(plan.task_count(), 2);
        assert_eq!(plan.tasks().count(), 2);
        assert_eq!(plan.targeted_documents().len(), 2);
    }

    #[test]
    fn test_requires_review() {
        assert!(two_doc_plan().requires_review());

        let simple = Plan::new(PlanType::SimpleFact, "r", "s").with_step(
            PlanStep::new("Look up", "").with_task(Task::new("a.txt", "What is X?", "")),
        );
        assert!(!simple.requires_review());

        let empty = Plan::new(PlanType::DeepAnalysis, "answered in history", "reuse");
        assert!(!empty.requires_review());
    }

    #[test]
    fn test_plan_type_labels() {
        assert_eq!(PlanType::parse_label("deep-analysis"), Some(PlanType::DeepAnalysis));
        assert_eq!(PlanType::parse_label("Simple Fact"), Some(PlanType::SimpleFact));
        assert_eq!(PlanType::parse_label("other"), None);
        assert_eq!(
            serde_json::to_string(&PlanType::DeepAnalysis).unwrap(),
            "\"DEEP_ANALYSIS\""
        );
    }

    #[test]
    fn test_prompt_text_lists_tasks() {
        let text = two_doc_plan().to_prompt_text();
        assert!(text.contains("Step 1: Extract"));
        assert!(text.contains("[Doc2.pdf] What was revenue in 2023?"));
    }
}
