//! Deterministic plan rejection heuristics.
//!
//! The Plan Review Board runs these before asking a reviewer model for a
//! holistic judgment. Any finding rejects the plan outright. Keyword lists
//! are data so deployments can tune the wording without code changes.

use super::entities::Plan;
use crate::core::string::{contains_any, word_count};
use crate::document::DocumentId;
use serde::{Deserialize, Serialize};

/// A single heuristic violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeuristicFinding {
    /// The query implies comparison or multi-part reasoning but the plan has one step.
    SingleStepForComplexQuery,
    /// Relevant documents that no task addresses.
    UnqueriedDocuments(Vec<DocumentId>),
    /// A task question too vague for a document agent to answer precisely.
    VagueTaskQuestion {
        document: DocumentId,
        question: String,
    },
    /// The strategy explanation says nothing specific.
    GenericStrategy,
}

impl HeuristicFinding {
    /// Improvement directive handed back to the planner.
    pub fn directive(&self) -> String {
        match self {
            HeuristicFinding::SingleStepForComplexQuery => {
                "Split the work into separate extraction and comparison/synthesis steps.".to_string()
            }
            HeuristicFinding::UnqueriedDocuments(docs) => format!(
                "Add tasks that query {}.",
                docs.iter()
                    .map(DocumentId::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            HeuristicFinding::VagueTaskQuestion { document, .. } => format!(
                "Rewrite the question for {} to name the exact figures, sections or facts needed.",
                document
            ),
            HeuristicFinding::GenericStrategy => {
                "Explain the strategy in terms of this query's documents and data points.".to_string()
            }
        }
    }
}

impl std::fmt::Display for HeuristicFinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeuristicFinding::SingleStepForComplexQuery => {
                write!(f, "Single-step plan for a query that requires comparison or synthesis.")
            }
            HeuristicFinding::UnqueriedDocuments(docs) => write!(
                f,
                "Relevant documents are never queried: {}.",
                docs.iter()
                    .map(DocumentId::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            HeuristicFinding::VagueTaskQuestion { document, question } => {
                write!(f, "Non-specific question for {}: \"{}\".", document, question)
            }
            HeuristicFinding::GenericStrategy => write!(f, "Strategy explanation is generic."),
        }
    }
}

/// Tunable parameters for the four rejection heuristics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanHeuristics {
    /// Phrases that mark a query as comparative or complex
    pub complexity_keywords: Vec<String>,
    /// Phrases that make a task question non-specific
    pub vague_question_phrases: Vec<String>,
    /// Questions with fewer words than this are non-specific
    pub min_question_words: usize,
    /// Phrases that make a strategy generic
    pub generic_strategy_phrases: Vec<String>,
    /// Strategies with fewer words than this are generic
    pub min_strategy_words: usize,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for PlanHeuristics {
    fn default() -> Self {
        Self {
            complexity_keywords: strings(&[
                "compare",
                "comparison",
                "versus",
                " vs ",
                " vs.",
                "difference",
                "differ",
                "contrast",
                "across",
                "both",
                "trends",
                "relationship",
                "similarities",
                "between",
                "each document",
                "all documents",
                "all the documents",
            ]),
            vague_question_phrases: strings(&[
                "summarize the document",
                "summarize this document",
                "what does it say",
                "what does the document say",
                "tell me about",
                "anything relevant",
                "any relevant information",
                "what is in the document",
                "give an overview",
            ]),
            min_question_words: 5,
            generic_strategy_phrases: strings(&[
                "analyze the documents",
                "analyze the document",
                "gather information",
                "gather relevant information",
                "query the agents",
                "ask the agents",
                "look at the documents",
                "review the documents",
                "find the answer",
                "answer the question",
            ]),
            min_strategy_words: 8,
        }
    }
}

impl PlanHeuristics {
    /// Whether the query implies comparison or multi-part reasoning.
    pub fn implies_complexity(&self, query: &str, available: &[DocumentId]) -> bool {
        contains_any(query, &self.complexity_keywords) || mentioned_documents(query, available).len() > 1
    }

    /// Run all four heuristics; an empty result means none fired.
    pub fn evaluate(&self, query: &str, plan: &Plan, available: &[DocumentId]) -> Vec<HeuristicFinding> {
        let mut findings = Vec::new();
        let complex = self.implies_complexity(query, available);

        if complex && plan.steps.len() == 1 {
            findings.push(HeuristicFinding::SingleStepForComplexQuery);
        }

        let unqueried = self.unqueried_documents(query, plan, available, complex);
        if !unqueried.is_empty() {
            findings.push(HeuristicFinding::UnqueriedDocuments(unqueried));
        }

        for task in plan.tasks() {
            if self.is_vague_question(&task.question) {
                findings.push(HeuristicFinding::VagueTaskQuestion {
                    document: task.document.clone(),
                    question: task.question.clone(),
                });
            }
        }

        if self.is_generic_strategy(&plan.strategy) {
            findings.push(HeuristicFinding::GenericStrategy);
        }

        findings
    }

    fn unqueried_documents(
        &self,
        query: &str,
        plan: &Plan,
        available: &[DocumentId],
        complex: bool,
    ) -> Vec<DocumentId> {
        let mentioned = mentioned_documents(query, available);
        let relevant: Vec<&DocumentId> = if !mentioned.is_empty() {
            mentioned
        } else if complex {
            available.iter().collect()
        } else {
            Vec::new()
        };

        let targeted = plan.targeted_documents();
        relevant
            .into_iter()
            .filter(|doc| !targeted.contains(doc))
            .cloned()
            .collect()
    }

    fn is_vague_question(&self, question: &str) -> bool {
        word_count(question) < self.min_question_words
            || contains_any(question, &self.vague_question_phrases)
    }

    fn is_generic_strategy(&self, strategy: &str) -> bool {
        word_count(strategy) < self.min_strategy_words
            || contains_any(strategy, &self.generic_strategy_phrases)
    }
}

/// Documents whose name (or extension-less stem) appears in the query.
pub fn mentioned_documents<'a>(query: &str, available: &'a [DocumentId]) -> Vec<&'a DocumentId> {
    let lower = query.to_lowercase();
    available
        .iter()
        .filter(|doc| {
            let name = doc.as_str().to_lowercase();
            if lower.contains(&name) {
                return true;
            }
            match name.rsplit_once('.') {
                Some((stem, _)) if stem.chars().count() >= 3 => lower.contains(stem),
                _ => false,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::entities::{PlanStep, PlanType, Task};

    const STRATEGY: &str =
        "Extract yearly revenue from each filing, then contrast growth rates and explain divergences.";

    fn docs() -> Vec<DocumentId> {
        vec![DocumentId::new("Doc1.pdf"), DocumentId::new("Doc2.pdf")]
    }

    fn task(doc: &str) -> Task {
        Task::new(doc, "What was total revenue for 2022 and 2023?", "trend input")
    }

    #[test]
    fn test_single_document_plan_rejected_for_comparison() {
        let plan = Plan::new(PlanType::DeepAnalysis, "r", STRATEGY)
            .with_step(PlanStep::new("Extract", "").with_task(task("Doc1.pdf")))
            .with_step(PlanStep::new("Compare", ""));
        let findings = PlanHeuristics::default().evaluate(
            "Compare revenue trends across Doc1.pdf and Doc2.pdf",
            &plan,
            &docs(),
        );
        assert_eq!(
            findings,
            vec![HeuristicFinding::UnqueriedDocuments(vec![DocumentId::new("Doc2.pdf")])]
        );
    }

    #[test]
    fn test_single_step_for_comparison() {
        let plan = Plan::new(PlanType::DeepAnalysis, "r", STRATEGY).with_step(
            PlanStep::new("Everything", "")
                .with_task(task("Doc1.pdf"))
                .with_task(task("Doc2.pdf")),
        );
        let findings = PlanHeuristics::default().evaluate("Compare Doc1 and Doc2", &plan, &docs());
        assert_eq!(findings, vec![HeuristicFinding::SingleStepForComplexQuery]);
    }

    #[test]
    fn test_vague_question_and_generic_strategy() {
        let plan = Plan::new(PlanType::DeepAnalysis, "r", "Analyze the documents.")
            .with_step(PlanStep::new("A", "").with_task(Task::new("Doc1.pdf", "Summarize", "")))
            .with_step(PlanStep::new("B", "").with_task(task("Doc2.pdf")));
        let findings =
            PlanHeuristics::default().evaluate("What drives margin changes?", &plan, &docs());
        assert!(findings.contains(&HeuristicFinding::GenericStrategy));
        assert!(findings.iter().any(|f| matches!(
            f,
            HeuristicFinding::VagueTaskQuestion { document, .. } if document.as_str() == "Doc1.pdf"
        )));
    }

    #[test]
    fn test_well_formed_plan_passes() {
        let plan = Plan::new(PlanType::DeepAnalysis, "r", STRATEGY)
            .with_step(
                PlanStep::new("Extract", "")
                    .with_task(task("Doc1.pdf"))
                    .with_task(task("Doc2.pdf")),
            )
            .with_step(PlanStep::new("Compare", ""));
        let findings = PlanHeuristics::default().evaluate(
            "Compare revenue trends across Doc1.pdf and Doc2.pdf",
            &plan,
            &docs(),
        );
        assert!(findings.is_empty());
    }

    #[test]
    fn test_comparison_without_names_requires_all_documents() {
        let plan = Plan::new(PlanType::DeepAnalysis, "r", STRATEGY)
            .with_step(PlanStep::new("Extract", "").with_task(task("Doc1.pdf")))
            .with_step(PlanStep::new("Compare", ""));
        let findings = PlanHeuristics::default().evaluate("compare them", &plan, &docs());
        assert_eq!(
            findings,
            vec![HeuristicFinding::UnqueriedDocuments(vec![DocumentId::new("Doc2.pdf")])]
        );
    }

    #[test]
    fn test_directives_name_documents() {
        let finding = HeuristicFinding::UnqueriedDocuments(docs());
        assert_eq!(finding.directive(), "Add tasks that query Doc1.pdf, Doc2.pdf.");
    }

    #[test]
    fn test_mentioned_documents_by_stem() {
        let available = docs();
        let mentioned = mentioned_documents("what does doc2 say about costs", &available);
        assert_eq!(mentioned, vec![&DocumentId::new("Doc2.pdf")]);
    }
}
