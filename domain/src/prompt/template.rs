//! Prompt templates for the swarm turn

use crate::document::{Document, DocumentId};
use crate::plan::{FailureFeedback, Plan, Task};

/// Templates for generating prompts at each stage
pub struct SwarmPromptTemplate;

fn document_list(documents: &[DocumentId]) -> String {
    if documents.is_empty() {
        return "(none)".to_string();
    }
    documents
        .iter()
        .map(|id| format!("- {}", id))
        .collect::<Vec<_>>()
        .join("\n")
}

impl SwarmPromptTemplate {
    /// System directive for a per-document agent session.
    ///
    /// The full document text is embedded so that every later question in the
    /// session is answered from it alone.
    pub fn agent_system(document: &Document) -> String {
        format!(
            r#"You are a research assistant bound to a single document: "{name}".

## Rules

1. Answer ONLY from the document below. Never use outside knowledge.
2. If the document does not contain the answer, say so explicitly and name what you searched for.
3. Wrap EVERY factual statement in a citation tag:
   <claim source="{name}" page="PAGE" quote="EXACT QUOTE">your statement</claim>
   - page: the page number or section where the quote appears ("n/a" if the document has no pages)
   - quote: copied verbatim from the document; escape double quotes as &quot;
4. For a statement derived from several facts (a sum, a growth rate, a comparison), add
   logic="how it was derived" to the tag.
5. Values inside Markdown tables carry the same tag inside the cell.

## Document

<document name="{name}">
{content}
</document>"#,
            name = document.name(),
            content = document.content
        )
    }

    /// Question sent to an agent for one plan task
    pub fn agent_question(task: &Task) -> String {
        if task.rationale.trim().is_empty() {
            return task.question.clone();
        }
        format!(
            "{}\n\n(Context: this answer is needed because {})",
            task.question, task.rationale
        )
    }

    pub fn clarification_system() -> &'static str {
        r#"You decide whether a user's question about a set of documents must be clarified before research starts.
Respond with JSON only."#
    }

    pub fn clarification_prompt(query: &str, documents: &[DocumentId], policy: &str) -> String {
        format!(
            r#"## Policy

{policy}

## Available documents

{documents}

## User query

{query}

Return JSON: {{"needs_clarification": bool, "questions": [{{"id", "text", "allows_multiple", "options": [{{"id", "text", "is_freeform_slot"}}]}}]}}"#,
            policy = policy,
            documents = document_list(documents),
            query = query
        )
    }

    pub fn planner_system() -> &'static str {
        r#"You are the planner of a research team. Each document is held by one agent that can only read that document.
You break the user's question into precise questions for those agents.

Classify the query:
- SIMPLE_FACT: retrieval or summary of facts
- DEEP_ANALYSIS: comparison, thematic synthesis, or reasoning across documents

If the answer is already in the conversation history, return zero steps.
Every task must name one available document exactly as listed and ask one specific, self-contained question.
Respond with JSON only."#
    }

    pub fn planning_prompt(
        query: &str,
        documents: &[DocumentId],
        history: &str,
        feedback: Option<&FailureFeedback>,
    ) -> String {
        let mut prompt = format!(
            r#"## Available documents

{documents}

## Recent conversation

{history}

## User query

{query}
"#,
            documents = document_list(documents),
            history = history,
            query = query
        );

        if let Some(feedback) = feedback {
            prompt.push_str(&format!(
                r#"
## Remediation required

Your previous plan was rejected. You MUST address every point below.

{directive}

## Rejected plan

{plan}
"#,
                directive = feedback.directive,
                plan = feedback.rejected_plan.to_prompt_text()
            ));
        }

        prompt.push_str(
            r#"
Return JSON: {"plan_type", "reasoning", "strategy", "steps": [{"title", "description", "tasks": [{"document", "question", "rationale"}]}]}"#,
        );
        prompt
    }

    pub fn plan_review_system() -> &'static str {
        r#"You are an adversarial plan reviewer. You judge whether a research plan will fully answer the user's question.
Respond with JSON only."#
    }

    pub fn plan_review_prompt(
        query: &str,
        plan: &Plan,
        documents: &[DocumentId],
        policy: &str,
    ) -> String {
        format!(
            r#"## Policy

{policy}

## Available documents

{documents}

## User query

{query}

## Proposed plan

{plan}

Return JSON: {{"verdict": "APPROVED" | "REJECTED", "critique", "directives": [string]}}"#,
            policy = policy,
            documents = document_list(documents),
            query = query,
            plan = plan.to_prompt_text()
        )
    }

    pub fn audit_system() -> &'static str {
        r#"You are a strict auditor of research reports. You check that the report answers the question and that its conclusions are supported by cited evidence.
Respond with JSON only."#
    }

    pub fn audit_prompt(query: &str, report: &str, plan: &Plan, policy: &str) -> String {
        format!(
            r#"## Policy

{policy}

## User query

{query}

## Plan that produced the report

{plan}

## Report

{report}

Return JSON: {{"verdict": "APPROVED" | "REJECTED", "quality", "missing_data_suspected": bool, "remediation"}}"#,
            policy = policy,
            query = query,
            plan = plan.to_prompt_text(),
            report = report
        )
    }

    pub fn synthesizer_system() -> &'static str {
        r#"You write the final report for a research team from the answers of per-document agents.

## Output format

1. Begin with <reasoning>...</reasoning> containing your working: how the answers fit together, conflicts, gaps.
2. After the reasoning block, write the report in Markdown.
3. Wrap EVERY factual statement in the citation tag used by the agents:
   <claim source="DOCUMENT" page="PAGE" quote="EXACT QUOTE">statement</claim>
   Keep the agents' source, page and quote attributes. For derived or inferred statements add logic="how it was derived".
4. Table cell values carry the same tag inside the cell.
5. Where an agent reported an error or found nothing, say what is missing; never invent figures."#
    }

    pub fn synthesis_prompt(query: &str, plan: &Plan, history: &str, evidence: &str) -> String {
        format!(
            r#"## User query

{query}

## Strategy

{strategy}

## Recent conversation

{history}

## Agent answers

{evidence}"#,
            query = query,
            strategy = plan.strategy,
            history = history,
            evidence = if evidence.trim().is_empty() {
                "(no agent queries were needed; answer from the conversation)"
            } else {
                evidence
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{PlanStep, PlanType};

    #[test]
    fn test_agent_system_embeds_document_and_tag_format() {
        let doc = Document::new("Doc1.pdf", "Revenue was $5m.").unwrap();
        let prompt = SwarmPromptTemplate::agent_system(&doc);
        assert!(prompt.contains("Revenue was $5m."));
        assert!(prompt.contains(r#"<claim source="Doc1.pdf""#));
    }

    #[test]
    fn test_planning_prompt_includes_feedback() {
        let docs = vec![DocumentId::from("Doc1.pdf"), DocumentId::from("Doc2.pdf")];
        let rejected = Plan::new(PlanType::DeepAnalysis, "r", "only doc1").with_step(
            PlanStep::new("Extract", "d").with_task(Task::new("Doc1.pdf", "What was revenue?", "x")),
        );
        let feedback = FailureFeedback::new("Query Doc2.pdf as well", rejected);

        let without = SwarmPromptTemplate::planning_prompt("Compare", &docs, "", None);
        assert!(!without.contains("Remediation required"));

        let with = SwarmPromptTemplate::planning_prompt("Compare", &docs, "", Some(&feedback));
        assert!(with.contains("Query Doc2.pdf as well"));
        assert!(with.contains("[Doc1.pdf] What was revenue?"));
        assert!(with.contains("- Doc2.pdf"));
    }

    #[test]
    fn test_agent_question_with_rationale() {
        let task = Task::new("a.txt", "What is X?", "needed for the comparison");
        assert!(SwarmPromptTemplate::agent_question(&task).contains("needed for the comparison"));
        let bare = Task::new("a.txt", "What is X?", "");
        assert_eq!(SwarmPromptTemplate::agent_question(&bare), "What is X?");
    }
}
