//! Console output formatter for turn results
//!
//! Claim spans are rendered inline with a numbered marker and collected into
//! a footnote list below the report. Identical citations share a number.

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use swarm_application::{TurnOutcome, TurnReport};
use swarm_domain::report::parse_citations;
use swarm_domain::{
    Citation, ClarificationRequest, CollaborationPayload, OutputFormat, Segment,
};

/// Formats turn results for console display
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleFormatter {
    /// Print the synthesizer's reasoning above the report
    pub show_reasoning: bool,
    /// Print the collaboration record after the report
    pub show_collaboration: bool,
}

impl ConsoleFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reasoning(mut self, show: bool) -> Self {
        self.show_reasoning = show;
        self
    }

    pub fn with_collaboration(mut self, show: bool) -> Self {
        self.show_collaboration = show;
        self
    }

    pub fn render(&self, report: &TurnReport, format: OutputFormat) -> String {
        match format {
            OutputFormat::Report => self.format_report(report),
            OutputFormat::Full => self.format_full(report),
            OutputFormat::Json => self.format_json(report),
        }
    }

    /// Text for any exit of a turn.
    pub fn render_outcome(&self, outcome: &TurnOutcome, format: OutputFormat) -> String {
        match outcome {
            TurnOutcome::Completed(report) => self.render(report, format),
            TurnOutcome::Clarification(request) => Self::format_clarification(request),
            TurnOutcome::Stopped => format!("{}", "Stopped.".yellow()),
            TurnOutcome::Failed(message) => format!("{} {}", "Error:".red().bold(), message),
        }
    }

    /// Render report text with `[n]` markers and a footnote list.
    pub fn render_citations(text: &str) -> String {
        let mut body = String::new();
        let mut notes: Vec<Citation> = Vec::new();

        for segment in parse_citations(text) {
            match segment {
                Segment::Text { text } => body.push_str(&text),
                Segment::Claim(citation) => {
                    let index = match notes.iter().position(|c| same_source(c, &citation)) {
                        Some(i) => i + 1,
                        None => {
                            notes.push(citation.clone());
                            notes.len()
                        }
                    };
                    body.push_str(&citation.content);
                    body.push_str(&format!("[{}]", index).cyan().to_string());
                }
            }
        }

        if notes.is_empty() {
            return body;
        }

        let mut out = body.trim_end().to_string();
        out.push_str(&format!("\n\n{}\n", "Sources".bold()));
        for (i, citation) in notes.iter().enumerate() {
            out.push_str(&Self::footnote(i + 1, citation));
        }
        out
    }

    fn footnote(index: usize, citation: &Citation) -> String {
        let mut line = format!(
            "  {} {}, p. {}: \"{}\"",
            format!("[{}]", index).cyan(),
            citation.source.bold(),
            citation.page,
            citation.quote
        );
        if let Some(logic) = &citation.logic {
            line.push_str(&format!(" {}", format!("({})", logic).dimmed()));
        }
        line.push('\n');
        line
    }

    /// Numbered questions and options for the interactive prompt.
    pub fn format_clarification(request: &ClarificationRequest) -> String {
        let mut out = format!("{}\n", "A few questions before planning:".yellow().bold());
        for (q, question) in request.questions.iter().enumerate() {
            let mode = if question.allows_multiple {
                "choose one or more"
            } else {
                "choose one"
            };
            out.push_str(&format!(
                "\n{} {} {}\n",
                format!("{}.", q + 1).bold(),
                question.text,
                format!("({})", mode).dimmed()
            ));
            for (o, option) in question.options.iter().enumerate() {
                let suffix = if option.is_freeform_slot { " ..." } else { "" };
                out.push_str(&format!("   {}) {}{}\n", o + 1, option.text, suffix));
            }
        }
        out
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    fn collaboration_section(report: &TurnReport) -> String {
        let mut out = Self::section_header("Collaboration");
        for entry in report.collaboration.entries() {
            let summary = match &entry.payload {
                CollaborationPayload::Plan(plan) => format!(
                    "{} plan, {} task(s)",
                    plan.plan_type,
                    plan.task_count()
                ),
                CollaborationPayload::PlanVerdict(verdict) => {
                    format!("{}: {}", verdict.outcome.as_str(), verdict.critique)
                }
                CollaborationPayload::OutputVerdict(verdict) => {
                    format!("{}: {}", verdict.outcome.as_str(), verdict.quality)
                }
            };
            out.push_str(&format!(
                "  {} #{} {}\n",
                entry.kind.as_str().yellow(),
                entry.round,
                summary
            ));
        }
        out
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn same_source(a: &Citation, b: &Citation) -> bool {
    a.source == b.source && a.page == b.page && a.quote == b.quote
}

impl OutputFormatter for ConsoleFormatter {
    fn format_full(&self, report: &TurnReport) -> String {
        let mut out = Self::header("doc-swarm report");
        out.push('\n');

        if !report.result.reasoning.is_empty() {
            out.push_str(&Self::section_header("Reasoning"));
            out.push_str(&Self::indent(&report.result.reasoning, "  ").dimmed().to_string());
            out.push('\n');
        }

        out.push_str(&Self::section_header("Plan"));
        out.push_str(&Self::indent(&report.plan.to_prompt_text(), "  "));
        out.push('\n');

        out.push_str(&Self::section_header("Tasks"));
        for outcome in &report.task_outcomes {
            let mark = if outcome.is_success() {
                "v".green()
            } else {
                "x".red()
            };
            out.push_str(&format!(
                "  {} [{}] {}\n",
                mark, outcome.task.document, outcome.task.question
            ));
            if let Err(e) = &outcome.result {
                out.push_str(&format!("      {}\n", e.red()));
            }
        }

        out.push_str(&Self::collaboration_section(report));

        out.push_str(&Self::section_header("Report"));
        out.push_str(&Self::render_citations(&report.result.report));
        out.push('\n');
        out.push_str(&Self::footer());
        out
    }

    fn format_json(&self, report: &TurnReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_report(&self, report: &TurnReport) -> String {
        let mut out = String::new();
        if self.show_reasoning && !report.result.reasoning.is_empty() {
            out.push_str(&format!(
                "{}\n{}\n\n",
                "Reasoning".dimmed().bold(),
                Self::indent(&report.result.reasoning, "  ").dimmed()
            ));
        }
        out.push_str(&Self::render_citations(&report.result.report));
        out.push('\n');
        if self.show_collaboration {
            out.push_str(&Self::collaboration_section(report));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swarm_application::TaskOutcome;
    use swarm_domain::{
        CollaborationRecord, Plan, PlanType, Question, QuestionOption, Task, TurnResult,
    };

    fn report(text: &str) -> TurnReport {
        TurnReport {
            result: TurnResult::new("weighed both filings", text),
            plan: Plan::new(PlanType::SimpleFact, "lookup", "ask the filing"),
            collaboration: CollaborationRecord::new(),
            task_outcomes: vec![
                TaskOutcome::success(Task::new("a.pdf", "What was revenue?", ""), "5m"),
                TaskOutcome::failure(Task::new("b.pdf", "What was revenue?", ""), "agent gone"),
            ],
            audit_attempts: 1,
        }
    }

    #[test]
    fn test_citations_become_footnotes() {
        let rendered = ConsoleFormatter::render_citations(
            r#"Revenue <claim source="a.pdf" page="3" quote="$5m">was $5m</claim>, up from <claim source="b.pdf" page="7" quote="$4m" logic="prior year">$4m</claim>."#,
        );
        assert!(rendered.contains("was $5m"));
        assert!(rendered.contains("[1]"));
        assert!(rendered.contains("[2]"));
        assert!(rendered.contains("p. 3: \"$5m\""));
        assert!(rendered.contains("(prior year)"));
        assert!(!rendered.contains("<claim"));
    }

    #[test]
    fn test_repeated_citation_shares_number() {
        let rendered = ConsoleFormatter::render_citations(
            r#"<claim source="a.pdf" page="1" quote="q">x</claim> and <claim source="a.pdf" page="1" quote="q">y</claim>"#,
        );
        assert!(!rendered.contains("[2]"));
        assert_eq!(rendered.matches("a.pdf").count(), 1);
    }

    #[test]
    fn test_text_without_claims_is_unchanged() {
        assert_eq!(
            ConsoleFormatter::render_citations("No data was found."),
            "No data was found."
        );
    }

    #[test]
    fn test_full_output_lists_failed_tasks() {
        let formatter = ConsoleFormatter::new();
        let rendered = formatter.format_full(&report("Done."));
        assert!(rendered.contains("agent gone"));
        assert!(rendered.contains("weighed both filings"));
        assert!(rendered.contains("Strategy: ask the filing"));
    }

    #[test]
    fn test_json_output_is_parseable() {
        let formatter = ConsoleFormatter::new();
        let json = formatter.render(&report("Done."), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["result"]["report"], "Done.");
        assert_eq!(value["audit_attempts"], 1);
    }

    #[test]
    fn test_reasoning_hidden_by_default() {
        let rendered = ConsoleFormatter::new().format_report(&report("Done."));
        assert!(!rendered.contains("weighed both filings"));
        let rendered = ConsoleFormatter::new()
            .with_reasoning(true)
            .format_report(&report("Done."));
        assert!(rendered.contains("weighed both filings"));
    }

    #[test]
    fn test_failed_outcome_shows_message() {
        let rendered = ConsoleFormatter::new().render_outcome(
            &TurnOutcome::Failed("Planning failed: no documents".into()),
            OutputFormat::Report,
        );
        assert!(rendered.contains("Planning failed: no documents"));
    }

    #[test]
    fn test_clarification_listing() {
        let request = ClarificationRequest::with_questions(vec![
            Question::multiple("scope", "Which sections?")
                .with_option(QuestionOption::new("a", "Financials"))
                .with_option(QuestionOption::freeform("b", "Other")),
        ]);
        let rendered = ConsoleFormatter::format_clarification(&request);
        assert!(rendered.contains("Which sections?"));
        assert!(rendered.contains("1) Financials"));
        assert!(rendered.contains("2) Other ..."));
    }
}
