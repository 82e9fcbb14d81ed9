//! Output formatter trait

use swarm_application::TurnReport;

/// Trait for formatting turn results
pub trait OutputFormatter {
    /// Reasoning, plan, collaboration record, task outcomes and report
    fn format_full(&self, report: &TurnReport) -> String;

    /// Format as JSON
    fn format_json(&self, report: &TurnReport) -> String;

    /// The report with citation footnotes
    fn format_report(&self, report: &TurnReport) -> String;
}
