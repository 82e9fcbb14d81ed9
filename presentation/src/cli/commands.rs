//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for turn results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The report with numbered citation footnotes
    Report,
    /// Reasoning, plan, collaboration record and report
    Full,
    /// The whole turn as JSON
    Json,
}

impl From<OutputFormat> for swarm_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Report => swarm_domain::OutputFormat::Report,
            OutputFormat::Full => swarm_domain::OutputFormat::Full,
            OutputFormat::Json => swarm_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for doc-swarm
#[derive(Parser, Debug)]
#[command(name = "doc-swarm")]
#[command(author, version, about = "Ask questions across a set of documents with an agent swarm")]
#[command(long_about = r#"
doc-swarm briefs one agent per document and answers questions across them.

Each turn runs:
1. Clarification: vague questions get a few multiple-choice questions first
2. Planning: a planner writes tasks for the document agents
3. Review: an adversarial board checks the plan (up to 5 rounds)
4. Execution: every task runs in parallel against its document's agent
5. Synthesis: the answers are merged into one cited report
6. Audit: a reviewer checks the report and may trigger one re-plan

Configuration files are loaded from (in priority order):
1. DOC_SWARM_* environment variables
2. --config <path>     Explicit config file
3. ./swarm.toml        Project-level config
4. ~/.config/doc-swarm/config.toml   Global config

Example:
  doc-swarm -d report-2022.txt -d report-2023.txt "Compare revenue growth"
  doc-swarm --chat -d contract.txt
"#)]
pub struct Cli {
    /// The question to ask (not required in chat mode)
    pub question: Option<String>,

    /// Document to brief (can be specified multiple times)
    #[arg(short, long = "doc", value_name = "PATH")]
    pub docs: Vec<PathBuf>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Use this model for every role
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Skip the plan review board
    #[arg(long)]
    pub no_review: bool,

    /// Never pause for clarification questions
    #[arg(long)]
    pub no_clarify: bool,

    /// Output format (defaults to the configured format, then `report`)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_documents_and_flags() {
        let cli = Cli::try_parse_from([
            "doc-swarm",
            "-d",
            "a.txt",
            "--doc",
            "b.txt",
            "--no-review",
            "-o",
            "json",
            "-vv",
            "Compare them",
        ])
        .unwrap();
        assert_eq!(cli.docs.len(), 2);
        assert!(cli.no_review);
        assert!(!cli.no_clarify);
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.question.as_deref(), Some("Compare them"));
    }

    #[test]
    fn test_chat_without_question() {
        let cli = Cli::try_parse_from(["doc-swarm", "--chat"]).unwrap();
        assert!(cli.chat);
        assert!(cli.question.is_none());
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
