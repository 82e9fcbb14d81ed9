//! Role-based model configuration from TOML (`[models]` section)

use serde::{Deserialize, Serialize};
use swarm_domain::{ConfigIssue, ConfigIssueCode, Model, ModelConfig};

/// Role-based model configuration from TOML
///
/// # Example
///
/// ```toml
/// [models]
/// planner = "gemini-2.5-pro"            # Plan creation and refinement
/// reviewer = "gemini-2.5-flash"         # Plan Review Board and audit
/// agent = "gemini-2.5-flash"            # One session per document
/// synthesizer = "gemini-2.5-pro"        # Final report
/// clarifier = "gemini-2.5-flash-lite"   # Clarification gate
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelsConfig {
    pub planner: Option<String>,
    pub reviewer: Option<String>,
    pub agent: Option<String>,
    pub synthesizer: Option<String>,
    pub clarifier: Option<String>,
}

impl FileModelsConfig {
    /// Parse a single model string, collecting issues for empty names.
    fn parse_single_model(field: &str, value: Option<&String>) -> (Option<Model>, Vec<ConfigIssue>) {
        match value {
            None => (None, Vec::new()),
            Some(s) if s.trim().is_empty() => (
                None,
                vec![ConfigIssue::error(
                    ConfigIssueCode::EmptyModelName,
                    format!("models.{}: model name cannot be empty", field),
                )],
            ),
            Some(s) => (Some(Model::from_name(s.trim())), Vec::new()),
        }
    }

    /// Resolve every role, falling back to the defaults for unset or
    /// invalid entries.
    pub fn to_model_config(&self) -> (ModelConfig, Vec<ConfigIssue>) {
        let mut config = ModelConfig::default();
        let mut issues = Vec::new();

        let fields = [
            ("planner", &self.planner),
            ("reviewer", &self.reviewer),
            ("agent", &self.agent),
            ("synthesizer", &self.synthesizer),
            ("clarifier", &self.clarifier),
        ];
        for (field, value) in fields {
            let (model, mut found) = Self::parse_single_model(field, value.as_ref());
            issues.append(&mut found);
            let Some(model) = model else {
                continue;
            };
            config = match field {
                "planner" => config.with_planner(model),
                "reviewer" => config.with_reviewer(model),
                "agent" => config.with_agent(model),
                "synthesizer" => config.with_synthesizer(model),
                _ => config.with_clarifier(model),
            };
        }
        (config, issues)
    }
}
