//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain and application types where
//! the shapes already match.

mod logging;
mod models;
mod output;
mod policies;
mod provider;

pub use logging::FileLoggingConfig;
pub use models::FileModelsConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use policies::FilePoliciesConfig;
pub use provider::{DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL, FileProviderConfig};

use serde::{Deserialize, Serialize};
use swarm_application::{GenerationParams, OrchestrationParams, RetryPolicy, SwarmConfig};
use swarm_domain::{ConfigIssue, ConfigIssueCode};
use thiserror::Error;

/// Configuration that cannot be used at all
#[derive(Error, Debug)]
#[error("invalid configuration: {}", .issues.iter().map(|i| i.message.as_str()).collect::<Vec<_>>().join("; "))]
pub struct ConfigValidationError {
    pub issues: Vec<ConfigIssue>,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Role-based model selection
    pub models: FileModelsConfig,
    /// Remote endpoint and credentials lookup
    pub provider: FileProviderConfig,
    /// Loop bounds of a turn
    pub orchestration: OrchestrationParams,
    /// Backoff for remote calls
    pub retry: RetryPolicy,
    /// Temperatures, token limits and thinking budgets
    pub generation: GenerationParams,
    /// Prompt policies and review heuristics
    pub policies: FilePoliciesConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Log destinations
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        self.validate_with_env(|name| std::env::var(name).ok())
    }

    /// Validation with an injectable environment lookup.
    pub fn validate_with_env(&self, lookup: impl Fn(&str) -> Option<String>) -> Vec<ConfigIssue> {
        let mut issues = self.models.to_model_config().1;

        if self.retry.max_attempts == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroRetryAttempts,
                "retry.max_attempts: must be at least 1",
            ));
        }

        if self.orchestration.max_review_rounds == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ReviewDisabled,
                "orchestration.max_review_rounds is 0: plans will not be reviewed",
            ));
        }

        if self.orchestration.history_window == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::NoHistoryWindow,
                "orchestration.history_window is 0: follow-up questions will not see earlier turns",
            ));
        }

        if self.generation.max_output_tokens == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroOutputTokens,
                "generation.max_output_tokens: must be at least 1",
            ));
        }

        let temperatures = [
            ("planner_temperature", self.generation.planner_temperature),
            ("reviewer_temperature", self.generation.reviewer_temperature),
            ("agent_temperature", self.generation.agent_temperature),
            ("synthesizer_temperature", self.generation.synthesizer_temperature),
        ];
        for (field, value) in temperatures {
            if !(0.0..=2.0).contains(&value) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::TemperatureOutOfRange,
                    format!("generation.{}: {} is outside 0.0..=2.0", field, value),
                ));
            }
        }

        let key_present = lookup(&self.provider.api_key_env).is_some_and(|v| !v.trim().is_empty());
        if !key_present {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::MissingApiKey,
                format!(
                    "provider.api_key_env: environment variable {} is not set",
                    self.provider.api_key_env
                ),
            ));
        }

        issues
    }

    /// Split issues into warnings (returned) and errors (fatal).
    pub fn ensure_valid(&self) -> Result<Vec<ConfigIssue>, ConfigValidationError> {
        let (errors, warnings): (Vec<_>, Vec<_>) =
            self.validate().into_iter().partition(ConfigIssue::is_error);
        if errors.is_empty() {
            Ok(warnings)
        } else {
            Err(ConfigValidationError { issues: errors })
        }
    }

    /// Build the application configuration handed to the turn controller.
    pub fn to_swarm_config(&self) -> SwarmConfig {
        let (models, _) = self.models.to_model_config();
        SwarmConfig::new(models)
            .with_orchestration(self.orchestration.clone())
            .with_retry(self.retry.clone())
            .with_generation(self.generation.clone())
            .with_policies(self.policies.text.clone())
            .with_heuristics(self.policies.heuristics.clone())
    }
}
