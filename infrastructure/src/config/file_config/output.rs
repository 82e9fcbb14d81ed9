//! Output configuration from TOML (`[output]` section)

use serde::{Deserialize, Serialize};
use swarm_domain::OutputFormat;

// Re-export OutputFormat from domain for convenience
pub use swarm_domain::OutputFormat as FileOutputFormat;

/// Raw output configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Output format (uses domain type)
    pub format: Option<OutputFormat>,
    /// Enable colored terminal output
    pub color: bool,
    /// Print the synthesizer's reasoning block above the report
    pub show_reasoning: bool,
    /// Print plan proposals, critiques and audits after the report
    pub show_collaboration: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
            show_reasoning: false,
            show_collaboration: false,
        }
    }
}
