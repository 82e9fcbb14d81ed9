//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL file receiving collaboration and audit events
    pub conversation_log: Option<String>,
    /// Directory for daily-rotated diagnostic logs
    pub log_dir: Option<String>,
}
