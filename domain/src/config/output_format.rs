//! Output format value object

use serde::{Deserialize, Serialize};

/// How a finished turn is printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Only the visible report with citation footnotes (default)
    #[default]
    Report,
    /// Report plus reasoning trace, plan and collaboration record
    Full,
    /// The whole turn report as JSON
    Json,
}
