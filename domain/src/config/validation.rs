//! Configuration validation issues.
//!
//! Loaders report problems as a list of [`ConfigIssue`]s instead of failing on
//! the first one; the binary prints warnings and aborts on errors.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// `retry.max_attempts` is zero: no remote call would ever be made.
    ZeroRetryAttempts,
    /// `orchestration.max_review_rounds` is zero: plans are never reviewed.
    ReviewDisabled,
    /// A `[models]` entry is blank.
    EmptyModelName,
    /// `generation.max_output_tokens` is zero.
    ZeroOutputTokens,
    /// A temperature outside `0.0..=2.0`.
    TemperatureOutOfRange,
    /// `orchestration.history_window` is zero: follow-up questions lose context.
    NoHistoryWindow,
    /// The API key environment variable is not set.
    MissingApiKey,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", label, self.message)
    }
}
