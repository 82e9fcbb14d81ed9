//! Remote provider configuration from TOML (`[provider]` section)

use serde::{Deserialize, Serialize};

pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Raw provider configuration from TOML
///
/// The key itself never lives in the file; only the name of the environment
/// variable holding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    pub api_key_env: String,
    pub base_url: String,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}
