//! Configuration file loading for doc-swarm
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `DOC_SWARM_*` environment variables (`__` separates section and key)
//! 2. `--config <path>` specified file
//! 3. Project root: `./swarm.toml` or `./.swarm.toml`
//! 4. Global: `$XDG_CONFIG_HOME/doc-swarm/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL, FileConfig, FileLoggingConfig,
    FileModelsConfig, FileOutputConfig, FileOutputFormat, FilePoliciesConfig, FileProviderConfig,
};
pub use loader::ConfigLoader;
