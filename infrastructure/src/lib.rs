//! Infrastructure layer for doc-swarm
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, plus configuration file and document loading.

pub mod config;
pub mod documents;
pub mod gemini;
pub mod logging;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileLoggingConfig, FileModelsConfig,
    FileOutputConfig, FileOutputFormat, FilePoliciesConfig, FileProviderConfig,
};
pub use documents::{DocumentLoadError, LocalDocumentLoader};
pub use gemini::{GeminiGateway, GeminiSession};
pub use logging::JsonlConversationLogger;
