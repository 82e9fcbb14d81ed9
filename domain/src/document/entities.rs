//! Document entities

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Identifier of a document (and of the agent briefed with it).
///
/// Plans address documents by this id, which is the document's file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A document with its full text content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub content: String,
}

impl Document {
    /// Create a document, rejecting blank names.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidDocument(
                "document name cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            id: DocumentId::new(trimmed),
            content: content.into(),
        })
    }

    pub fn name(&self) -> &str {
        self.id.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}
