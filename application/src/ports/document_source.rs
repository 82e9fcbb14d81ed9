//! Document source port
//!
//! Lets interactive surfaces brief new documents by path without knowing
//! where documents come from.

use std::path::Path;
use swarm_domain::Document;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct DocumentSourceError(pub String);

pub trait DocumentSource: Send + Sync {
    fn load(&self, path: &Path) -> Result<Document, DocumentSourceError>;
}
