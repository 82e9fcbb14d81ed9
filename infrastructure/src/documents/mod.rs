//! Document loading from the local file system
//!
//! [`LocalDocumentLoader`] turns files on disk into domain [`Document`]s that
//! can be briefed to the swarm.
//!
//! [`Document`]: swarm_domain::Document

mod loader;

pub use loader::{DocumentLoadError, LocalDocumentLoader};
