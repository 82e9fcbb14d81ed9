//! Prompt domain
//!
//! Templates, response schemas and policy text for every stage of a turn.

mod policy;
pub mod schema;
mod template;

pub use policy::PolicyText;
pub use template::SwarmPromptTemplate;
