//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: available generation models
//! - [`error::DomainError`]: domain-level errors
//! - [`string`]: UTF-8 safe string helpers for prompts and logs

pub mod error;
pub mod model;
pub mod string;
