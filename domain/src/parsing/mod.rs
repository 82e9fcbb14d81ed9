//! Parsing of model output.
//!
//! Pure functions with no I/O: the remote model returns text, these turn it
//! into structured values or fail explicitly.

pub mod structured;

pub use structured::{balance_json, parse_structured, parse_structured_as, strip_code_fences};
