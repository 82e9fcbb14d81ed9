//! Report domain: the synthesized answer and its citation spans.

pub mod citation;
pub mod turn_result;

pub use citation::{Citation, Segment, citations, parse_citations, plain_text};
pub use turn_result::TurnResult;
