//! Rendering of turn results for the terminal

pub mod console;
pub mod formatter;
