//! Progress display for running turns

pub mod reporter;
