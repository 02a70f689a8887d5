//! Command implementations for the binary entry point.

pub mod cache_cmd;
pub mod completions;
pub mod shell;
