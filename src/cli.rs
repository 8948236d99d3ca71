//! Command-line interface components.

pub mod args;
pub mod commands;

pub use args::Args;
pub use commands::{report_lines, run, setup_logging};
