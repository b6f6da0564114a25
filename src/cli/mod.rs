//! Command-line interface for blogseek.

mod commands;

pub use commands::{is_verbose, run};
