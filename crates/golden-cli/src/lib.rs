//! Golden CLI Library
//!
//! Argument parsing and command execution for the `golden` binary.
//! The binary entry point is in main.rs.

pub mod cli;

// Re-export commonly used types
pub use cli::{load_config, run, Cli, Command, Report, Target};
