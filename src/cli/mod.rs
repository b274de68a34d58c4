//! CLI module for questplan - command-line interface and subcommands.
//!
//! Provides scheduling, feedback submission and preference inspection.

pub mod commands;

pub use commands::Cli;
