//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - schedule: plan a day from a request file
//! - feedback: learn from feedback on a schedule
//! - prefs: show or reset stored preferences
//! - rules: show user rules mined from feedback

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Questplan - priority-weighted day planner with an optional LLM assistant
#[derive(Parser, Debug)]
#[command(name = "questplan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Schedule the tasks in a request file
    Schedule {
        /// JSON file with tasks, targetDate, now, timezoneOffsetMinutes, blockedIntervals
        request: PathBuf,

        /// Ask the LLM assistant first, falling back to the deterministic planner
        #[arg(short, long)]
        assist: bool,

        /// Print the schedule as JSON
        #[arg(long)]
        json: bool,
    },

    /// Learn from feedback on a previously produced schedule
    Feedback {
        /// JSON file with feedbackType, proposedSchedule, correctedSchedule, taskMetadata, reason
        submission: PathBuf,
    },

    /// Show stored preferences
    Prefs {
        /// Reset preferences to defaults
        #[arg(long)]
        reset: bool,
    },

    /// Show user rules extracted from recent feedback
    Rules,
}
