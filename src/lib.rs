//! Questplan - a priority-weighted day planner
//!
//! Places tasks into a working day around blocked calendar time, optionally
//! asking an LLM for the plan first, and learns scheduling preferences from
//! user feedback.

pub mod assistant;
pub mod domain;
pub mod error;
pub mod learning;
pub mod llm;
pub mod scheduler;
pub mod storage;

pub use error::{PlannerError, Result};
