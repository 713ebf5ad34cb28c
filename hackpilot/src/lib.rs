//! hackpilot: a hackathon assistant.
//!
//! Wraps an LLM for ideas, research and pitch decks, recommends tech stacks
//! and fills static templates for project scaffolding, and drives hosting-platform CLIs to deploy the
//! result. [`assistant::Assistant`] is the entry point.

pub mod assistant;
pub mod codegen;
pub mod config;
pub mod deploy;
pub mod design;
pub mod error;
pub mod history;
pub mod ideas;
pub mod llm;
pub mod models;
pub mod pitch;
pub mod research;
pub mod stack;

pub use assistant::{Assistant, Command, Outcome};
pub use config::Config;
pub use error::{AssistantError, Result};
