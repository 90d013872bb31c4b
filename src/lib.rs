//! engrave - LLM-drafted git commit messages with interactive refinement.
//!
//! # Overview
//!
//! engrave collects a diff from the repository, asks a chat-completions
//! model for a draft commit message, lets the user edit the draft or
//! refine it through a chat loop, and finally runs `git commit`
//! (optionally followed by `git push`).

pub mod config;
pub mod editor;
pub mod error;
pub mod flow;
pub mod generate;
pub mod git;
pub mod llm;
pub mod refine;
pub mod ui;

// Re-export commonly used types
pub use config::Settings;
pub use error::{AppError, CommitError, ConfigError, GenerateError, GitError, ModelError, PushError};
pub use flow::{run_commit_flow, FlowConfig, FlowResult};
pub use git::{Diff, DiffMode};
pub use llm::{ChatModel, HttpModel, Turn};
