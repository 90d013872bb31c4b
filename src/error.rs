//! Error types for engrave modules using thiserror.

use thiserror::Error;

/// Errors from git queries (repository detection, diff collection).
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not inside a git repository")]
    NotARepository,

    #[error("'git' command not found. Is Git installed and in your PATH?")]
    CommandUnavailable,

    #[error("git {command} failed: {output}")]
    CommandFailed { command: String, output: String },

    #[error("Failed to run git {command}: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the LLM collaborator.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("API key not found. Pass --key or set the {0} environment variable")]
    MissingApiKey(&'static str),

    #[error("LLM request failed: {0}")]
    RequestFailed(#[source] reqwest::Error),

    #[error("LLM endpoint returned HTTP {status}: {body}")]
    Endpoint { status: u16, body: String },

    #[error("LLM returned a malformed response: {0}")]
    MalformedResponse(String),
}

/// Errors from the one-shot message generation step.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Error calling LLM: {0}")]
    ModelFailed(#[from] ModelError),

    #[error("LLM returned an empty message and --yes was used. Aborting commit.")]
    EmptyMessage,
}

/// Errors from the commit executor.
#[derive(Error, Debug)]
pub enum CommitError {
    #[error("'git' command not found. Is Git installed and in your PATH?")]
    CommandUnavailable,

    #[error("git commit exited with code {code}:\n{output}")]
    Rejected { code: i32, output: String },

    #[error("Failed to run git commit: {0}")]
    SpawnFailed(#[source] std::io::Error),
}

/// Errors from the optional follow-up push.
///
/// Kept separate from [`CommitError`]: a failed push never invalidates a
/// commit that already succeeded.
#[derive(Error, Debug)]
pub enum PushError {
    #[error("'git' command not found. Is Git installed and in your PATH?")]
    CommandUnavailable,

    #[error("git push exited with code {code}:\n{output}")]
    Rejected { code: i32, output: String },

    #[error("Failed to run git push: {0}")]
    SpawnFailed(#[source] std::io::Error),
}

/// Errors from persisted configuration handling.
///
/// Only writes can fail: a missing or corrupt config file reads as empty
/// defaults, never as an error.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine a config directory for this platform")]
    NoConfigDir,

    #[error("Failed to write config: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("Failed to remove config: {0}")]
    RemoveFailed(#[source] std::io::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeFailed(#[source] serde_json::Error),
}

/// Top-level error for the binary, mapping failure classes to exit codes.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Environment(#[from] GitError),

    #[error(transparent)]
    Generation(#[from] GenerateError),

    #[error(transparent)]
    Commit(#[from] CommitError),

    #[error(transparent)]
    Push(#[from] PushError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AppError {
    /// Distinct exit codes per failure class, for scriptability.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Environment(_) => 2,
            AppError::Generation(_) => 3,
            AppError::Commit(_) => 4,
            AppError::Push(_) => 5,
            AppError::Config(_) => 6,
        }
    }
}
