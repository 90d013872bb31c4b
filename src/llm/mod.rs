//! LLM collaborator: model capability, HTTP client, and prompt construction.

pub mod model;
pub mod prompt;

pub use model::{ChatModel, HttpModel, Role, Turn, API_KEY_ENV_VAR, DEFAULT_MODEL};
pub use prompt::{
    apply_prompt, chat_system_prompt, render_history, truncate_diff, DEFAULT_SYSTEM_PROMPT,
    TRUNCATION_MARKER,
};
