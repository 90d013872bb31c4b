//! One-shot commit message generation from a diff.

use console::style;
use tracing::debug;

use crate::error::GenerateError;
use crate::git::Diff;
use crate::llm::{truncate_diff, ChatModel, Turn};

/// Generate a commit message for `diff` with a single model request.
///
/// Oversized diffs are truncated deterministically before sending, with a
/// user-visible warning; this is never fatal. Any model failure aborts the
/// invocation — there is no retry. An empty result is passed through for
/// the caller to handle.
pub async fn generate_message(
    diff: &Diff,
    system_prompt: &str,
    max_chars: usize,
    model: &dyn ChatModel,
) -> Result<String, GenerateError> {
    let (sent, truncated) = truncate_diff(&diff.text, max_chars);
    if truncated {
        eprintln!(
            "{}",
            style(format!(
                "Warning: diff is very long ({} chars), truncating to {} chars for the LLM.",
                diff.text.chars().count(),
                max_chars
            ))
            .yellow()
        );
    }
    debug!(
        truncated,
        sent_chars = sent.chars().count(),
        "Requesting commit message"
    );

    let message = model
        .complete(Some(system_prompt), &[Turn::user(sent.as_ref())])
        .await?;
    Ok(message)
}
