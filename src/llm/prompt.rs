//! Prompt construction and diff truncation.

use std::borrow::Cow;

use crate::llm::model::{Role, Turn};

/// Literal marker appended when a diff is cut down to size.
pub const TRUNCATION_MARKER: &str = "\n\n... [diff truncated]";

/// Default system prompt for the one-shot generation step.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are an expert programmer tasked with writing a git commit message.
Based on the provided 'git diff' output, generate a concise and informative commit message.
The commit message should ideally follow the Conventional Commits specification (e.g., 'feat: add new login button', 'fix: resolve issue with user authentication', 'docs: update API documentation', 'refactor: improve performance of data processing module', 'chore: update dependencies').
The diff output shows only the changes to be committed.

Focus on describing WHAT changed and WHY the change was made, if apparent from the diff.
Keep the subject line (the first line) ideally under 50 characters. If more detail is needed, provide a blank line after the subject and then a more detailed body.

Output ONLY the raw commit message. Do not include any other explanatory text, preamble, markdown formatting like '```', or any phrases like \"Here's the commit message:\".";

/// Truncate a diff to at most `max_chars` characters.
///
/// Returns the text to send plus whether truncation happened. Truncation
/// keeps the first `max_chars` characters and appends
/// [`TRUNCATION_MARKER`]; the original diff is never mutated.
pub fn truncate_diff(text: &str, max_chars: usize) -> (Cow<'_, str>, bool) {
    let mut indices = text.char_indices();
    match indices.nth(max_chars) {
        None => (Cow::Borrowed(text), false),
        Some((byte_end, _)) => {
            let mut truncated = text[..byte_end].to_string();
            truncated.push_str(TRUNCATION_MARKER);
            (Cow::Owned(truncated), true)
        }
    }
}

/// System prompt for a chat refinement turn, parameterized by the original
/// diff and the current working draft.
pub fn chat_system_prompt(diff: &str, working_draft: &str) -> String {
    format!(
        "You are helping refine a git commit message through conversation.\n\
         The user may ask questions about the changes or request adjustments.\n\
         When asked to adjust the message, reply with the complete revised commit \
         message and nothing else. When answering a question, reply in plain prose.\n\n\
         ## Diff\n{diff}\n\n\
         ## Current draft commit message\n{working_draft}"
    )
}

/// Prompt for the `/apply` request: one final complete message, built from
/// the diff, the seed draft, the current working draft, and the rendered
/// conversation so far.
///
/// The current working draft is embedded even though the result replaces
/// it wholesale; the extra context measurably shapes the model's output.
pub fn apply_prompt(diff: &str, seed_draft: &str, working_draft: &str, history: &[Turn]) -> String {
    format!(
        "Produce one final, complete git commit message for the changes below.\n\
         Take the conversation into account. Output ONLY the raw commit message.\n\n\
         ## Diff\n{diff}\n\n\
         ## Original draft\n{seed_draft}\n\n\
         ## Current working draft\n{working_draft}\n\n\
         ## Conversation\n{}",
        render_history(history)
    )
}

/// Render history turns as labeled lines for embedding in a prompt.
pub fn render_history(history: &[Turn]) -> String {
    history
        .iter()
        .map(|turn| {
            let label = match turn.role {
                Role::User => "User",
                Role::Assistant => "Assistant",
            };
            format!("{label}: {}", turn.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
