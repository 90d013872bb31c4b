//! Chat refinement loop: a turn-based conversation that resolves to an
//! updated draft or a cancellation.
//!
//! The session owns a working draft seeded from the editor buffer, an
//! append-only turn history, and at most one live suggestion. All state is
//! scoped to a single activation and discarded when the loop exits; a
//! cancelled session leaves the caller's draft exactly as it was.

use tracing::debug;

use crate::llm::{apply_prompt, chat_system_prompt, ChatModel, Turn};

/// Commit-type prefixes recognized by [`is_draft_proposal`].
const DRAFT_PREFIXES: [&str; 5] = ["feat:", "fix:", "chore:", "docs:", "refactor:"];

/// Classify an assistant reply as a full replacement draft candidate.
///
/// A reply qualifies when it spans multiple lines or contains one of the
/// conventional-commit type prefixes. This is a text-sniffing heuristic:
/// a multi-line prose answer is a false positive, and a single-line
/// rewrite without a known prefix is a false negative. Such misreads only
/// affect whether `/accept` has something to take; they never change the
/// draft on their own.
pub fn is_draft_proposal(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }
    trimmed.lines().count() > 1 || DRAFT_PREFIXES.iter().any(|p| trimmed.contains(p))
}

/// Terminal result of one refinement activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefineOutcome {
    /// The user bailed out; the caller keeps the untouched seed draft.
    Cancelled,
    /// `/apply` was confirmed; this text replaces the draft wholesale.
    Applied(String),
}

/// Interaction surface for the loop. The terminal implementation lives in
/// `ui`; tests drive the loop with scripted values.
pub trait RefineIo {
    /// Read one line of user input. `None` means end-of-input or an
    /// interrupt, both equivalent to `/cancel`.
    fn read_query(&mut self) -> Option<String>;

    /// Show a proposed final message and ask for yes/no confirmation.
    fn confirm_apply(&mut self, proposal: &str) -> bool;

    /// Show an assistant chat reply.
    fn show_reply(&mut self, reply: &str);

    /// Show a one-line notice.
    fn notice(&mut self, message: &str);
}

enum Command {
    Cancel,
    Accept,
    Apply,
    Query(String),
}

/// Slash commands match case-insensitively on the trimmed line; an empty
/// line cancels.
fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Cancel;
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "/cancel" => Command::Cancel,
        "/accept" => Command::Accept,
        "/apply" => Command::Apply,
        _ => Command::Query(trimmed.to_string()),
    }
}

/// Conversation state for one refinement activation.
#[derive(Debug, Clone)]
pub struct ChatSession {
    diff: String,
    seed: String,
    working_draft: String,
    history: Vec<Turn>,
    last_suggestion: Option<String>,
}

impl ChatSession {
    /// Start a session with `working_draft` equal to the seed.
    pub fn new(diff: impl Into<String>, seed: impl Into<String>) -> Self {
        let seed = seed.into();
        ChatSession {
            diff: diff.into(),
            working_draft: seed.clone(),
            seed,
            history: Vec::new(),
            last_suggestion: None,
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn working_draft(&self) -> &str {
        &self.working_draft
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn last_suggestion(&self) -> Option<&str> {
        self.last_suggestion.as_deref()
    }

    /// Record a plain user query: appended to history, and any live
    /// suggestion is cleared.
    pub fn push_query(&mut self, query: &str) {
        self.history.push(Turn::user(query));
        self.last_suggestion = None;
    }

    /// Record an assistant reply, promoting it to the live suggestion when
    /// it reads like a complete draft.
    pub fn push_reply(&mut self, reply: &str) {
        self.history.push(Turn::assistant(reply));
        if is_draft_proposal(reply) {
            self.last_suggestion = Some(reply.trim().to_string());
        }
    }

    /// Record a failed model call as a diagnostic history entry. The
    /// session stays usable.
    pub fn push_turn_error(&mut self, message: &str) {
        self.history
            .push(Turn::assistant(format!("(LLM Error: {message})")));
    }

    /// Consume the live suggestion into the working draft.
    ///
    /// Returns `false` (a no-op) when there is no suggestion. On success,
    /// two synthetic turns record the acceptance so later `/apply` prompts
    /// see it.
    pub fn accept(&mut self) -> bool {
        match self.last_suggestion.take() {
            None => false,
            Some(suggestion) => {
                self.working_draft = suggestion;
                self.history.push(Turn::user("/accept"));
                self.history
                    .push(Turn::assistant("(Suggestion accepted as working draft.)"));
                true
            }
        }
    }

    /// System prompt for a chat turn, parameterized by the diff and the
    /// current working draft.
    pub fn chat_system(&self) -> String {
        chat_system_prompt(&self.diff, &self.working_draft)
    }

    /// Prompt for the `/apply` request.
    pub fn apply_request(&self) -> String {
        apply_prompt(&self.diff, &self.seed, &self.working_draft, &self.history)
    }
}

/// Drive one refinement activation to completion.
///
/// `Cancelled` means the caller must keep its seed draft; `Applied` carries
/// the confirmed replacement. The loop never returns an absent draft.
pub async fn run_refinement(
    session: &mut ChatSession,
    model: &dyn ChatModel,
    io: &mut dyn RefineIo,
) -> RefineOutcome {
    loop {
        let Some(line) = io.read_query() else {
            return RefineOutcome::Cancelled;
        };

        match parse_command(&line) {
            Command::Cancel => return RefineOutcome::Cancelled,

            Command::Accept => {
                if session.accept() {
                    io.notice("Suggestion accepted as the working draft.");
                } else {
                    io.notice("No suggestion to accept yet.");
                }
            }

            Command::Apply => {
                let prompt = session.apply_request();
                debug!(turns = session.history().len(), "Sending /apply request");
                match model.complete(None, &[Turn::user(prompt)]).await {
                    Ok(text) if text.trim().is_empty() => {
                        io.notice("LLM returned an empty message; nothing applied.");
                    }
                    Ok(text) => {
                        if io.confirm_apply(&text) {
                            return RefineOutcome::Applied(text);
                        }
                        io.notice("Proposal discarded; working draft unchanged.");
                    }
                    Err(e) => {
                        io.notice(&format!("LLM error during /apply: {e}"));
                    }
                }
            }

            Command::Query(query) => {
                session.push_query(&query);
                let system = session.chat_system();
                match model.complete(Some(&system), session.history()).await {
                    Ok(reply) => {
                        io.show_reply(&reply);
                        session.push_reply(&reply);
                        if session.last_suggestion().is_some() {
                            io.notice(
                                "This looks like a full draft. /accept to take it, /apply for a final pass, /cancel to exit.",
                            );
                        }
                    }
                    Err(e) => {
                        let message = e.to_string();
                        session.push_turn_error(&message);
                        io.notice(&format!("LLM error: {message}"));
                    }
                }
            }
        }
    }
}
