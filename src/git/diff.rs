//! Diff collection from the repository via `git diff`.

use std::fmt;
use std::path::Path;

use crate::error::GitError;
use crate::git::{command_failed, run_git};

/// Which changes the diff covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffMode {
    /// Only index-staged changes (`git diff --staged`).
    Staged,
    /// All modifications to tracked files (`git diff HEAD`), excluding
    /// untracked new files.
    Tracked,
}

impl DiffMode {
    pub(crate) fn args(&self) -> &'static [&'static str] {
        match self {
            DiffMode::Staged => &["diff", "--staged"],
            DiffMode::Tracked => &["diff", "HEAD"],
        }
    }

    /// Human description used in progress and empty-diff messages.
    pub fn description(&self) -> &'static str {
        match self {
            DiffMode::Staged => "staged changes",
            DiffMode::Tracked => "unstaged changes in tracked files",
        }
    }
}

impl fmt::Display for DiffMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// An immutable diff produced once per invocation.
///
/// Truncation for the LLM happens downstream on a derived copy; this text
/// is never mutated.
#[derive(Debug, Clone)]
pub struct Diff {
    pub text: String,
    pub mode: DiffMode,
}

impl Diff {
    /// Whether there is nothing to commit for this mode.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Collect the diff for `mode` from the repository at `dir`.
pub fn collect_diff(dir: &Path, mode: DiffMode) -> Result<Diff, GitError> {
    let args = mode.args();
    let output = run_git(dir, args)?;

    if !output.status.success() {
        // `git diff HEAD` fails on a repo with no commits yet.
        return Err(command_failed(&args.join(" "), &output));
    }

    Ok(Diff {
        text: String::from_utf8_lossy(&output.stdout).to_string(),
        mode,
    })
}
