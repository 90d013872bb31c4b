//! Git collaborator: read-only queries and commit execution.
//!
//! All operations shell out to the system `git` binary, inheriting the
//! user's existing git config, hooks, and credential store. Every function
//! takes the repository directory explicitly so tests can run against
//! temporary repos.

pub mod commit;
pub mod diff;

pub use commit::{execute_commit, execute_push, CommitReport};
pub use diff::{collect_diff, Diff, DiffMode};

use std::io;
use std::path::Path;
use std::process::{Command, Output};

use crate::error::GitError;

/// Verify the git executable can be located on PATH.
pub fn check_git_installed() -> Result<(), GitError> {
    which::which("git")
        .map(|_| ())
        .map_err(|_| GitError::CommandUnavailable)
}

/// Verify `dir` is inside a git work tree.
pub fn ensure_repository(dir: &Path) -> Result<(), GitError> {
    let output = run_git(dir, &["rev-parse", "--is-inside-work-tree"])?;
    if output.status.success() {
        Ok(())
    } else {
        Err(GitError::NotARepository)
    }
}

/// Stage modifications to tracked files only (`git add -u`).
///
/// Untracked files are deliberately left alone; this mirrors the scope of
/// the tracked diff mode.
pub fn stage_tracked(dir: &Path) -> Result<(), GitError> {
    let output = run_git(dir, &["add", "-u"])?;
    if output.status.success() {
        Ok(())
    } else {
        Err(command_failed("add -u", &output))
    }
}

/// Short git status, for the "nothing to commit" report.
pub fn status_short(dir: &Path) -> Result<String, GitError> {
    let output = run_git(dir, &["status", "--short"])?;
    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
    } else {
        Err(command_failed("status --short", &output))
    }
}

/// Run a git command in `dir`, capturing output.
///
/// A NotFound spawn error maps to [`GitError::CommandUnavailable`];
/// non-zero exits are left to the caller to classify.
pub(crate) fn run_git(dir: &Path, args: &[&str]) -> Result<Output, GitError> {
    Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                GitError::CommandUnavailable
            } else {
                GitError::SpawnFailed {
                    command: args.join(" "),
                    source: e,
                }
            }
        })
}

/// Build a [`GitError::CommandFailed`] from a non-zero exit.
pub(crate) fn command_failed(command: &str, output: &Output) -> GitError {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let combined = if stderr.trim().is_empty() {
        stdout.trim().to_string()
    } else {
        stderr.trim().to_string()
    };
    GitError::CommandFailed {
        command: command.to_string(),
        output: combined,
    }
}
