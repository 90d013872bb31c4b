//! Commit and push execution.

use std::io;
use std::path::Path;
use std::process::Command;

use crate::error::{CommitError, PushError};

/// Captured output of a successful git commit or push.
#[derive(Debug, Clone)]
pub struct CommitReport {
    pub stdout: String,
    pub stderr: String,
}

/// Create a commit with `message`.
///
/// With `stage_all_tracked`, runs `git commit -a -m` so modifications to
/// tracked files are staged implicitly (matching the tracked diff scope);
/// untracked files are never added. Otherwise commits exactly what is
/// already staged.
pub fn execute_commit(
    dir: &Path,
    message: &str,
    stage_all_tracked: bool,
) -> Result<CommitReport, CommitError> {
    let mut args = vec!["commit"];
    if stage_all_tracked {
        args.push("-a");
    }
    args.extend(["-m", message]);

    let output = Command::new("git")
        .args(&args)
        .current_dir(dir)
        .output()
        .map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                CommitError::CommandUnavailable
            } else {
                CommitError::SpawnFailed(e)
            }
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if !output.status.success() {
        return Err(CommitError::Rejected {
            code: output.status.code().unwrap_or(-1),
            output: combine(&stdout, &stderr),
        });
    }

    Ok(CommitReport { stdout, stderr })
}

/// Push the current branch to its configured upstream.
///
/// Independent of the commit: a push failure is reported but the commit
/// stands.
pub fn execute_push(dir: &Path) -> Result<CommitReport, PushError> {
    let output = Command::new("git")
        .arg("push")
        .current_dir(dir)
        .output()
        .map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                PushError::CommandUnavailable
            } else {
                PushError::SpawnFailed(e)
            }
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if !output.status.success() {
        return Err(PushError::Rejected {
            code: output.status.code().unwrap_or(-1),
            output: combine(&stdout, &stderr),
        });
    }

    Ok(CommitReport { stdout, stderr })
}

fn combine(stdout: &str, stderr: &str) -> String {
    let mut out = String::new();
    if !stdout.trim().is_empty() {
        out.push_str(stdout.trim());
    }
    if !stderr.trim().is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(stderr.trim());
    }
    if out.is_empty() {
        out.push_str("No output from git.");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::run_git;

    fn init_repo(dir: &Path) {
        run_git(dir, &["init"]).unwrap();
        run_git(dir, &["config", "user.name", "Test"]).unwrap();
        run_git(dir, &["config", "user.email", "test@test.com"]).unwrap();
    }

    #[test]
    fn commit_staged_changes_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path());
        std::fs::write(dir.path().join("a.txt"), "hello\n").unwrap();
        run_git(dir.path(), &["add", "a.txt"]).unwrap();

        let report = execute_commit(dir.path(), "feat: add a.txt", false).unwrap();
        assert!(report.stdout.contains("feat: add a.txt") || !report.stdout.is_empty());

        let log = run_git(dir.path(), &["log", "-1", "--pretty=%s"]).unwrap();
        assert_eq!(
            String::from_utf8_lossy(&log.stdout).trim(),
            "feat: add a.txt"
        );
    }

    #[test]
    fn commit_with_nothing_staged_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path());
        std::fs::write(dir.path().join("a.txt"), "hello\n").unwrap();
        run_git(dir.path(), &["add", "a.txt"]).unwrap();
        run_git(dir.path(), &["commit", "-m", "init"]).unwrap();

        let result = execute_commit(dir.path(), "chore: nothing", false);
        assert!(matches!(result, Err(CommitError::Rejected { .. })));
    }

    #[test]
    fn stage_all_tracked_picks_up_unstaged_modification() {
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path());
        std::fs::write(dir.path().join("a.txt"), "v1\n").unwrap();
        run_git(dir.path(), &["add", "a.txt"]).unwrap();
        run_git(dir.path(), &["commit", "-m", "init"]).unwrap();

        std::fs::write(dir.path().join("a.txt"), "v2\n").unwrap();

        execute_commit(dir.path(), "fix: bump a.txt", true).unwrap();

        let log = run_git(dir.path(), &["log", "-1", "--pretty=%s"]).unwrap();
        assert_eq!(String::from_utf8_lossy(&log.stdout).trim(), "fix: bump a.txt");
    }

    #[test]
    fn push_without_remote_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path());
        std::fs::write(dir.path().join("a.txt"), "hello\n").unwrap();
        run_git(dir.path(), &["add", "a.txt"]).unwrap();
        run_git(dir.path(), &["commit", "-m", "init"]).unwrap();

        let result = execute_push(dir.path());
        assert!(matches!(result, Err(PushError::Rejected { .. })));
    }
}
