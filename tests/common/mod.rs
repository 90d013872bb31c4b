//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::Path;
use std::process::Command;

/// A test git repository built by shelling out to `git`, the same way the
/// crate itself talks to it.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
}

impl TestRepo {
    /// Create a fresh repository with user identity configured.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = TestRepo { dir };
        repo.git(&["init"]);
        repo.git(&["config", "user.name", "Test User"]);
        repo.git(&["config", "user.email", "test@example.com"]);
        repo
    }

    /// Create a repository that already has an initial commit, so that
    /// `git diff HEAD` has a baseline.
    pub fn with_initial_commit() -> Self {
        let repo = TestRepo::new();
        repo.write_file("base.txt", "baseline\n");
        repo.git(&["add", "base.txt"]);
        repo.git(&["commit", "-m", "initial commit"]);
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Run a git command in the repository, panicking on failure.
    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.path())
            .output()
            .unwrap_or_else(|e| panic!("Failed to run git {args:?}: {e}"));
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    /// Write (or overwrite) a file relative to the repository root.
    pub fn write_file(&self, name: &str, content: &str) {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(path, content).expect("Failed to write test file");
    }

    /// Write a file and stage it.
    pub fn stage_file(&self, name: &str, content: &str) {
        self.write_file(name, content);
        self.git(&["add", name]);
    }

    /// Subject line of the most recent commit.
    pub fn head_subject(&self) -> String {
        self.git(&["log", "-1", "--pretty=%s"]).trim().to_string()
    }

    /// Full message body of the most recent commit.
    pub fn head_message(&self) -> String {
        self.git(&["log", "-1", "--pretty=%B"]).trim().to_string()
    }

    /// Number of commits on HEAD.
    pub fn commit_count(&self) -> usize {
        self.git(&["rev-list", "--count", "HEAD"])
            .trim()
            .parse()
            .expect("Failed to parse commit count")
    }
}
