//! End-to-end commit flow: diff, generate, edit/refine, commit, push.

use std::path::Path;

use console::style;
use tracing::debug;

use crate::editor::{edit_draft, EditOutcome};
use crate::error::{AppError, GenerateError, GitError};
use crate::generate::generate_message;
use crate::git::{self, collect_diff, Diff, DiffMode};
use crate::llm::HttpModel;
use crate::ui::TerminalUi;

/// Resolved per-invocation configuration (CLI flags over persisted
/// defaults).
pub struct FlowConfig {
    pub mode: DiffMode,
    pub model: String,
    pub system_prompt: String,
    pub max_chars: usize,
    pub key_override: Option<String>,
    /// `--yes`: skip interactive editing and commit the raw generated
    /// message directly.
    pub skip_editing: bool,
}

/// Clean (exit 0) terminations of the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowResult {
    Committed,
    Aborted,
    NothingToCommit,
}

/// Outcome of diff resolution, including the empty-changeset paths.
#[derive(Debug, Clone)]
pub enum DiffResolution {
    Ready(Diff),
    /// Nothing to commit for this mode (after any retry).
    Empty,
    /// The user declined the auto-stage offer.
    Declined,
}

/// Collect the diff, offering a one-time auto-stage retry for the staged
/// mode.
///
/// An empty staged diff may be remediable: `offer_stage` asks the user
/// whether to stage modifications to tracked files and retry once. An
/// empty tracked diff is terminal — there is nothing to stage safely.
pub fn resolve_diff(
    dir: &Path,
    mode: DiffMode,
    offer_stage: &mut dyn FnMut() -> bool,
) -> Result<DiffResolution, GitError> {
    let diff = collect_diff(dir, mode)?;
    if !diff.is_empty() {
        return Ok(DiffResolution::Ready(diff));
    }

    if mode != DiffMode::Staged {
        return Ok(DiffResolution::Empty);
    }

    if !offer_stage() {
        return Ok(DiffResolution::Declined);
    }

    git::stage_tracked(dir)?;
    let retried = collect_diff(dir, mode)?;
    if retried.is_empty() {
        Ok(DiffResolution::Empty)
    } else {
        Ok(DiffResolution::Ready(retried))
    }
}

/// Run the whole interactive flow against the repository in the current
/// directory.
pub async fn run_commit_flow(config: FlowConfig) -> Result<FlowResult, AppError> {
    let dir = Path::new(".");
    let ui = TerminalUi::new();

    git::check_git_installed().map_err(AppError::Environment)?;
    git::ensure_repository(dir).map_err(AppError::Environment)?;

    // ── Diff ──
    let resolution = resolve_diff(dir, config.mode, &mut || {
        ui.confirm(
            "No staged changes. Stage all modifications to tracked files and retry?",
            true,
        )
    })
    .map_err(AppError::Environment)?;

    let diff = match resolution {
        DiffResolution::Ready(diff) => diff,
        DiffResolution::Declined => {
            println!("Commit aborted.");
            return Ok(FlowResult::Aborted);
        }
        DiffResolution::Empty => {
            println!("No {} to commit.", config.mode.description());
            match git::status_short(dir) {
                Ok(status) if !status.is_empty() => {
                    println!("\nCurrent git status (--short):");
                    println!("{status}");
                }
                Ok(_) => println!("Working tree is clean."),
                Err(e) => debug!("Could not retrieve git status: {e}"),
            }
            return Ok(FlowResult::NothingToCommit);
        }
    };

    // ── Generate ──
    let model = HttpModel::from_env(config.model, config.key_override)
        .map_err(|e| AppError::Generation(GenerateError::ModelFailed(e)))?;

    println!(
        "Generating commit message using {} based on {}...",
        style(model.model_name()).bold(),
        config.mode.description()
    );

    let generated = generate_message(&diff, &config.system_prompt, config.max_chars, &model)
        .await
        .map_err(AppError::Generation)?;

    if generated.is_empty() && !config.skip_editing {
        println!(
            "{}",
            style("LLM returned an empty commit message. Write one manually or abort.").yellow()
        );
    }

    // ── Edit / refine ──
    let final_message = if config.skip_editing {
        if generated.is_empty() {
            return Err(AppError::Generation(GenerateError::EmptyMessage));
        }
        println!("\n{}", style("Using LLM-generated message directly:").cyan());
        println!("\"\"\"\n{generated}\n\"\"\"");
        generated
    } else {
        let mut surface = TerminalUi::new();
        let mut chat_io = TerminalUi::new();
        match edit_draft(generated, &diff, &model, &mut surface, &mut chat_io).await {
            EditOutcome::Commit(message) => message,
            EditOutcome::Aborted => {
                println!("Commit aborted.");
                return Ok(FlowResult::Aborted);
            }
        }
    };

    if final_message.trim().is_empty() {
        println!("Commit aborted.");
        return Ok(FlowResult::Aborted);
    }

    // ── Commit ──
    let stage_all_tracked = config.mode == DiffMode::Tracked;
    let action = if stage_all_tracked {
        "Staging all tracked file changes and committing"
    } else {
        "Committing staged changes"
    };
    println!("\n{action} with message:");
    println!("{}", style(format!("\"\"\"\n{final_message}\n\"\"\"")).yellow());

    if !ui.confirm("Proceed?", true) {
        println!("Commit aborted by user.");
        return Ok(FlowResult::Aborted);
    }

    let report =
        git::execute_commit(dir, &final_message, stage_all_tracked).map_err(AppError::Commit)?;

    println!("\n{}", style("Commit successful!").green());
    if !report.stdout.trim().is_empty() {
        println!("{}", report.stdout.trim_end());
    }
    if !report.stderr.trim().is_empty() {
        println!("{}", report.stderr.trim_end());
    }

    // ── Optional push ──
    if ui.confirm("Push to the configured upstream?", false) {
        let push_report = git::execute_push(dir).map_err(AppError::Push)?;
        println!("{}", style("Push successful!").green());
        if !push_report.stderr.trim().is_empty() {
            println!("{}", push_report.stderr.trim_end());
        }
    }

    Ok(FlowResult::Committed)
}
