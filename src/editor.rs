//! Draft editor: owns the commit message buffer between generation and
//! commit.
//!
//! The buffer changes in exactly two ways: the user edits it directly, or
//! one chat refinement activation returns a replacement. While refinement
//! runs the editor is suspended (a nested call), so the buffer has a
//! single writer at all times.

use crate::git::Diff;
use crate::llm::ChatModel;
use crate::refine::{run_refinement, ChatSession, RefineIo, RefineOutcome};

/// What the user chose after reviewing the current draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftAction {
    /// Use the draft as-is.
    Commit,
    /// Open the multi-line editing buffer.
    Edit,
    /// Hand the draft to the chat refinement loop.
    Refine,
    /// Give up without committing.
    Abort,
}

/// Review/editing capability of the terminal. Tests use scripted values.
pub trait DraftSurface {
    /// Show the draft and ask what to do next. End-of-input maps to
    /// [`DraftAction::Abort`].
    fn review(&mut self, draft: &str) -> DraftAction;

    /// Open a multi-line buffer pre-filled with `prefill`. `None` when the
    /// edit itself was cancelled, leaving the draft unchanged.
    fn edit_text(&mut self, prefill: &str) -> Option<String>;

    /// Show a one-line notice.
    fn notice(&mut self, message: &str);
}

/// Final result of the edit session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Commit with this message (may still be empty; the flow treats an
    /// empty final message as an abort).
    Commit(String),
    Aborted,
}

/// Run the interactive edit session until the user commits or aborts.
pub async fn edit_draft(
    initial: String,
    diff: &Diff,
    model: &dyn ChatModel,
    surface: &mut dyn DraftSurface,
    refine_io: &mut dyn RefineIo,
) -> EditOutcome {
    let mut draft = initial;

    loop {
        match surface.review(&draft) {
            DraftAction::Commit => return EditOutcome::Commit(draft),

            DraftAction::Edit => match surface.edit_text(&draft) {
                Some(edited) => draft = edited,
                None => surface.notice("Edit cancelled; draft unchanged."),
            },

            DraftAction::Refine => {
                // The buffer's current text becomes the seed; the session
                // owns a copy and the result replaces the buffer wholesale.
                let mut session = ChatSession::new(diff.text.clone(), draft.clone());
                match run_refinement(&mut session, model, refine_io).await {
                    RefineOutcome::Applied(text) => {
                        draft = text;
                        surface.notice("Draft updated from chat refinement.");
                    }
                    RefineOutcome::Cancelled => {
                        surface.notice("Chat refinement cancelled; draft unchanged.");
                    }
                }
            }

            DraftAction::Abort => return EditOutcome::Aborted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use crate::git::DiffMode;
    use crate::llm::Turn;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct FakeModel {
        replies: Mutex<VecDeque<String>>,
    }

    impl FakeModel {
        fn scripted<I: IntoIterator<Item = &'static str>>(replies: I) -> Self {
            FakeModel {
                replies: Mutex::new(replies.into_iter().map(str::to_string).collect()),
            }
        }
    }

    #[async_trait]
    impl ChatModel for FakeModel {
        async fn complete(
            &self,
            _system: Option<&str>,
            _turns: &[Turn],
        ) -> Result<String, ModelError> {
            Ok(self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("model called more times than scripted"))
        }
    }

    struct ScriptedSurface {
        actions: VecDeque<DraftAction>,
        edits: VecDeque<Option<String>>,
        seen_drafts: Vec<String>,
    }

    impl ScriptedSurface {
        fn new<I: IntoIterator<Item = DraftAction>>(actions: I) -> Self {
            ScriptedSurface {
                actions: actions.into_iter().collect(),
                edits: VecDeque::new(),
                seen_drafts: Vec::new(),
            }
        }

        fn with_edits<I: IntoIterator<Item = Option<&'static str>>>(mut self, edits: I) -> Self {
            self.edits = edits.into_iter().map(|e| e.map(str::to_string)).collect();
            self
        }
    }

    impl DraftSurface for ScriptedSurface {
        fn review(&mut self, draft: &str) -> DraftAction {
            self.seen_drafts.push(draft.to_string());
            self.actions.pop_front().unwrap_or(DraftAction::Abort)
        }

        fn edit_text(&mut self, _prefill: &str) -> Option<String> {
            self.edits.pop_front().expect("unexpected edit")
        }

        fn notice(&mut self, _message: &str) {}
    }

    struct ScriptedRefineIo {
        lines: VecDeque<Option<String>>,
        confirm: bool,
    }

    impl ScriptedRefineIo {
        fn with_lines<I: IntoIterator<Item = &'static str>>(lines: I, confirm: bool) -> Self {
            ScriptedRefineIo {
                lines: lines.into_iter().map(|l| Some(l.to_string())).collect(),
                confirm,
            }
        }
    }

    impl RefineIo for ScriptedRefineIo {
        fn read_query(&mut self) -> Option<String> {
            self.lines.pop_front().unwrap_or(None)
        }

        fn confirm_apply(&mut self, _proposal: &str) -> bool {
            self.confirm
        }

        fn show_reply(&mut self, _reply: &str) {}

        fn notice(&mut self, _message: &str) {}
    }

    fn diff() -> Diff {
        Diff {
            text: "+line\n".to_string(),
            mode: DiffMode::Staged,
        }
    }

    #[tokio::test]
    async fn commit_returns_current_draft() {
        let model = FakeModel::scripted([]);
        let mut surface = ScriptedSurface::new([DraftAction::Commit]);
        let mut refine_io = ScriptedRefineIo::with_lines([], false);

        let outcome = edit_draft(
            "feat: initial".to_string(),
            &diff(),
            &model,
            &mut surface,
            &mut refine_io,
        )
        .await;
        assert_eq!(outcome, EditOutcome::Commit("feat: initial".to_string()));
    }

    #[tokio::test]
    async fn edit_replaces_draft() {
        let model = FakeModel::scripted([]);
        let mut surface = ScriptedSurface::new([DraftAction::Edit, DraftAction::Commit])
            .with_edits([Some("fix: edited by hand")]);
        let mut refine_io = ScriptedRefineIo::with_lines([], false);

        let outcome = edit_draft(
            "feat: initial".to_string(),
            &diff(),
            &model,
            &mut surface,
            &mut refine_io,
        )
        .await;
        assert_eq!(outcome, EditOutcome::Commit("fix: edited by hand".to_string()));
    }

    #[tokio::test]
    async fn cancelled_edit_keeps_draft() {
        let model = FakeModel::scripted([]);
        let mut surface =
            ScriptedSurface::new([DraftAction::Edit, DraftAction::Commit]).with_edits([None]);
        let mut refine_io = ScriptedRefineIo::with_lines([], false);

        let outcome = edit_draft(
            "feat: initial".to_string(),
            &diff(),
            &model,
            &mut surface,
            &mut refine_io,
        )
        .await;
        assert_eq!(outcome, EditOutcome::Commit("feat: initial".to_string()));
    }

    #[tokio::test]
    async fn applied_refinement_replaces_buffer_verbatim() {
        let model = FakeModel::scripted(["feat: add login flow\n\nDetails..."]);
        let mut surface = ScriptedSurface::new([DraftAction::Refine, DraftAction::Commit]);
        let mut refine_io = ScriptedRefineIo::with_lines(["/apply"], true);

        let outcome = edit_draft(
            "fix: wip".to_string(),
            &diff(),
            &model,
            &mut surface,
            &mut refine_io,
        )
        .await;
        assert_eq!(
            outcome,
            EditOutcome::Commit("feat: add login flow\n\nDetails...".to_string())
        );
    }

    #[tokio::test]
    async fn cancelled_refinement_keeps_seed_draft() {
        let model = FakeModel::scripted(["feat: something\n\nBody."]);
        let mut surface = ScriptedSurface::new([DraftAction::Refine, DraftAction::Commit]);
        // One chat turn happens, then the user cancels: no leakage.
        let mut refine_io = ScriptedRefineIo::with_lines(["change it up", "/cancel"], false);

        let outcome = edit_draft(
            "fix: wip".to_string(),
            &diff(),
            &model,
            &mut surface,
            &mut refine_io,
        )
        .await;
        assert_eq!(outcome, EditOutcome::Commit("fix: wip".to_string()));
    }

    #[tokio::test]
    async fn abort_discards_everything() {
        let model = FakeModel::scripted([]);
        let mut surface = ScriptedSurface::new([DraftAction::Abort]);
        let mut refine_io = ScriptedRefineIo::with_lines([], false);

        let outcome = edit_draft(
            "feat: initial".to_string(),
            &diff(),
            &model,
            &mut surface,
            &mut refine_io,
        )
        .await;
        assert_eq!(outcome, EditOutcome::Aborted);
    }
}
