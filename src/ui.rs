//! Terminal implementations of the interaction surfaces.
//!
//! All interactive reads go through stdin and dialoguer; everything here
//! is deliberately thin so the loops behind [`DraftSurface`] and
//! [`RefineIo`] stay testable with scripted implementations.

use std::io::{self, BufRead, Write};

use console::style;
use dialoguer::{Confirm, Editor};
use tracing::warn;

use crate::editor::{DraftAction, DraftSurface};
use crate::refine::RefineIo;

/// Interactive terminal frontend.
pub struct TerminalUi;

impl TerminalUi {
    pub fn new() -> Self {
        TerminalUi
    }

    /// Yes/no confirmation; interrupts count as "no".
    pub fn confirm(&self, prompt: &str, default: bool) -> bool {
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .unwrap_or(false)
    }

    fn read_line(&self) -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                warn!("Failed to read input: {e}");
                None
            }
        }
    }

    fn print_draft(&self, draft: &str) {
        println!("\n{}", style("Current commit message:").cyan());
        println!("{}", "-".repeat(50));
        if draft.trim().is_empty() {
            println!("{}", style("(empty)").dim());
        } else {
            println!("{draft}");
        }
        println!("{}", "-".repeat(50));
    }
}

impl Default for TerminalUi {
    fn default() -> Self {
        TerminalUi::new()
    }
}

impl DraftSurface for TerminalUi {
    fn review(&mut self, draft: &str) -> DraftAction {
        loop {
            self.print_draft(draft);
            println!("  [c] commit this message (default)");
            println!("  [e] edit in $EDITOR");
            println!("  [r] refine via chat");
            println!("  [q] abort");
            print!("> ");
            let _ = io::stdout().flush();

            let Some(line) = self.read_line() else {
                return DraftAction::Abort;
            };

            match line.trim().to_ascii_lowercase().as_str() {
                "" | "c" => return DraftAction::Commit,
                "e" => return DraftAction::Edit,
                "r" => return DraftAction::Refine,
                "q" => return DraftAction::Abort,
                other => {
                    println!("{}", style(format!("Unknown choice '{other}'.")).yellow());
                }
            }
        }
    }

    fn edit_text(&mut self, prefill: &str) -> Option<String> {
        match Editor::new().edit(prefill) {
            Ok(Some(edited)) => Some(edited.trim_end().to_string()),
            Ok(None) => None,
            Err(e) => {
                eprintln!("{}", style(format!("Could not open editor: {e}")).red());
                None
            }
        }
    }

    fn notice(&mut self, message: &str) {
        println!("{}", style(message).cyan());
    }
}

impl RefineIo for TerminalUi {
    fn read_query(&mut self) -> Option<String> {
        print!("{} ", style("chat>").magenta());
        let _ = io::stdout().flush();
        self.read_line()
    }

    fn confirm_apply(&mut self, proposal: &str) -> bool {
        println!("\n{}", style("Proposed final message:").cyan());
        println!("{}", "-".repeat(50));
        println!("{proposal}");
        println!("{}", "-".repeat(50));
        self.confirm("Replace the draft with this message?", true)
    }

    fn show_reply(&mut self, reply: &str) {
        if reply.trim().is_empty() {
            println!("{}", style("(empty reply)").dim());
        } else {
            println!("{reply}");
        }
    }

    fn notice(&mut self, message: &str) {
        println!("{}", style(message).cyan());
    }
}
