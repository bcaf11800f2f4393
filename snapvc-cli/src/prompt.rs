//! Interactive merge decisions on the terminal.

use dialoguer::Confirm;
use snapvc_core::{DecisionProvider, MergeSide};
use tracing::warn;

/// Asks each question with a yes/no prompt. A failed or interrupted prompt
/// counts as "no".
pub struct TerminalDecisions;

impl TerminalDecisions {
    fn confirm(prompt: String) -> bool {
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or_else(|err| {
                warn!(%err, "prompt aborted, answering no");
                false
            })
    }
}

impl DecisionProvider for TerminalDecisions {
    fn include_file(&mut self, name: &str, branch: &str, side: MergeSide) -> bool {
        Self::confirm(format!(
            "Copy {} file {} (from {}) into the merge result?",
            side.as_str(),
            name,
            branch
        ))
    }

    fn overwrite_file(&mut self, name: &str) -> bool {
        Self::confirm(format!("Overwrite the target file {}?", name))
    }
}
