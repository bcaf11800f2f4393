use crate::prompt::TerminalDecisions;
use anyhow::{Context, Result};
use colored::Colorize;
use snapvc_core::{DecisionProvider, FixedDecision, MergeSide, SourceConflictPolicy};
use std::path::PathBuf;

pub fn run(
    root: PathBuf,
    target: String,
    source: String,
    yes: bool,
    policy: Option<SourceConflictPolicy>,
) -> Result<()> {
    let mut repo = super::open_repo(root)?;
    if let Some(policy) = policy {
        repo = repo.with_merge_policy(policy);
    }

    println!(
        "{} {} {} {}",
        "Merging".bold().cyan(),
        source.bold(),
        "into".bold().cyan(),
        target.bold()
    );
    println!(
        "  {}: {}",
        "Policy".bold(),
        repo.config().merge_policy.to_string().dimmed()
    );
    println!();

    let mut terminal = TerminalDecisions;
    let mut always = FixedDecision(true);
    let decisions: &mut dyn DecisionProvider = if yes { &mut always } else { &mut terminal };

    let outcome = repo
        .merge(&target, &source, decisions)
        .with_context(|| format!("cannot merge '{}' into '{}'", source, target))?;

    println!();
    for (name, side) in &outcome.included {
        let from = match side {
            MergeSide::Target => outcome.target.as_str(),
            MergeSide::Source => outcome.source.as_str(),
        };
        println!("  {} {} {}", "✓".green(), name, format!("(from {})", from).dimmed());
    }
    for name in &outcome.skipped {
        println!("  {} {} {}", "✗".red(), name, "(not copied)".dimmed());
    }

    println!();
    println!(
        "{}",
        format!("✓ {}", outcome.message).green().bold()
    );
    println!("  {}: {}", "Version".bold(), outcome.version);

    Ok(())
}
