use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

pub fn create(root: PathBuf, name: String) -> Result<()> {
    let repo = super::open_repo(root)?;
    let version = repo
        .create_branch(&name)
        .with_context(|| format!("cannot create branch '{}'", name))?;

    println!(
        "{} {} {}",
        "✓ Branch".green().bold(),
        name.bold(),
        "created successfully".green().bold()
    );
    println!("  {}: {}", "Version".bold(), version.number);
    println!("  {}: {}", "Files".bold(), version.files.len());

    Ok(())
}

pub fn switch(root: PathBuf, name: String) -> Result<()> {
    let repo = super::open_repo(root)?;
    let state = repo
        .checkout_branch(&name)
        .with_context(|| format!("cannot switch to branch '{}'", name))?;

    println!(
        "{} {} {}",
        "Checked out to branch".green(),
        state.branch.bold(),
        format!("(version {})", state.version).dimmed()
    );

    Ok(())
}

pub fn list(root: PathBuf) -> Result<()> {
    let repo = super::open_repo(root)?;

    for branch in repo.branches()? {
        let marker = if branch.current { "*".green().bold() } else { " ".normal() };
        let name = if branch.current {
            branch.name.green().bold()
        } else {
            branch.name.normal()
        };

        println!(
            "{} {} {}",
            marker,
            name,
            format!("(latest version {})", branch.latest_version).dimmed()
        );
    }

    Ok(())
}
