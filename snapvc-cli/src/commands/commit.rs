use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

pub fn run(root: PathBuf, message: String) -> Result<()> {
    let repo = super::open_repo(root)?;
    let version = repo.commit(&message)?;

    println!("{}", "✓ Commit created successfully!".green().bold());
    println!("  {}: {}", "Version".bold(), version);
    println!("  {}: {}", "Message".bold(), message);

    Ok(())
}
