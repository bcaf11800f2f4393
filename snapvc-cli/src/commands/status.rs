use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

pub fn run(root: PathBuf, json: bool) -> Result<()> {
    let repo = super::open_repo(root)?;
    let status = repo.status()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!(
        "On the {} branch, version {}",
        status.branch.cyan().bold(),
        status.version.to_string().bold()
    );

    if status.is_empty() {
        println!("{}", "No files are being tracked".yellow());
        println!("Run {} to start tracking", "snapvc add <file>".cyan());
        return Ok(());
    }

    println!("{}", "Tracked files:".bold());
    for name in &status.tracked {
        println!("  {}", name);
    }

    Ok(())
}
