use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

pub fn run(root: PathBuf, file: String) -> Result<()> {
    let repo = super::open_repo(root)?;
    repo.remove(&file)?;

    println!("{} {}", "Removed".yellow(), file.bold());
    Ok(())
}
