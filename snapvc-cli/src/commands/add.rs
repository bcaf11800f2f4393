use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

pub fn run(root: PathBuf, file: PathBuf) -> Result<()> {
    let repo = super::open_repo(root)?;
    let name = repo.add(&file)?;

    println!("{} {}", "Added".green(), name.bold());
    Ok(())
}
