use anyhow::Result;
use colored::Colorize;
use snapvc_core::Repository;
use std::path::PathBuf;

pub fn run(root: PathBuf) -> Result<()> {
    let repo = Repository::init(root)?;

    println!(
        "{} {}",
        "Initialized empty repository in".green(),
        repo.layout().root().display().to_string().bold()
    );

    Ok(())
}
