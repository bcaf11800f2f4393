use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

pub fn run(root: PathBuf, version: u32) -> Result<()> {
    let repo = super::open_repo(root)?;
    let restored = repo.checkout(version)?;

    println!(
        "{} {}",
        "Checked out version".green(),
        version.to_string().bold()
    );
    for name in restored.file_names() {
        println!("  {} {}", "✓".green(), name);
    }

    Ok(())
}
