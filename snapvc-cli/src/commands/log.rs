use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

pub fn run(root: PathBuf, json: bool) -> Result<()> {
    let repo = super::open_repo(root)?;
    let history = repo.log()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&history)?);
        return Ok(());
    }

    println!("On the {} branch", history.branch.cyan().bold());

    if history.versions.is_empty() {
        println!("{}", "No versions yet".yellow());
        return Ok(());
    }

    for version in &history.versions {
        let date = version
            .timestamp
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();

        println!(
            "{} {}: {}  {}",
            "Version".yellow().bold(),
            version.number.to_string().yellow(),
            version.message,
            date.dimmed()
        );
    }

    Ok(())
}
