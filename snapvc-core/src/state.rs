//! The two scalar facts that survive between invocations.

use crate::error::{Error, Result};
use crate::layout::PathLayout;
use std::fs;
use std::io;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistentState {
    pub branch: String,
    pub version: u32,
}

impl PersistentState {
    pub fn new(branch: impl Into<String>, version: u32) -> Self {
        Self {
            branch: branch.into(),
            version,
        }
    }

    /// Reads `currentBranch.txt` and `currentVersion.txt`.
    ///
    /// A missing file means the repository was never initialized.
    pub fn load(layout: &PathLayout) -> Result<Self> {
        let branch = read_state_file(&layout.branch_file())?;
        let raw_version = read_state_file(&layout.version_file())?;
        let version = raw_version
            .parse::<u32>()
            .map_err(|_| Error::Format(raw_version.clone()))?;

        Ok(Self { branch, version })
    }

    pub fn save(&self, layout: &PathLayout) -> Result<()> {
        fs::write(layout.branch_file(), &self.branch)?;
        fs::write(layout.version_file(), self.version.to_string())?;
        debug!(branch = %self.branch, version = self.version, "persisted state");
        Ok(())
    }
}

fn read_state_file(path: &std::path::Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text.trim().to_string()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::NotInitialized),
        Err(e) => Err(e.into()),
    }
}
