//! Directory roles derived from a single repository root.
//!
//! ```text
//! <root>/currentBranch.txt
//! <root>/currentVersion.txt
//! <root>/files/                          staging area
//! <root>/history/<branch>/version_<N>/   one per snapshot
//! ```

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

pub const DEFAULT_REPO_DIR: &str = ".vcs";
pub const BRANCH_FILE: &str = "currentBranch.txt";
pub const VERSION_FILE: &str = "currentVersion.txt";
pub const STAGING_DIR: &str = "files";
pub const HISTORY_DIR: &str = "history";
pub const MESSAGE_FILE: &str = "commit_message.txt";
pub const VERSION_PREFIX: &str = "version_";
pub const LOCK_FILE: &str = "repo.lock";
pub const CONFIG_FILE: &str = "config.toml";
pub const MAIN_BRANCH: &str = "main";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathLayout {
    root: PathBuf,
    working_dir: PathBuf,
}

impl PathLayout {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        let root = root.into();
        // A bare ".vcs" has an empty parent; the working directory is then ".".
        let working_dir = root
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self { root, working_dir }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The user's project directory; checkouts restore files here.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.root.join(STAGING_DIR)
    }

    pub fn history_dir(&self) -> PathBuf {
        self.root.join(HISTORY_DIR)
    }

    pub fn branch_dir(&self, branch: &str) -> PathBuf {
        self.history_dir().join(branch)
    }

    pub fn version_dir(&self, branch: &str, number: u32) -> PathBuf {
        self.branch_dir(branch).join(version_dir_name(number))
    }

    pub fn message_path(&self, branch: &str, number: u32) -> PathBuf {
        self.version_dir(branch, number).join(MESSAGE_FILE)
    }

    pub fn branch_file(&self) -> PathBuf {
        self.root.join(BRANCH_FILE)
    }

    pub fn version_file(&self) -> PathBuf {
        self.root.join(VERSION_FILE)
    }

    pub fn lock_file(&self) -> PathBuf {
        self.root.join(LOCK_FILE)
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }
}

impl Default for PathLayout {
    fn default() -> Self {
        Self::new(DEFAULT_REPO_DIR)
    }
}

pub fn version_dir_name(number: u32) -> String {
    format!("{}{}", VERSION_PREFIX, number)
}

/// Parses `version_<N>`; anything else yields `None`.
pub fn parse_version_dir_name(name: &str) -> Option<u32> {
    let digits = name.strip_prefix(VERSION_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Branch names become a single directory segment under `history/`.
pub fn validate_branch_name(name: &str) -> Result<()> {
    let bad = name.is_empty()
        || name.trim() != name
        || name.starts_with('.')
        || name.contains(['/', '\\'])
        || name.chars().any(char::is_control);

    if bad {
        return Err(Error::InvalidName(format!("branch name '{}'", name)));
    }
    Ok(())
}

/// Tracked files are flat: only the base name of a path is kept.
pub fn tracked_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| n != MESSAGE_FILE)
        .ok_or_else(|| Error::InvalidName(format!("file '{}'", path.display())))
}
