use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedFile {
    pub name: String,
    pub content: Vec<u8>,
}

impl TrackedFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// An immutable snapshot: every tracked file plus its commit message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub branch: String,
    pub number: u32,
    pub files: Vec<TrackedFile>,
    /// `None` when the message file is missing, e.g. after an interrupted write.
    pub message: Option<String>,
}

impl Version {
    pub fn file_names(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn file(&self, name: &str) -> Option<&TrackedFile> {
        self.files.iter().find(|f| f.name == name)
    }
}

/// One line of history as shown by `log`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    pub number: u32,
    pub message: String,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct History {
    pub branch: String,
    pub versions: Vec<VersionInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoStatus {
    pub branch: String,
    pub version: u32,
    pub tracked: Vec<String>,
}

impl RepoStatus {
    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchInfo {
    pub name: String,
    pub latest_version: u32,
    pub current: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeSide {
    Target,
    Source,
}

impl MergeSide {
    pub fn as_str(&self) -> &str {
        match self {
            MergeSide::Target => "target",
            MergeSide::Source => "source",
        }
    }
}

/// What a merge produced on the target branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    pub target: String,
    pub source: String,
    pub version: u32,
    pub message: String,
    /// File names written into the new version, with the side each copy came from.
    pub included: Vec<(String, MergeSide)>,
    /// Source files the user wanted that were not copied.
    pub skipped: Vec<String>,
}

impl MergeOutcome {
    pub fn commit_message(source: &str, target: &str) -> String {
        format!("Merged {} into {}", source, target)
    }
}
