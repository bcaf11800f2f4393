//! Version snapshots stored as plain directories of full-file copies.

use crate::error::{Error, Result};
use crate::fsutil;
use crate::layout::{self, PathLayout, MESSAGE_FILE};
use crate::models::{TrackedFile, Version, VersionInfo};
use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use tracing::{debug, info};

pub struct VersionStore<'a> {
    layout: &'a PathLayout,
}

impl<'a> VersionStore<'a> {
    pub fn new(layout: &'a PathLayout) -> Self {
        Self { layout }
    }

    pub fn branch_exists(&self, branch: &str) -> bool {
        self.layout.branch_dir(branch).is_dir()
    }

    pub fn version_exists(&self, branch: &str, number: u32) -> bool {
        self.layout.version_dir(branch, number).is_dir()
    }

    /// Numbers of every `version_<N>` directory of `branch`, ascending.
    ///
    /// This is a best-effort scan: entries that do not match `version_<N>`
    /// are skipped, and a branch without a directory has no versions.
    pub fn version_numbers(&self, branch: &str) -> Result<Vec<u32>> {
        let branch_dir = self.layout.branch_dir(branch);
        let entries = match fsutil::list_entries(&branch_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut numbers: Vec<u32> = entries
            .iter()
            .filter_map(|name| {
                let parsed = layout::parse_version_dir_name(name);
                if parsed.is_none() {
                    debug!(branch, entry = %name, "skipping non-version entry");
                }
                parsed
            })
            .collect();
        numbers.sort_unstable();
        Ok(numbers)
    }

    /// Highest version number of `branch`, or 0 when it has none.
    pub fn latest_version(&self, branch: &str) -> Result<u32> {
        Ok(self.version_numbers(branch)?.last().copied().unwrap_or(0))
    }

    /// Number the next version of `branch` gets: one past its latest.
    pub fn next_version(&self, branch: &str) -> Result<u32> {
        let latest = self.latest_version(branch)?;
        latest.checked_add(1).ok_or_else(|| {
            Error::Format(format!(
                "version {} on branch {} has no successor",
                latest, branch
            ))
        })
    }

    /// Writes a new snapshot. Never overwrites an existing version.
    ///
    /// A failure partway leaves the partially written directory behind.
    pub fn create_version(
        &self,
        branch: &str,
        number: u32,
        files: &[TrackedFile],
        message: &str,
    ) -> Result<()> {
        let version_dir = self.layout.version_dir(branch, number);

        fs::create_dir(&version_dir).map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => {
                Error::already_exists(format!("version {} on branch {}", number, branch))
            }
            io::ErrorKind::NotFound => Error::not_found(format!("branch {}", branch)),
            _ => Error::Io(e),
        })?;

        for file in files {
            fs::write(version_dir.join(&file.name), &file.content)?;
        }
        fs::write(version_dir.join(MESSAGE_FILE), message)?;

        info!(branch, number, files = files.len(), "created version");
        Ok(())
    }

    pub fn read_version(&self, branch: &str, number: u32) -> Result<Version> {
        let version_dir = self.layout.version_dir(branch, number);
        let names = fsutil::list_files(&version_dir).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => {
                Error::not_found(format!("version {} on branch {}", number, branch))
            }
            _ => Error::Io(e),
        })?;

        let mut files = Vec::with_capacity(names.len());
        let mut message = None;
        for name in names {
            let content = fs::read(version_dir.join(&name))?;
            if name == MESSAGE_FILE {
                message = Some(String::from_utf8_lossy(&content).into_owned());
            } else {
                files.push(TrackedFile { name, content });
            }
        }

        Ok(Version {
            branch: branch.to_string(),
            number,
            files,
            message,
        })
    }

    /// Full history of `branch` in ascending version order.
    pub fn list_versions(&self, branch: &str) -> Result<Vec<VersionInfo>> {
        if !self.branch_exists(branch) {
            return Err(Error::not_found(format!("branch {}", branch)));
        }

        self.version_numbers(branch)?
            .into_iter()
            .map(|number| {
                let message_path = self.layout.message_path(branch, number);
                let message = fs::read_to_string(&message_path).map_err(|e| match e.kind() {
                    io::ErrorKind::NotFound => {
                        Error::not_found(format!("commit message for version {}", number))
                    }
                    _ => Error::Io(e),
                })?;
                let timestamp = fs::metadata(&message_path)
                    .and_then(|m| m.modified())
                    .ok()
                    .map(DateTime::<Utc>::from);

                Ok(VersionInfo {
                    number,
                    message,
                    timestamp,
                })
            })
            .collect()
    }

    /// Names of every branch directory under `history/`, sorted.
    pub fn branches(&self) -> Result<Vec<String>> {
        let history = self.layout.history_dir();
        let mut names = Vec::new();
        for entry in fs::read_dir(&history)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathLayout) {
        let temp = TempDir::new().unwrap();
        let layout = PathLayout::new(temp.path().join(".vcs"));
        fs::create_dir_all(layout.branch_dir("main")).unwrap();
        (temp, layout)
    }

    #[test]
    fn test_latest_version_of_empty_branch_is_zero() {
        let (_temp, layout) = setup();
        let store = VersionStore::new(&layout);

        assert_eq!(store.latest_version("main").unwrap(), 0);
        assert_eq!(store.latest_version("missing").unwrap(), 0);
    }

    #[test]
    fn test_latest_version_skips_malformed_entries() {
        let (_temp, layout) = setup();
        let store = VersionStore::new(&layout);
        let branch_dir = layout.branch_dir("main");
        for name in ["version_2", "version_10", "version_x", "version_3b", "notes"] {
            fs::create_dir(branch_dir.join(name)).unwrap();
        }

        assert_eq!(store.version_numbers("main").unwrap(), vec![2, 10]);
        assert_eq!(store.latest_version("main").unwrap(), 10);
    }

    #[test]
    fn test_next_version() {
        let (_temp, layout) = setup();
        let store = VersionStore::new(&layout);
        assert_eq!(store.next_version("main").unwrap(), 1);

        fs::create_dir(layout.version_dir("main", 41)).unwrap();
        assert_eq!(store.next_version("main").unwrap(), 42);
    }

    #[test]
    fn test_next_version_after_max_is_format_error() {
        let (_temp, layout) = setup();
        let store = VersionStore::new(&layout);
        fs::create_dir(layout.version_dir("main", u32::MAX)).unwrap();

        assert_eq!(store.latest_version("main").unwrap(), u32::MAX);
        let err = store.next_version("main").unwrap_err();
        assert_eq!(err.class(), ErrorClass::Format);
    }

    #[test]
    fn test_create_and_read_version() {
        let (_temp, layout) = setup();
        let store = VersionStore::new(&layout);
        let files = vec![
            TrackedFile::new("a.txt", "hello"),
            TrackedFile::new("b.bin", vec![0u8, 159, 146, 150]),
        ];

        store.create_version("main", 1, &files, "first").unwrap();
        let version = store.read_version("main", 1).unwrap();

        assert_eq!(version.number, 1);
        assert_eq!(version.message.as_deref(), Some("first"));
        assert_eq!(version.file_names(), vec!["a.txt", "b.bin"]);
        assert_eq!(version.file("b.bin").unwrap().content, vec![0u8, 159, 146, 150]);
    }

    #[test]
    fn test_create_version_never_clobbers() {
        let (_temp, layout) = setup();
        let store = VersionStore::new(&layout);
        store
            .create_version("main", 1, &[TrackedFile::new("a.txt", "v1")], "first")
            .unwrap();

        let err = store
            .create_version("main", 1, &[TrackedFile::new("a.txt", "v2")], "again")
            .unwrap_err();

        assert_eq!(err.class(), ErrorClass::AlreadyExists);
        let kept = store.read_version("main", 1).unwrap();
        assert_eq!(kept.file("a.txt").unwrap().content, b"v1");
    }

    #[test]
    fn test_create_version_on_missing_branch() {
        let (_temp, layout) = setup();
        let store = VersionStore::new(&layout);

        let err = store.create_version("ghost", 1, &[], "x").unwrap_err();
        assert_eq!(err.class(), ErrorClass::NotFound);
    }

    #[test]
    fn test_read_missing_version() {
        let (_temp, layout) = setup();
        let store = VersionStore::new(&layout);

        let err = store.read_version("main", 4).unwrap_err();
        assert_eq!(err.class(), ErrorClass::NotFound);
    }

    #[test]
    fn test_list_versions_is_numeric_order() {
        let (_temp, layout) = setup();
        let store = VersionStore::new(&layout);
        for n in [10, 2, 1] {
            store
                .create_version("main", n, &[], &format!("message {}", n))
                .unwrap();
        }

        let history = store.list_versions("main").unwrap();
        let numbers: Vec<u32> = history.iter().map(|v| v.number).collect();

        assert_eq!(numbers, vec![1, 2, 10]);
        assert_eq!(history[2].message, "message 10");
        assert!(history[0].timestamp.is_some());
    }

    #[test]
    fn test_list_versions_requires_messages() {
        let (_temp, layout) = setup();
        let store = VersionStore::new(&layout);
        fs::create_dir(layout.version_dir("main", 1)).unwrap();

        let err = store.list_versions("main").unwrap_err();
        assert_eq!(err.class(), ErrorClass::NotFound);
    }

    #[test]
    fn test_branches_are_sorted() {
        let (_temp, layout) = setup();
        fs::create_dir(layout.branch_dir("feature")).unwrap();
        let store = VersionStore::new(&layout);

        assert_eq!(store.branches().unwrap(), vec!["feature", "main"]);
    }
}
