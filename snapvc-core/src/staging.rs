//! The flat mirror of tracked files captured by the next commit.

use crate::error::{Error, Result};
use crate::fsutil;
use crate::layout::{self, PathLayout};
use crate::models::TrackedFile;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

pub struct StagingArea<'a> {
    layout: &'a PathLayout,
}

impl<'a> StagingArea<'a> {
    pub fn new(layout: &'a PathLayout) -> Self {
        Self { layout }
    }

    /// Copies `source` into the staging slot named after its base name,
    /// overwriting a previous copy. Returns the tracked name.
    pub fn put(&self, source: &Path) -> Result<String> {
        let name = layout::tracked_name(source)?;
        let metadata = fs::metadata(source).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => {
                Error::not_found(format!("file {}", source.display()))
            }
            _ => Error::Io(e),
        })?;
        if metadata.is_dir() {
            return Err(Error::InvalidName(format!(
                "{} is a directory",
                source.display()
            )));
        }

        let content = fs::read(source)?;
        self.put_file(&TrackedFile { name: name.clone(), content })?;
        Ok(name)
    }

    pub fn put_file(&self, file: &TrackedFile) -> Result<()> {
        let staging = self.layout.staging_dir();
        fs::create_dir_all(&staging)?;
        fs::write(staging.join(&file.name), &file.content)?;
        debug!(file = %file.name, "staged");
        Ok(())
    }

    /// Removes a staged entry; a staged directory is removed recursively.
    pub fn delete(&self, name: &str) -> Result<()> {
        let name = layout::tracked_name(Path::new(name))?;
        let path = self.layout.staging_dir().join(&name);

        fsutil::remove_entry(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::not_found(format!("staged file {}", name)),
            _ => Error::Io(e),
        })?;
        debug!(file = %name, "unstaged");
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        fsutil::clear_dir(&self.layout.staging_dir())?;
        Ok(())
    }

    /// Clears the staging area, then writes exactly `files`.
    pub fn replace_all(&self, files: &[TrackedFile]) -> Result<()> {
        self.clear()?;
        for file in files {
            self.put_file(file)?;
        }
        Ok(())
    }

    /// Every staged entry name, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        match fsutil::list_entries(&self.layout.staging_dir()) {
            Ok(names) => Ok(names),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Contents of every staged plain file; staged directories are not snapshotted.
    pub fn read_all(&self) -> Result<Vec<TrackedFile>> {
        let staging = self.layout.staging_dir();
        let names = match fsutil::list_files(&staging) {
            Ok(names) => names,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        names
            .into_iter()
            .map(|name| {
                let content = fs::read(staging.join(&name))?;
                Ok(TrackedFile { name, content })
            })
            .collect()
    }
}
