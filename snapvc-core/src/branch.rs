//! Branch lifecycle and version restore over `(current branch, current version)`.

use crate::error::{Error, Result};
use crate::layout::{self, PathLayout, MAIN_BRANCH};
use crate::models::{TrackedFile, Version};
use crate::staging::StagingArea;
use crate::state::PersistentState;
use crate::store::VersionStore;
use std::fs;
use tracing::{debug, info};

pub struct BranchManager<'a> {
    layout: &'a PathLayout,
    store: VersionStore<'a>,
    staging: StagingArea<'a>,
}

impl<'a> BranchManager<'a> {
    pub fn new(layout: &'a PathLayout) -> Self {
        Self {
            layout,
            store: VersionStore::new(layout),
            staging: StagingArea::new(layout),
        }
    }

    /// Creates the repository layout with an empty `main` branch.
    pub fn init(&self) -> Result<PersistentState> {
        let root = self.layout.root();
        if root.exists() {
            return Err(Error::already_exists(format!(
                "repository at {}",
                root.display()
            )));
        }

        fs::create_dir_all(self.layout.staging_dir())?;
        fs::create_dir_all(self.layout.branch_dir(MAIN_BRANCH))?;

        let state = PersistentState::new(MAIN_BRANCH, 0);
        state.save(self.layout)?;

        info!(root = %root.display(), "initialized repository");
        Ok(state)
    }

    /// Writes `files` into the working directory and makes the staging
    /// area mirror them exactly.
    pub fn restore(&self, files: &[TrackedFile]) -> Result<()> {
        self.staging.clear()?;

        let working_dir = self.layout.working_dir();
        for file in files {
            fs::write(working_dir.join(&file.name), &file.content)?;
            self.staging.put_file(file)?;
        }

        debug!(files = files.len(), "restored snapshot");
        Ok(())
    }

    /// Restores `version` of the current branch. The persisted state is
    /// only updated once the restore pass has succeeded.
    pub fn checkout(&self, state: &mut PersistentState, version: u32) -> Result<Version> {
        if !self.store.version_exists(&state.branch, version) {
            return Err(Error::not_found(format!(
                "version {} on branch {}",
                version, state.branch
            )));
        }

        let snapshot = self.store.read_version(&state.branch, version)?;
        self.restore(&snapshot.files)?;

        state.version = version;
        state.save(self.layout)?;

        info!(branch = %state.branch, version, "checked out version");
        Ok(snapshot)
    }

    /// Seeds `name` with a copy of the current branch's latest version,
    /// keeping its number, and switches to it.
    pub fn create_branch(&self, state: &mut PersistentState, name: &str) -> Result<Version> {
        layout::validate_branch_name(name)?;
        if self.store.branch_exists(name) {
            return Err(Error::already_exists(format!("branch {}", name)));
        }

        let number = self.store.latest_version(&state.branch)?;
        let source = self.store.read_version(&state.branch, number)?;

        fs::create_dir(self.layout.branch_dir(name))?;
        self.store.create_version(
            name,
            number,
            &source.files,
            source.message.as_deref().unwrap_or_default(),
        )?;
        self.restore(&source.files)?;

        info!(from = %state.branch, branch = name, version = number, "created branch");

        *state = PersistentState::new(name, number);
        state.save(self.layout)?;

        Ok(Version {
            branch: name.to_string(),
            ..source
        })
    }

    /// Switches to `name` and restores its latest version.
    ///
    /// A branch that has no versions at all is switched to without
    /// touching the staging area or the working directory.
    pub fn checkout_branch(&self, name: &str) -> Result<PersistentState> {
        layout::validate_branch_name(name)?;
        if !self.store.branch_exists(name) {
            return Err(Error::not_found(format!("branch {}", name)));
        }

        let mut state = PersistentState::new(name, 0);
        if self.store.version_numbers(name)?.is_empty() {
            debug!(branch = name, "branch has no versions, nothing to restore");
            state.save(self.layout)?;
        } else {
            let latest = self.store.latest_version(name)?;
            self.checkout(&mut state, latest)?;
        }

        info!(branch = name, version = state.version, "switched branch");
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;
    use tempfile::TempDir;

    fn init() -> (TempDir, PathLayout) {
        let temp = TempDir::new().unwrap();
        let layout = PathLayout::new(temp.path().join(".vcs"));
        BranchManager::new(&layout).init().unwrap();
        (temp, layout)
    }

    fn commit(layout: &PathLayout, branch: &str, number: u32, files: &[TrackedFile]) {
        VersionStore::new(layout)
            .create_version(branch, number, files, &format!("v{}", number))
            .unwrap();
    }

    #[test]
    fn test_init_layout() {
        let (_temp, layout) = init();

        assert!(layout.staging_dir().is_dir());
        assert!(layout.branch_dir("main").is_dir());
        assert_eq!(
            PersistentState::load(&layout).unwrap(),
            PersistentState::new("main", 0)
        );
    }

    #[test]
    fn test_init_twice_fails() {
        let (_temp, layout) = init();
        fs::write(layout.staging_dir().join("keep.txt"), "keep").unwrap();

        let err = BranchManager::new(&layout).init().unwrap_err();

        assert_eq!(err.class(), ErrorClass::AlreadyExists);
        assert!(layout.staging_dir().join("keep.txt").exists());
    }

    #[test]
    fn test_checkout_restores_working_and_staging() {
        let (temp, layout) = init();
        commit(&layout, "main", 1, &[TrackedFile::new("a.txt", "one")]);
        commit(&layout, "main", 2, &[TrackedFile::new("b.txt", "two")]);
        let manager = BranchManager::new(&layout);
        let mut state = PersistentState::new("main", 2);

        manager.checkout(&mut state, 1).unwrap();

        assert_eq!(fs::read_to_string(temp.path().join("a.txt")).unwrap(), "one");
        assert_eq!(StagingArea::new(&layout).list().unwrap(), vec!["a.txt"]);
        assert_eq!(PersistentState::load(&layout).unwrap().version, 1);
    }

    #[test]
    fn test_checkout_missing_version_keeps_state() {
        let (_temp, layout) = init();
        commit(&layout, "main", 1, &[TrackedFile::new("a.txt", "one")]);
        let manager = BranchManager::new(&layout);
        let mut state = PersistentState::new("main", 1);
        state.save(&layout).unwrap();

        let err = manager.checkout(&mut state, 9).unwrap_err();

        assert_eq!(err.class(), ErrorClass::NotFound);
        assert_eq!(state.version, 1);
        assert_eq!(fs::read_to_string(layout.version_file()).unwrap(), "1");
    }

    #[test]
    fn test_create_branch_duplicates_latest_version() {
        let (temp, layout) = init();
        commit(&layout, "main", 1, &[TrackedFile::new("a.txt", "one")]);
        commit(&layout, "main", 2, &[TrackedFile::new("a.txt", "two")]);
        let manager = BranchManager::new(&layout);
        let mut state = PersistentState::new("main", 2);

        let version = manager.create_branch(&mut state, "feature").unwrap();

        assert_eq!(state, PersistentState::new("feature", 2));
        assert_eq!(version.branch, "feature");
        let store = VersionStore::new(&layout);
        assert_eq!(store.version_numbers("feature").unwrap(), vec![2]);
        let copy = store.read_version("feature", 2).unwrap();
        assert_eq!(copy.files, vec![TrackedFile::new("a.txt", "two")]);
        assert_eq!(copy.message.as_deref(), Some("v2"));
        assert_eq!(fs::read_to_string(temp.path().join("a.txt")).unwrap(), "two");
    }

    #[test]
    fn test_create_branch_from_empty_branch_leaves_nothing_behind() {
        let (_temp, layout) = init();
        let manager = BranchManager::new(&layout);
        let mut state = PersistentState::new("main", 0);

        let err = manager.create_branch(&mut state, "feature").unwrap_err();

        assert_eq!(err.class(), ErrorClass::NotFound);
        assert!(!layout.branch_dir("feature").exists());
        assert_eq!(state.branch, "main");
    }

    #[test]
    fn test_create_existing_branch_fails() {
        let (_temp, layout) = init();
        let manager = BranchManager::new(&layout);
        let mut state = PersistentState::new("main", 0);

        let err = manager.create_branch(&mut state, "main").unwrap_err();
        assert_eq!(err.class(), ErrorClass::AlreadyExists);

        let err = manager.create_branch(&mut state, "../escape").unwrap_err();
        assert_eq!(err.class(), ErrorClass::InvalidName);
    }

    #[test]
    fn test_create_branch_rejects_padded_name() {
        let (_temp, layout) = init();
        commit(&layout, "main", 1, &[TrackedFile::new("a.txt", "a")]);
        let manager = BranchManager::new(&layout);
        let mut state = PersistentState::new("main", 1);

        let err = manager.create_branch(&mut state, "feature ").unwrap_err();

        assert_eq!(err.class(), ErrorClass::InvalidName);
        assert_eq!(state, PersistentState::new("main", 1));
        assert!(!layout.branch_dir("feature ").exists());
        assert!(!layout.branch_dir("feature").exists());

        let err = manager.checkout_branch(" main").unwrap_err();
        assert_eq!(err.class(), ErrorClass::InvalidName);
    }

    #[test]
    fn test_checkout_branch_restores_latest() {
        let (temp, layout) = init();
        commit(&layout, "main", 1, &[TrackedFile::new("a.txt", "main")]);
        fs::create_dir(layout.branch_dir("feature")).unwrap();
        commit(&layout, "feature", 1, &[TrackedFile::new("a.txt", "f1")]);
        commit(&layout, "feature", 3, &[TrackedFile::new("b.txt", "f3")]);
        StagingArea::new(&layout)
            .put_file(&TrackedFile::new("stale.txt", "x"))
            .unwrap();

        let state = BranchManager::new(&layout).checkout_branch("feature").unwrap();

        assert_eq!(state, PersistentState::new("feature", 3));
        assert_eq!(PersistentState::load(&layout).unwrap(), state);
        assert_eq!(StagingArea::new(&layout).list().unwrap(), vec!["b.txt"]);
        assert_eq!(fs::read_to_string(temp.path().join("b.txt")).unwrap(), "f3");
    }

    #[test]
    fn test_checkout_branch_without_versions_keeps_staging() {
        let (_temp, layout) = init();
        let staging = StagingArea::new(&layout);
        staging.put_file(&TrackedFile::new("wip.txt", "x")).unwrap();
        PersistentState::new("other", 4).save(&layout).unwrap();

        let state = BranchManager::new(&layout).checkout_branch("main").unwrap();

        assert_eq!(state, PersistentState::new("main", 0));
        assert_eq!(staging.list().unwrap(), vec!["wip.txt"]);
    }

    #[test]
    fn test_checkout_missing_branch() {
        let (_temp, layout) = init();
        let err = BranchManager::new(&layout)
            .checkout_branch("nope")
            .unwrap_err();
        assert_eq!(err.class(), ErrorClass::NotFound);
    }
}
