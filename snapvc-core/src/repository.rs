//! The user-facing operations, composed from the lower components.
//!
//! Every operation except [`Repository::init`] holds the repository lock
//! for its whole duration. None of them roll back: a failure partway
//! through a copy loop leaves whatever was already written on disk.

use crate::branch::BranchManager;
use crate::config::RepoConfig;
use crate::error::{Error, Result};
use crate::layout::PathLayout;
use crate::lock::RepoLock;
use crate::merge::{DecisionProvider, MergeEngine, SourceConflictPolicy};
use crate::models::{BranchInfo, History, MergeOutcome, RepoStatus, Version};
use crate::staging::StagingArea;
use crate::state::PersistentState;
use crate::store::VersionStore;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct Repository {
    layout: PathLayout,
    config: RepoConfig,
}

impl Repository {
    /// Creates a new repository at `root`.
    pub fn init<P: Into<PathBuf>>(root: P) -> Result<Self> {
        let layout = PathLayout::new(root);
        BranchManager::new(&layout).init()?;
        Ok(Self {
            layout,
            config: RepoConfig::default(),
        })
    }

    /// Opens an existing repository, reading its optional `config.toml`.
    pub fn open<P: Into<PathBuf>>(root: P) -> Result<Self> {
        let layout = PathLayout::new(root);
        if !layout.root().is_dir() {
            return Err(Error::NotInitialized);
        }
        let config = RepoConfig::load(&layout)?;
        Ok(Self { layout, config })
    }

    pub fn with_merge_policy(mut self, policy: SourceConflictPolicy) -> Self {
        self.config.merge_policy = policy;
        self
    }

    pub fn layout(&self) -> &PathLayout {
        &self.layout
    }

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    fn lock(&self) -> Result<RepoLock> {
        RepoLock::acquire(&self.layout, self.config.lock_timeout())
    }

    /// Stages a copy of `path` under its base name.
    pub fn add(&self, path: &Path) -> Result<String> {
        let _lock = self.lock()?;
        let name = StagingArea::new(&self.layout).put(path)?;
        info!(file = %name, "added");
        Ok(name)
    }

    pub fn remove(&self, name: &str) -> Result<()> {
        let _lock = self.lock()?;
        StagingArea::new(&self.layout).delete(name)
    }

    /// Snapshots the staging area as the next version of the current branch.
    pub fn commit(&self, message: &str) -> Result<u32> {
        let _lock = self.lock()?;
        let mut state = PersistentState::load(&self.layout)?;
        let store = VersionStore::new(&self.layout);

        let number = store.next_version(&state.branch)?;
        let files = StagingArea::new(&self.layout).read_all()?;
        store.create_version(&state.branch, number, &files, message)?;

        state.version = number;
        state.save(&self.layout)?;
        Ok(number)
    }

    /// History of the current branch.
    pub fn log(&self) -> Result<History> {
        let _lock = self.lock()?;
        let state = PersistentState::load(&self.layout)?;
        let versions = VersionStore::new(&self.layout).list_versions(&state.branch)?;
        Ok(History {
            branch: state.branch,
            versions,
        })
    }

    pub fn status(&self) -> Result<RepoStatus> {
        let _lock = self.lock()?;
        let state = PersistentState::load(&self.layout)?;
        let tracked = StagingArea::new(&self.layout).list()?;
        Ok(RepoStatus {
            branch: state.branch,
            version: state.version,
            tracked,
        })
    }

    /// Restores `version` of the current branch into the working directory
    /// and the staging area.
    pub fn checkout(&self, version: u32) -> Result<Version> {
        let _lock = self.lock()?;
        let mut state = PersistentState::load(&self.layout)?;
        BranchManager::new(&self.layout).checkout(&mut state, version)
    }

    pub fn create_branch(&self, name: &str) -> Result<Version> {
        let _lock = self.lock()?;
        let mut state = PersistentState::load(&self.layout)?;
        BranchManager::new(&self.layout).create_branch(&mut state, name)
    }

    pub fn checkout_branch(&self, name: &str) -> Result<PersistentState> {
        let _lock = self.lock()?;
        BranchManager::new(&self.layout).checkout_branch(name)
    }

    pub fn merge(
        &self,
        target: &str,
        source: &str,
        decisions: &mut dyn DecisionProvider,
    ) -> Result<MergeOutcome> {
        let _lock = self.lock()?;
        MergeEngine::new(&self.layout, self.config.merge_policy).merge(target, source, decisions)
    }

    pub fn branches(&self) -> Result<Vec<BranchInfo>> {
        let _lock = self.lock()?;
        let state = PersistentState::load(&self.layout)?;
        let store = VersionStore::new(&self.layout);

        store
            .branches()?
            .into_iter()
            .map(|name| {
                Ok(BranchInfo {
                    latest_version: store.latest_version(&name)?,
                    current: name == state.branch,
                    name,
                })
            })
            .collect()
    }
}
