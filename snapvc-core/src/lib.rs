//! # snapvc-core
//!
//! Core library for snapvc - a minimal local version-control engine.
//!
//! Tracked files are staged as flat full copies, committed into numbered
//! branch-scoped snapshot directories, restored on checkout, and reconciled
//! between branches by a per-file, user-decided merge.

pub mod branch;
pub mod config;
pub mod error;
pub mod fsutil;
pub mod layout;
pub mod lock;
pub mod merge;
pub mod models;
pub mod repository;
pub mod staging;
pub mod state;
pub mod store;

pub use config::RepoConfig;
pub use error::{Error, ErrorClass, Result};
pub use layout::PathLayout;
pub use merge::{DecisionProvider, FixedDecision, ScriptedDecisions, SourceConflictPolicy};
pub use models::{
    BranchInfo, History, MergeOutcome, MergeSide, RepoStatus, TrackedFile, Version, VersionInfo,
};
pub use repository::Repository;
pub use state::PersistentState;
