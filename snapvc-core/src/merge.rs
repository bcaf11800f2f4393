//! Whole-file reconciliation of two branches' latest versions.
//!
//! There is no base comparison and no content-level merging: every file of
//! the target's and then the source's latest version is put to a
//! [`DecisionProvider`], and the answers alone decide what the new target
//! version contains.

use crate::error::{Error, Result};
use crate::layout::{self, PathLayout};
use crate::models::{MergeOutcome, MergeSide, TrackedFile};
use crate::state::PersistentState;
use crate::store::VersionStore;
use serde::Deserialize;
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Answers the per-file questions asked during a merge.
///
/// Implementations block until an answer is available. An aborted or
/// unreadable answer must be reported as `false`.
pub trait DecisionProvider {
    /// Should `name` from `branch` be copied into the merge result?
    fn include_file(&mut self, name: &str, branch: &str, side: MergeSide) -> bool;

    /// Should the source copy of `name` replace the one already chosen?
    fn overwrite_file(&mut self, name: &str) -> bool;
}

/// Answers every question the same way.
#[derive(Debug, Clone, Copy)]
pub struct FixedDecision(pub bool);

impl DecisionProvider for FixedDecision {
    fn include_file(&mut self, _name: &str, _branch: &str, _side: MergeSide) -> bool {
        self.0
    }

    fn overwrite_file(&mut self, _name: &str) -> bool {
        self.0
    }
}

/// Replays canned answers in order; an exhausted script answers "no".
#[derive(Debug, Default)]
pub struct ScriptedDecisions {
    answers: VecDeque<bool>,
    asked: Vec<String>,
}

impl ScriptedDecisions {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Questions asked so far, as `include <side> <name>` or `overwrite <name>`.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    fn next(&mut self) -> bool {
        self.answers.pop_front().unwrap_or(false)
    }
}

impl DecisionProvider for ScriptedDecisions {
    fn include_file(&mut self, name: &str, _branch: &str, side: MergeSide) -> bool {
        self.asked.push(format!("include {} {}", side.as_str(), name));
        self.next()
    }

    fn overwrite_file(&mut self, name: &str) -> bool {
        self.asked.push(format!("overwrite {}", name));
        self.next()
    }
}

/// How a wanted source file is reconciled with the emerging merge result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceConflictPolicy {
    /// Checks existence against the source version's own path. That file
    /// always exists, so a wanted source file always goes to the overwrite
    /// question, and the re-check after a confirmed overwrite always fails:
    /// source files are never copied.
    #[default]
    Literal,
    /// Checks existence against the merge result. New names are copied,
    /// clashing names are copied only on a confirmed overwrite.
    ConfirmOverwrite,
}

impl SourceConflictPolicy {
    pub fn as_str(&self) -> &str {
        match self {
            SourceConflictPolicy::Literal => "literal",
            SourceConflictPolicy::ConfirmOverwrite => "confirm-overwrite",
        }
    }
}

impl fmt::Display for SourceConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "literal" => Ok(SourceConflictPolicy::Literal),
            "confirm-overwrite" => Ok(SourceConflictPolicy::ConfirmOverwrite),
            other => Err(format!(
                "unknown merge policy '{}' (expected 'literal' or 'confirm-overwrite')",
                other
            )),
        }
    }
}

pub struct MergeEngine<'a> {
    layout: &'a PathLayout,
    store: VersionStore<'a>,
    policy: SourceConflictPolicy,
}

impl<'a> MergeEngine<'a> {
    pub fn new(layout: &'a PathLayout, policy: SourceConflictPolicy) -> Self {
        Self {
            layout,
            store: VersionStore::new(layout),
            policy,
        }
    }

    /// Merges the latest version of `source` into a new version of `target`
    /// numbered one past the target's latest, then makes it current.
    pub fn merge(
        &self,
        target: &str,
        source: &str,
        decisions: &mut dyn DecisionProvider,
    ) -> Result<MergeOutcome> {
        for (role, branch) in [("target", target), ("source", source)] {
            layout::validate_branch_name(branch)?;
            if !self.store.branch_exists(branch) {
                return Err(Error::not_found(format!("{} branch {}", role, branch)));
            }
        }

        let target_number = self.store.latest_version(target)?;
        let source_number = self.store.latest_version(source)?;
        let target_version = self.store.read_version(target, target_number)?;
        let source_version = self.store.read_version(source, source_number)?;

        let merged_number = self.store.next_version(target)?;
        if self.store.version_exists(target, merged_number) {
            return Err(Error::already_exists(format!(
                "version {} on branch {}",
                merged_number, target
            )));
        }

        debug!(
            target_branch = target,
            target_number,
            source_branch = source,
            source_number,
            policy = %self.policy,
            "merging"
        );

        let mut merged: Vec<TrackedFile> = Vec::new();
        let mut included: Vec<(String, MergeSide)> = Vec::new();
        let mut skipped = Vec::new();

        for file in &target_version.files {
            if decisions.include_file(&file.name, target, MergeSide::Target) {
                merged.push(file.clone());
                included.push((file.name.clone(), MergeSide::Target));
            }
        }

        let source_dir = self.layout.version_dir(source, source_number);
        for file in &source_version.files {
            if !decisions.include_file(&file.name, source, MergeSide::Source) {
                continue;
            }

            let copied = match self.policy {
                SourceConflictPolicy::Literal => {
                    let source_path = source_dir.join(&file.name);
                    let copy = !source_path.exists()
                        || (decisions.overwrite_file(&file.name) && !source_path.exists());
                    if copy {
                        merged.push(file.clone());
                    }
                    copy
                }
                SourceConflictPolicy::ConfirmOverwrite => {
                    let existing = merged.iter().position(|m| m.name == file.name);
                    match existing {
                        None => {
                            merged.push(file.clone());
                            true
                        }
                        Some(idx) if decisions.overwrite_file(&file.name) => {
                            merged[idx] = file.clone();
                            included.retain(|(name, _)| name != &file.name);
                            true
                        }
                        Some(_) => false,
                    }
                }
            };

            if copied {
                included.push((file.name.clone(), MergeSide::Source));
            } else {
                warn!(file = %file.name, "source file not copied into merge result");
                skipped.push(file.name.clone());
            }
        }

        let message = MergeOutcome::commit_message(source, target);
        self.store
            .create_version(target, merged_number, &merged, &message)?;

        PersistentState::new(target, merged_number).save(self.layout)?;

        info!(
            target_branch = target,
            source_branch = source,
            version = merged_number,
            "merged"
        );
        Ok(MergeOutcome {
            target: target.to_string(),
            source: source.to_string(),
            version: merged_number,
            message,
            included,
            skipped,
        })
    }
}
