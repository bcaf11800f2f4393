//! Optional per-repository settings read from `<root>/config.toml`.

use crate::error::{Error, Result};
use crate::layout::PathLayout;
use crate::merge::SourceConflictPolicy;
use serde::Deserialize;
use std::fs;
use std::io;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    /// How long an operation waits for the repository lock.
    pub lock_timeout_ms: u64,
    pub merge_policy: SourceConflictPolicy,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            lock_timeout_ms: 5_000,
            merge_policy: SourceConflictPolicy::default(),
        }
    }
}

impl RepoConfig {
    /// Defaults when the file does not exist.
    pub fn load(layout: &PathLayout) -> Result<Self> {
        let path = layout.config_file();
        match fs::read_to_string(&path) {
            Ok(text) => Self::parse(&text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(e.message().to_string()))
    }

    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let layout = PathLayout::new(temp.path().to_path_buf());

        let config = RepoConfig::load(&layout).unwrap();
        assert_eq!(config, RepoConfig::default());
        assert_eq!(config.lock_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_parse_overrides() {
        let config = RepoConfig::parse(
            r#"
            lock_timeout_ms = 250
            merge_policy = "confirm-overwrite"
            "#,
        )
        .unwrap();

        assert_eq!(config.lock_timeout_ms, 250);
        assert_eq!(config.merge_policy, SourceConflictPolicy::ConfirmOverwrite);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = RepoConfig::parse("merge_policy = \"literal\"").unwrap();
        assert_eq!(config.lock_timeout_ms, 5_000);
    }

    #[test]
    fn test_invalid_config() {
        for text in ["merge_policy = \"maybe\"", "colour = true", "lock_timeout_ms = -1"] {
            let err = RepoConfig::parse(text).unwrap_err();
            assert_eq!(err.class(), ErrorClass::Config);
        }
    }
}
