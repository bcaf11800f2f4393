//! Whole-repository advisory lock.
//!
//! Held for the duration of one top-level operation. The OS releases the
//! `flock` when the process dies, so there is no stale-lock handling.

use crate::error::{Error, Result};
use crate::layout::PathLayout;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::time::{Duration, Instant};
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Released when dropped.
pub struct RepoLock {
    _file: File,
}

impl RepoLock {
    pub fn acquire(layout: &PathLayout, timeout: Duration) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(layout.lock_file())?;

        let start = Instant::now();
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => {
                    debug!(waited_ms = start.elapsed().as_millis() as u64, "lock acquired");
                    return Ok(RepoLock { _file: file });
                }
                Err(_) if start.elapsed() >= timeout => return Err(Error::LockTimeout),
                Err(_) => std::thread::sleep(POLL_INTERVAL),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn layout(temp: &TempDir) -> PathLayout {
        PathLayout::new(temp.path().to_path_buf())
    }

    #[test]
    fn test_lock_released_on_drop() {
        let temp = TempDir::new().unwrap();
        let layout = layout(&temp);

        {
            let _lock = RepoLock::acquire(&layout, Duration::from_secs(1)).unwrap();
            assert!(layout.lock_file().exists());
        }
        assert!(RepoLock::acquire(&layout, Duration::from_millis(50)).is_ok());
    }

    #[test]
    fn test_second_holder_times_out() {
        let temp = TempDir::new().unwrap();
        let layout = layout(&temp);
        let _held = RepoLock::acquire(&layout, Duration::from_secs(1)).unwrap();

        let start = Instant::now();
        let result = RepoLock::acquire(&layout, Duration::from_millis(80));

        assert!(matches!(result, Err(Error::LockTimeout)));
        assert!(start.elapsed() >= Duration::from_millis(80));
    }
}
