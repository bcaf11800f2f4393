pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod init;
pub mod log;
pub mod merge;
pub mod remove;
pub mod status;

use anyhow::Result;
use snapvc_core::Repository;
use std::path::PathBuf;

pub fn open_repo(root: PathBuf) -> Result<Repository> {
    Ok(Repository::open(root)?)
}
