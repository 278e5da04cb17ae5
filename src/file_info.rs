use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use chrono::{DateTime, Local};

/// Name shown for the synthetic entry linking to the enclosing directory.
pub const PARENT_ENTRY_NAME: &str = "..";

/// Snapshot of a regular file (or anything that is not a directory) taken
/// while listing its parent.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub last_update: DateTime<Local>,
}

impl FileEntry {
    pub fn from_metadata(path: PathBuf, name: String, metadata: &Metadata) -> Self {
        let modified = metadata.modified().unwrap_or(UNIX_EPOCH);

        Self {
            path,
            name,
            size: metadata.len(),
            last_update: DateTime::<Local>::from(modified),
        }
    }
}

/// Snapshot of a directory. `shallow_size` is the size the filesystem reports
/// for the directory inode itself, not the size of its contents.
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub path: PathBuf,
    pub name: String,
    pub shallow_size: Option<u64>,
}

impl DirEntry {
    pub fn from_metadata(path: PathBuf, name: String, metadata: &Metadata) -> Self {
        Self {
            path,
            name,
            shallow_size: Some(metadata.len()),
        }
    }

    /// The `..` entry. Its target is never checked for existence and the
    /// filesystem root links to itself.
    pub fn parent_of(dir: &Path) -> Self {
        Self {
            path: dir.parent().unwrap_or(dir).to_path_buf(),
            name: PARENT_ENTRY_NAME.to_string(),
            shallow_size: None,
        }
    }
}
