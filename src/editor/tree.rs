use std::cmp::Ordering;
use std::fmt;
use std::io;
use std::path::Path;
use std::str::FromStr;

use log::debug;
use serde::Serialize;
use tokio::fs;

use crate::file_info::{DirEntry, FileEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortType {
    #[default]
    Name,
    Size,
    Update,
}

impl FromStr for SortType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortType::Name),
            "size" => Ok(SortType::Size),
            "update" => Ok(SortType::Update),
            other => Err(format!(
                "unknown sort type: {other} (expected name, size, update)"
            )),
        }
    }
}

impl fmt::Display for SortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortType::Name => "name",
            SortType::Size => "size",
            SortType::Update => "update",
        };
        f.write_str(name)
    }
}

/// One-level listing of the current directory.
///
/// `dirs[0]` is always the `..` entry. Size and update ordering only apply to
/// files; directories are reordered only in name mode and otherwise keep the
/// order the OS returned them in.
#[derive(Debug, Default)]
pub struct DirectoryTree {
    pub sort_type: SortType,
    pub reverse: bool,
    pub dirs: Vec<DirEntry>,
    pub files: Vec<FileEntry>,
}

impl DirectoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the reverse flag and returns the new value.
    pub fn toggle_reverse(&mut self) -> bool {
        self.reverse = !self.reverse;
        self.reverse
    }

    /// Re-lists `directory`. Enumeration failures (missing directory,
    /// permission denied) are returned to the caller untouched.
    pub async fn update(&mut self, directory: &Path) -> io::Result<()> {
        let mut dirs = vec![DirEntry::parent_of(directory)];
        let mut files = Vec::new();

        let mut read_dir = fs::read_dir(directory).await?;
        while let Some(entry) = read_dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            let path = entry.path();

            let metadata = match fs::metadata(&path).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    // dangling symlink: list the link itself
                    debug!("stat failed for {:?}: {}, using lstat", path, e);
                    fs::symlink_metadata(&path).await?
                }
            };

            if metadata.is_dir() {
                dirs.push(DirEntry::from_metadata(path, name, &metadata));
            } else {
                files.push(FileEntry::from_metadata(path, name, &metadata));
            }
        }

        self.sort(&mut dirs, &mut files);
        debug!(
            "listed {:?}: {} dirs, {} files (sort: {}, reverse: {})",
            directory,
            dirs.len() - 1,
            files.len(),
            self.sort_type,
            self.reverse
        );

        self.dirs = dirs;
        self.files = files;
        Ok(())
    }

    fn sort(&self, dirs: &mut [DirEntry], files: &mut [FileEntry]) {
        let reverse = self.reverse;
        let directed = |ordering: Ordering| if reverse { ordering.reverse() } else { ordering };

        match self.sort_type {
            SortType::Size => files.sort_by(|a, b| directed(a.size.cmp(&b.size))),
            SortType::Name => {
                files.sort_by(|a, b| directed(a.name.cmp(&b.name)));
                // keep the parent entry in front
                if let Some((_, children)) = dirs.split_first_mut() {
                    children.sort_by(|a, b| directed(a.name.cmp(&b.name)));
                }
            }
            SortType::Update => files.sort_by(|a, b| directed(a.last_update.cmp(&b.last_update))),
        }
    }
}
