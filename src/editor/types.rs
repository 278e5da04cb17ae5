use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::command::Tier;
use super::tree::SortType;

/// Parameters of one incoming request. `current_dir` and `opening_file` come
/// from the query string, `cmd` and `code` from the submitted form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EditorRequest {
    pub current_dir: Option<String>,
    pub opening_file: Option<String>,
    pub cmd: Option<String>,
    pub code: Option<String>,
}

impl EditorRequest {
    pub fn command(cmd: impl Into<String>) -> Self {
        Self {
            cmd: Some(cmd.into()),
            ..Self::default()
        }
    }
}

/// Everything the rendering side needs after a request.
#[derive(Debug, Clone, Serialize)]
pub struct EditorView {
    pub current_dir: PathBuf,
    pub opening_file: Option<PathBuf>,
    pub file_name: String,
    pub file_type: String,
    pub code: String,
    pub output: String,
    /// Changes whenever the output log was cleared.
    pub output_generation: u64,
    pub command_history: Vec<String>,
    pub sort_type: SortType,
    pub reverse: bool,
    pub open_encoding: &'static str,
    pub save_encoding: &'static str,
    pub dirs: Vec<DirRow>,
    pub files: Vec<FileRow>,
    pub user_commands: Vec<CommandDoc>,
    pub builtin_commands: Vec<CommandDoc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DirRow {
    pub name: String,
    /// Link target: becomes the next `current_dir`.
    pub path: PathBuf,
    pub shallow_size: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileRow {
    pub name: String,
    /// Link target: becomes the next `opening_file`.
    pub path: PathBuf,
    pub size: u64,
    pub human_size: String,
    pub last_update: DateTime<Local>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandDoc {
    pub name: &'static str,
    pub doc: &'static str,
    pub tier: Tier,
}
