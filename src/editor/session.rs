use std::io;
use std::path::PathBuf;

use log::{debug, info};
use tokio::fs;

use super::command::{CommandDispatcher, CommandRegistry, Tier, dispatcher};
use super::handlers;
use super::session_state::SessionState;
use super::shell::{OutputLog, Shell};
use super::tree::DirectoryTree;
use super::types::{CommandDoc, DirRow, EditorRequest, EditorView, FileRow};
use super::user_commands;
use super::utils::path_resolver::PathResolver;
use super::utils::size::human_size;
use super::utils::text;
use crate::config::EditorConfig;
use crate::error::EditorError;

/// The editor: navigation state, code buffer, directory listing, command
/// registry and shell bridge. Mutated once per request by [`update`](Self::update).
#[derive(Debug)]
pub struct EditorSession {
    pub config: EditorConfig,
    pub state: SessionState,
    pub tree: DirectoryTree,
    pub command: CommandDispatcher,
    pub shell: Shell,
}

impl EditorSession {
    /// Starts in `config.root_dir` with the built-in and user commands registered.
    pub fn new(config: EditorConfig) -> Self {
        let mut registry = CommandRegistry::new();
        registry.register_all(Tier::Builtin, handlers::BUILTIN_COMMANDS);
        registry.register_all(Tier::User, user_commands::USER_COMMANDS);

        let state = SessionState::new(config.root_dir.clone(), &config.default_file_type);
        let shell = Shell::new(config.shell.clone(), config.root_dir.clone());

        Self {
            config,
            state,
            tree: DirectoryTree::new(),
            command: CommandDispatcher::new(registry),
            shell,
        }
    }

    /// Processes one request: navigation, open file, code buffer, command,
    /// then a fresh listing. A listing failure is the only error returned;
    /// command failures end up in the output log.
    pub async fn update(&mut self, request: &EditorRequest) -> Result<(), EditorError> {
        self.update_dir(request.current_dir.as_deref());

        if let Some(file) = request.opening_file.as_deref().filter(|f| !f.is_empty()) {
            let path = self.resolver().resolve(file);
            self.open_file(path);
        }

        self.update_code(request.code.as_deref()).await;
        dispatcher::update(self, request.cmd.as_deref()).await;

        self.tree
            .update(&self.state.current_dir)
            .await
            .map_err(|source| EditorError::Listing {
                path: self.state.current_dir.clone(),
                source,
            })
    }

    /// Moves to `requested` (relative to the current directory) if it names an
    /// existing directory. Returns whether the directory changed.
    pub fn update_dir(&mut self, requested: Option<&str>) -> bool {
        let Some(requested) = requested.filter(|dir| !dir.is_empty()) else {
            return false;
        };

        match self.resolver().resolve_dir(requested) {
            Some(dir) => {
                debug!("current dir: {:?}", dir);
                self.state.current_dir = dir;
                true
            }
            None => {
                debug!("ignoring invalid directory {:?}", requested);
                false
            }
        }
    }

    /// Tracks `path` as the open file and derives its name and highlighting type.
    pub fn open_file(&mut self, path: PathBuf) {
        self.state.file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.state.file_extension = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        self.state.file_type = self.config.file_type(&self.state.file_extension).to_string();

        info!("opening {:?} as {}", path, self.state.file_type);
        self.state.opening_file = Some(path);
    }

    /// A non-empty submitted buffer wins; otherwise the open file is re-read.
    pub async fn update_code(&mut self, submitted: Option<&str>) {
        if let Some(code) = submitted.filter(|code| !code.is_empty()) {
            self.state.code = code.to_string();
            return;
        }

        let Some(path) = &self.state.opening_file else {
            self.state.code.clear();
            return;
        };

        let encoding = self.state.open_encoding;
        self.state.code = match fs::read(path).await {
            Ok(bytes) => text::decode(&bytes, encoding)
                .unwrap_or_else(|| format!("could not decode with {}", encoding.name())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => "file not found".to_string(),
            Err(e) => format!("could not read file: {e}"),
        };
    }

    pub fn resolver(&self) -> PathResolver<'_> {
        PathResolver::new(&self.state.current_dir)
    }

    pub fn log(&mut self) -> &mut OutputLog {
        self.shell.log_mut()
    }

    pub fn view(&self) -> EditorView {
        let base = self.config.size_base;
        let docs = |tier: Tier| -> Vec<CommandDoc> {
            self.command
                .registry
                .listing(tier)
                .into_iter()
                .map(|entry| CommandDoc {
                    name: entry.name,
                    doc: entry.doc,
                    tier: entry.tier,
                })
                .collect()
        };

        EditorView {
            current_dir: self.state.current_dir.clone(),
            opening_file: self.state.opening_file.clone(),
            file_name: self.state.file_name.clone(),
            file_type: self.state.file_type.clone(),
            code: self.state.code.clone(),
            output: self.command.output.clone(),
            output_generation: self.shell.log().generation(),
            command_history: self.command.history.entries().to_vec(),
            sort_type: self.tree.sort_type,
            reverse: self.tree.reverse,
            open_encoding: self.state.open_encoding.name(),
            save_encoding: self.state.save_encoding.name(),
            dirs: self
                .tree
                .dirs
                .iter()
                .map(|dir| DirRow {
                    name: dir.name.clone(),
                    path: dir.path.clone(),
                    shallow_size: dir.shallow_size,
                })
                .collect(),
            files: self
                .tree
                .files
                .iter()
                .map(|file| FileRow {
                    name: file.name.clone(),
                    path: file.path.clone(),
                    size: file.size,
                    human_size: human_size(i128::from(file.size), base)
                        .unwrap_or_else(|e| e.to_string()),
                    last_update: file.last_update,
                })
                .collect(),
            user_commands: docs(Tier::User),
            builtin_commands: docs(Tier::Builtin),
        }
    }
}
