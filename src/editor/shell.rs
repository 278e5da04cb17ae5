use std::path::{Path, PathBuf};
use std::process::Stdio;

use log::{debug, info, warn};
use tokio::process::Command;

use crate::config::ShellSettings;

/// Console scrollback. Built-in commands and shell runs both append here;
/// only `deletelog` empties it.
#[derive(Debug, Default, Clone)]
pub struct OutputLog {
    lines: Vec<String>,
    /// Bumped on every clear, so readers can tell a fresh log from a grown one.
    generation: u64,
}

impl OutputLog {
    pub fn add_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Appends multi-line process output, dropping the trailing newline.
    pub fn add_text(&mut self, text: &str) {
        self.lines.extend(text.lines().map(str::to_string));
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.generation += 1;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn contents(&self) -> String {
        self.lines.join("\n")
    }
}

/// A call issued to the host shell during the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCall {
    ChangeDir(PathBuf),
    Run(String),
    Exec(Vec<String>),
}

/// Bridge to the host command interpreter.
///
/// Each run spawns a fresh process, so "changing directory" just records the
/// directory the next process starts in.
#[derive(Debug)]
pub struct Shell {
    settings: ShellSettings,
    cwd: PathBuf,
    log: OutputLog,
    calls: Vec<ShellCall>,
}

impl Shell {
    pub fn new(settings: ShellSettings, cwd: PathBuf) -> Self {
        Self {
            settings,
            cwd,
            log: OutputLog::default(),
            calls: Vec::new(),
        }
    }

    pub fn change_dir(&mut self, dir: &Path) {
        debug!("shell cd {:?}", dir);
        self.cwd = dir.to_path_buf();
        self.calls.push(ShellCall::ChangeDir(self.cwd.clone()));
    }

    /// Hands `cmd` to the interpreter unmodified (`sh -c <cmd>` by default).
    pub async fn run(&mut self, cmd: &str) {
        info!("shell run: {}", cmd);
        self.calls.push(ShellCall::Run(cmd.to_string()));

        let mut command = Command::new(&self.settings.program);
        command.arg(&self.settings.flag).arg(cmd);
        self.capture(command, cmd).await;
    }

    /// Runs a program directly, without going through the interpreter.
    pub async fn exec(&mut self, argv: &[String]) {
        let Some((program, args)) = argv.split_first() else {
            warn!("exec called with an empty argument list");
            return;
        };

        let label = argv.join(" ");
        info!("shell exec: {}", label);
        self.calls.push(ShellCall::Exec(argv.to_vec()));

        let mut command = Command::new(program);
        command.args(args);
        self.capture(command, &label).await;
    }

    async fn capture(&mut self, mut command: Command, label: &str) {
        command
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = command.output();
        let result = match self.settings.timeout() {
            Some(limit) => match tokio::time::timeout(limit, output).await {
                Ok(result) => result,
                Err(_) => {
                    warn!("shell command timed out: {}", label);
                    self.log.add_line(format!(
                        "command timed out after {}s: {}",
                        limit.as_secs(),
                        label
                    ));
                    return;
                }
            },
            None => output.await,
        };

        match result {
            Ok(output) => {
                debug!("{} exited with {}", label, output.status);
                self.log.add_text(&String::from_utf8_lossy(&output.stdout));
                self.log.add_text(&String::from_utf8_lossy(&output.stderr));
            }
            Err(e) => {
                warn!("failed to spawn {}: {}", label, e);
                self.log.add_line(format!("failed to run {label}: {e}"));
            }
        }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn log(&self) -> &OutputLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut OutputLog {
        &mut self.log
    }

    pub fn calls(&self) -> &[ShellCall] {
        &self.calls
    }

    /// Forgets the calls recorded for the previous request.
    pub fn begin_request(&mut self) {
        self.calls.clear();
    }
}
