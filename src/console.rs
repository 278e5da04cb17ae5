use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use log::{error, warn};
use rustedbytes_editor::editor::types::{DirRow, FileRow};
use rustedbytes_editor::{EditorRequest, EditorView, Server};
use tokio::io::{AsyncBufReadExt, BufReader};

/// One line typed at the plain console.
#[derive(Debug, PartialEq, Eq)]
enum ConsoleInput {
    Request(EditorRequest),
    Tree,
    Code,
    Help,
    Quit,
    Unknown(String),
}

fn parse_input(line: &str) -> ConsoleInput {
    let Some(meta) = line.strip_prefix(':') else {
        return ConsoleInput::Request(EditorRequest::command(line));
    };

    let (word, rest) = meta.split_once(' ').unwrap_or((meta, ""));
    let rest = rest.trim();
    match word {
        "q" | "quit" => ConsoleInput::Quit,
        "tree" | "ls" => ConsoleInput::Tree,
        "code" => ConsoleInput::Code,
        "help" => ConsoleInput::Help,
        "open" if !rest.is_empty() => ConsoleInput::Request(EditorRequest {
            opening_file: Some(rest.to_string()),
            ..EditorRequest::default()
        }),
        "goto" if !rest.is_empty() => ConsoleInput::Request(EditorRequest {
            current_dir: Some(rest.to_string()),
            ..EditorRequest::default()
        }),
        _ => ConsoleInput::Unknown(line.to_string()),
    }
}

/// How much of the output log has already been printed.
#[derive(Debug, Default)]
struct LogCursor {
    generation: u64,
    printed: usize,
}

impl LogCursor {
    /// Lines of `output` not printed yet. A new `generation` means the log was
    /// cleared, so everything in it is new.
    fn advance<'a>(&mut self, output: &'a str, generation: u64) -> Vec<&'a str> {
        if generation != self.generation {
            self.generation = generation;
            self.printed = 0;
        }

        let lines: Vec<&str> = output.lines().collect();
        let fresh = lines.get(self.printed..).unwrap_or_default().to_vec();
        self.printed = lines.len();
        fresh
    }
}

/// Stdin front-end: plays the part of the browser page.
pub struct Console {
    server: Server,
    json: bool,
    cursor: LogCursor,
    prompt_dir: PathBuf,
}

impl Console {
    pub fn new(server: Server, json: bool) -> Self {
        Self {
            server,
            json,
            cursor: LogCursor::default(),
            prompt_dir: PathBuf::new(),
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        if !self.json {
            if let Some(view) = self.submit(&EditorRequest::default()).await {
                print_tree(&view);
            }
            self.prompt()?;
        }

        while let Some(line) = lines.next_line().await? {
            if self.json {
                self.answer_json(&line).await?;
                continue;
            }

            match parse_input(&line) {
                ConsoleInput::Quit => break,
                ConsoleInput::Request(request) => {
                    self.submit(&request).await;
                }
                ConsoleInput::Tree => {
                    if let Some(view) = self.submit(&EditorRequest::default()).await {
                        print_tree(&view);
                    }
                }
                ConsoleInput::Code => {
                    if let Some(view) = self.submit(&EditorRequest::default()).await {
                        println!("--- {} ({}) ---", view.file_name, view.file_type);
                        println!("{}", view.code);
                    }
                }
                ConsoleInput::Help => {
                    if let Some(view) = self.submit(&EditorRequest::default()).await {
                        for doc in view.user_commands.iter().chain(&view.builtin_commands) {
                            println!("{:<14} {}", doc.name, doc.doc);
                        }
                    }
                }
                ConsoleInput::Unknown(input) => {
                    warn!("unknown console input: {}", input);
                    println!("unknown input {input}; try :help, :tree, :code, :open, :goto, :quit");
                }
            }
            self.prompt()?;
        }

        Ok(())
    }

    /// Sends the request and prints the log lines that appeared since the
    /// last request. Server errors are printed and yield `None`.
    async fn submit(&mut self, request: &EditorRequest) -> Option<EditorView> {
        let view = match self.server.handle(request).await {
            Ok(view) => view,
            Err(e) => {
                error!("request failed: {}", e);
                println!("server error: {e}");
                return None;
            }
        };

        for line in self.cursor.advance(&view.output, view.output_generation) {
            println!("{line}");
        }
        self.prompt_dir = view.current_dir.clone();

        Some(view)
    }

    fn prompt(&self) -> Result<()> {
        print!("{}> ", self.prompt_dir.display());
        std::io::stdout().flush()?;
        Ok(())
    }

    async fn answer_json(&self, line: &str) -> Result<()> {
        if line.trim().is_empty() {
            return Ok(());
        }

        let response = match serde_json::from_str::<EditorRequest>(line) {
            Ok(request) => match self.server.handle(&request).await {
                Ok(view) => serde_json::to_string(&view)?,
                Err(e) => {
                    error!("request failed: {}", e);
                    serde_json::json!({ "error": e.to_string() }).to_string()
                }
            },
            Err(e) => {
                warn!("malformed request: {}", e);
                serde_json::json!({ "error": format!("malformed request: {e}") }).to_string()
            }
        };

        println!("{response}");
        Ok(())
    }
}

fn print_tree(view: &EditorView) {
    println!("{}", view.current_dir.display());
    for dir in &view.dirs {
        println!("{}", dir_line(dir));
    }
    for file in &view.files {
        println!("{}", file_line(file));
    }
}

fn dir_line(dir: &DirRow) -> String {
    let size = dir.shallow_size.map(|s| s.to_string()).unwrap_or_default();
    format!("d {:>10} {:>12} {}/", size, "", dir.name)
}

fn file_line(file: &FileRow) -> String {
    format!(
        "- {:>10} {} {}",
        file.human_size,
        file.last_update.format("%b %d %H:%M"),
        file.name
    )
}
