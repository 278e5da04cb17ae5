use anyhow::Context;
use args::Args;
use clap::Parser;
use console::Console;
use log::{LevelFilter, error, info};
use rustedbytes_editor::{EditorConfig, EditorSession, Server};

mod args;
mod console;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::builder()
        .filter_level(level)
        .parse_default_env()
        .init();

    let mut config = match &args.config {
        Some(path) => EditorConfig::load(path).context("loading configuration")?,
        None => EditorConfig::default(),
    };
    if let Some(root_dir) = args.root_dir {
        config.root_dir = root_dir;
    }
    if let Some(timeout) = args.shell_timeout {
        config.shell.timeout_secs = timeout;
    }

    if !config.root_dir.exists() {
        error!("Root directory {:?} does not exist", config.root_dir);
        std::process::exit(1);
    }

    if !config.root_dir.is_dir() {
        error!("Root directory {:?} is not a directory", config.root_dir);
        std::process::exit(1);
    }

    config.root_dir = config
        .root_dir
        .canonicalize()
        .with_context(|| format!("canonicalizing {:?}", config.root_dir))?;

    info!("Editor root directory: {:?}", config.root_dir);
    info!(
        "Shell: {} {} (timeout: {})",
        config.shell.program,
        config.shell.flag,
        match config.shell.timeout() {
            Some(limit) => format!("{}s", limit.as_secs()),
            None => "none".to_string(),
        }
    );

    let server = Server::new(EditorSession::new(config));
    Console::new(server, args.json).run().await
}
