use std::path::PathBuf;

use clap::Parser;

/// Command-line configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory the editor starts in (overrides the config file)
    #[arg(long)]
    pub root_dir: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Seconds before a shell command is killed, 0 for no limit
    #[arg(long)]
    pub shell_timeout: Option<u64>,

    /// Read one JSON request per line and answer with one JSON view per line
    #[arg(long)]
    pub json: bool,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
