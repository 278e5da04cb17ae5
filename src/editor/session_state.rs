use std::path::PathBuf;

use encoding_rs::{Encoding, UTF_8};

/// File label used before anything has been opened.
pub const NO_FILE: &str = "no file";

/// Navigation and buffer state of the editor.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Always an existing directory once a request has been processed.
    pub current_dir: PathBuf,
    /// Not validated until it is read.
    pub opening_file: Option<PathBuf>,
    pub file_name: String,
    pub file_extension: String,
    pub file_type: String,
    pub open_encoding: &'static Encoding,
    pub save_encoding: &'static Encoding,
    pub code: String,
}

impl SessionState {
    pub fn new(current_dir: PathBuf, default_file_type: &str) -> Self {
        Self {
            current_dir,
            opening_file: None,
            file_name: NO_FILE.to_string(),
            file_extension: NO_FILE.to_string(),
            file_type: default_file_type.to_string(),
            open_encoding: UTF_8,
            save_encoding: UTF_8,
            code: String::new(),
        }
    }
}
