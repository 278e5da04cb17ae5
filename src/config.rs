use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::info;
use serde::Deserialize;

use crate::editor::utils::size::SizeBase;
use crate::error::ConfigError;

/// Editor settings, read from an optional TOML file. Every field has a default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Directory the editor starts in.
    pub root_dir: PathBuf,
    /// Highlighting type used when an extension has no entry in `file_types`.
    pub default_file_type: String,
    /// Extension (with the leading dot) to highlighting type.
    pub file_types: HashMap<String, String>,
    /// 1000 or 1024.
    pub size_base: SizeBase,
    pub shell: ShellSettings,
    pub tools: ToolSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShellSettings {
    pub program: String,
    pub flag: String,
    /// Seconds before a shell command is killed; 0 waits forever.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// Linter argv; the target file is appended.
    pub lint: Vec<String>,
    /// In-place formatter argv; the target file is appended.
    pub format: Vec<String>,
    /// Extension (without the dot) of files the formatter accepts.
    pub format_extension: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        let file_types = [
            (".py", "python"),
            (".rs", "rust"),
            (".js", "javascript"),
            (".ts", "typescript"),
            (".html", "html"),
            (".css", "css"),
            (".json", "json"),
            (".toml", "toml"),
            (".md", "markdown"),
            (".sh", "sh"),
            (".c", "c_cpp"),
            (".cpp", "c_cpp"),
            (".go", "golang"),
            (".java", "java"),
        ]
        .into_iter()
        .map(|(ext, kind)| (ext.to_string(), kind.to_string()))
        .collect();

        Self {
            root_dir: PathBuf::from("."),
            default_file_type: "text".to_string(),
            file_types,
            size_base: SizeBase::Decimal,
            shell: ShellSettings::default(),
            tools: ToolSettings::default(),
        }
    }
}

impl Default for ShellSettings {
    fn default() -> Self {
        #[cfg(windows)]
        let (program, flag) = ("cmd", "/C");
        #[cfg(not(windows))]
        let (program, flag) = ("sh", "-c");

        Self {
            program: program.to_string(),
            flag: flag.to_string(),
            timeout_secs: 0,
        }
    }
}

impl ShellSettings {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            lint: vec!["python3".into(), "-m".into(), "flake8".into()],
            format: vec!["python3".into(), "-m".into(), "pyformat".into(), "-i".into()],
            format_extension: "py".to_string(),
        }
    }
}

impl EditorConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        info!("loaded config from {:?}", path);
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Highlighting type for an extension such as `".py"`.
    pub fn file_type(&self, extension: &str) -> &str {
        self.file_types
            .get(extension)
            .map(String::as_str)
            .unwrap_or(&self.default_file_type)
    }
}
