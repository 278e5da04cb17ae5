use std::path::Path;

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::SizeError;

const DECIMAL_SUFFIXES: [&str; 8] = ["KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];
const BINARY_SUFFIXES: [&str; 8] = ["KiB", "MiB", "GiB", "TiB", "PiB", "EiB", "ZiB", "YiB"];

/// Multiple used when reducing a byte count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum SizeBase {
    #[default]
    Decimal,
    Binary,
}

impl SizeBase {
    pub fn multiple(self) -> u32 {
        match self {
            SizeBase::Decimal => 1000,
            SizeBase::Binary => 1024,
        }
    }

    fn suffixes(self) -> &'static [&'static str] {
        match self {
            SizeBase::Decimal => &DECIMAL_SUFFIXES,
            SizeBase::Binary => &BINARY_SUFFIXES,
        }
    }
}

impl TryFrom<u32> for SizeBase {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1000 => Ok(SizeBase::Decimal),
            1024 => Ok(SizeBase::Binary),
            other => Err(format!("size base must be 1000 or 1024, got {other}")),
        }
    }
}

impl From<SizeBase> for u32 {
    fn from(base: SizeBase) -> Self {
        base.multiple()
    }
}

/// Renders `size` bytes as `"{value:.1} {unit}"`.
///
/// The count is divided by the base once per unit, starting at KB/KiB, and the
/// first unit whose rendered value stays below the base wins. Sizes smaller
/// than one unit are therefore shown as fractions (`500` -> `"0.5 KB"`).
/// At YB/YiB only the unrounded value must stay below the base, so a value just
/// under the limit may render as `"1000.0 YB"`; anything larger is `Overflow`.
pub fn human_size(size: i128, base: SizeBase) -> Result<String, SizeError> {
    if size < 0 {
        return Err(SizeError::InvalidArgument(size));
    }

    let multiple = f64::from(base.multiple());
    let mut value = size as f64;

    let suffixes = base.suffixes();
    for (index, suffix) in suffixes.iter().enumerate() {
        value /= multiple;
        let rendered = format!("{value:.1}");
        let fits = if index + 1 == suffixes.len() {
            // nothing above the last unit, so only the raw value counts
            value < multiple
        } else {
            // 1023.96 renders as "1024.0", which belongs to the next unit
            rendered.parse::<f64>().is_ok_and(|shown| shown < multiple)
        };
        if fits {
            return Ok(format!("{rendered} {suffix}"));
        }
    }

    Err(SizeError::Overflow(size))
}

/// Recursive sum of every file size under `path`. A plain file yields its own
/// length; entries that cannot be read are skipped.
pub fn aggregate_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .map(|metadata| metadata.len())
        .sum()
}
