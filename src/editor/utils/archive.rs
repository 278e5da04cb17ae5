use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Component, Path};
use std::str::FromStr;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::EditorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Zip,
    Tar,
    GzTar,
}

impl ArchiveKind {
    pub fn extension(self) -> &'static str {
        match self {
            ArchiveKind::Zip => "zip",
            ArchiveKind::Tar => "tar",
            ArchiveKind::GzTar => "tar.gz",
        }
    }

    /// Guesses the format from an archive's file name.
    pub fn from_archive_name(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        if name.ends_with(".zip") {
            Some(ArchiveKind::Zip)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(ArchiveKind::GzTar)
        } else if name.ends_with(".tar") {
            Some(ArchiveKind::Tar)
        } else {
            None
        }
    }
}

impl FromStr for ArchiveKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zip" => Ok(ArchiveKind::Zip),
            "tar" => Ok(ArchiveKind::Tar),
            "gztar" => Ok(ArchiveKind::GzTar),
            other => Err(format!(
                "unsupported archive kind: {other} (expected zip, tar, gztar)"
            )),
        }
    }
}

impl fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArchiveKind::Zip => "zip",
            ArchiveKind::Tar => "tar",
            ArchiveKind::GzTar => "gztar",
        };
        f.write_str(name)
    }
}

/// Packs `source` (file or directory) into `archive`. Entries are rooted at
/// `root_name`, so unpacking recreates `root_name/...`. When `archive` is
/// written inside `source` it is left out of its own contents.
pub fn create_archive(
    kind: ArchiveKind,
    source: &Path,
    root_name: &str,
    archive: &Path,
) -> Result<(), EditorError> {
    let file = File::create(archive)?;

    match kind {
        ArchiveKind::Zip => write_zip(file, source, root_name, archive)?,
        ArchiveKind::Tar => {
            let mut builder = tar::Builder::new(file);
            append_tar(&mut builder, source, root_name, archive)?;
            builder.into_inner()?.flush()?;
        }
        ArchiveKind::GzTar => {
            let encoder = GzEncoder::new(file, Compression::default());
            let mut builder = tar::Builder::new(encoder);
            append_tar(&mut builder, source, root_name, archive)?;
            builder.into_inner()?.finish()?;
        }
    }

    Ok(())
}

/// Unpacks `archive` into `dest`. Entries escaping `dest` are rejected by the
/// zip and tar readers.
pub fn extract_archive(kind: ArchiveKind, archive: &Path, dest: &Path) -> Result<(), EditorError> {
    let file = File::open(archive)?;

    match kind {
        ArchiveKind::Zip => ZipArchive::new(file)?.extract(dest)?,
        ArchiveKind::Tar => tar::Archive::new(file).unpack(dest)?,
        ArchiveKind::GzTar => tar::Archive::new(GzDecoder::new(file)).unpack(dest)?,
    }

    Ok(())
}

fn append_tar<W: Write>(
    builder: &mut tar::Builder<W>,
    source: &Path,
    root_name: &str,
    archive: &Path,
) -> Result<(), EditorError> {
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        if entry.path() == archive {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(io::Error::other)?;
        let name = entry_name(root_name, relative);

        if entry.file_type().is_dir() {
            builder.append_dir(&name, entry.path())?;
        } else {
            builder.append_path_with_name(entry.path(), &name)?;
        }
    }
    Ok(())
}

fn write_zip(file: File, source: &Path, root_name: &str, archive: &Path) -> Result<(), EditorError> {
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        if entry.path() == archive {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(io::Error::other)?;
        let name = entry_name(root_name, relative);

        if entry.file_type().is_dir() {
            writer.add_directory(format!("{name}/"), options)?;
        } else {
            writer.start_file(name, options)?;
            let mut input = File::open(entry.path())?;
            io::copy(&mut input, &mut writer)?;
        }
    }

    writer.finish()?;
    Ok(())
}

/// Archive entry names always use `/`.
fn entry_name(root_name: &str, relative: &Path) -> String {
    let mut name = root_name.to_string();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            name.push('/');
            name.push_str(&part.to_string_lossy());
        }
    }
    name
}
