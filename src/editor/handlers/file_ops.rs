use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};
use tokio::fs;
use walkdir::WalkDir;

use crate::editor::EditorSession;
use crate::editor::utils::size::{aggregate_size, human_size};
use crate::editor::utils::text;
use crate::error::EditorError;

/// `save` writes the buffer to the open file; `save name` creates `name` in
/// the current directory (never overwriting) and then tracks it as the open file.
pub async fn save(session: &mut EditorSession, args: &[String]) -> Result<(), EditorError> {
    let encoding = session.state.save_encoding;
    let Some(bytes) = text::encode(&session.state.code, encoding) else {
        warn!("buffer is not representable in {}", encoding.name());
        session
            .log()
            .add_line(format!("could not encode with {}", encoding.name()));
        return Ok(());
    };

    if let Some(file_name) = args.first() {
        let path = session.resolver().resolve(file_name);
        if path.exists() {
            session
                .log()
                .add_line(format!("file already exists: {}", path.display()));
            return Ok(());
        }

        fs::write(&path, &bytes).await?;
        info!("saved {} bytes to new file {:?}", bytes.len(), path);
        session
            .log()
            .add_line(format!("new file saved: {}", path.display()));
        session.open_file(path);
    } else if let Some(path) = session.state.opening_file.clone() {
        fs::write(&path, &bytes).await?;
        info!("saved {} bytes to {:?}", bytes.len(), path);
        session
            .log()
            .add_line(format!("file overwritten: {}", path.display()));
    } else {
        session.log().add_line("specify a file name or open a file");
    }

    Ok(())
}

pub async fn remove(session: &mut EditorSession, args: &[String]) -> Result<(), EditorError> {
    let path = session.resolver().resolve(&args[0]);

    if path.is_dir() {
        fs::remove_dir_all(&path).await?;
        info!("removed directory {:?}", path);
        session
            .log()
            .add_line(format!("directory removed: {}", path.display()));
    } else if fs::symlink_metadata(&path).await.is_ok() {
        fs::remove_file(&path).await?;
        info!("removed file {:?}", path);
        session
            .log()
            .add_line(format!("file removed: {}", path.display()));
    } else {
        session
            .log()
            .add_line(format!("not found: {}", path.display()));
    }

    Ok(())
}

pub async fn move_entry(session: &mut EditorSession, args: &[String]) -> Result<(), EditorError> {
    let Some((source, target)) = transfer_paths(session, &args[0], &args[1]) else {
        return Ok(());
    };

    if let Err(e) = fs::rename(&source, &target).await {
        if e.kind() != io::ErrorKind::CrossesDevices {
            return Err(e.into());
        }
        // rename cannot cross filesystems
        copy_any(source.clone(), target.clone()).await?;
        if source.is_dir() {
            fs::remove_dir_all(&source).await?;
        } else {
            fs::remove_file(&source).await?;
        }
    }

    info!("moved {:?} to {:?}", source, target);
    session
        .log()
        .add_line(format!("moved: {} -> {}", args[0], args[1]));
    Ok(())
}

pub async fn copy_entry(session: &mut EditorSession, args: &[String]) -> Result<(), EditorError> {
    let Some((source, target)) = transfer_paths(session, &args[0], &args[1]) else {
        return Ok(());
    };

    copy_any(source.clone(), target.clone()).await?;

    info!("copied {:?} to {:?}", source, target);
    session
        .log()
        .add_line(format!("copied: {} -> {}", args[0], args[1]));
    Ok(())
}

/// Reports the aggregate (recursive) size, unlike the shallow size shown in
/// the directory listing.
pub async fn dir_size(session: &mut EditorSession, args: &[String]) -> Result<(), EditorError> {
    let name = &args[0];
    let path = session.resolver().resolve(name);

    if fs::symlink_metadata(&path).await.is_err() {
        session
            .log()
            .add_line(format!("not found: {}", path.display()));
        return Ok(());
    }

    let size = tokio::task::spawn_blocking(move || aggregate_size(&path)).await?;
    let human = human_size(i128::from(size), session.config.size_base)?;
    session.log().add_line(format!("{name}: {human} - {size}"));
    Ok(())
}

/// Resolves the source and destination of `mv2`/`cp2`. An existing directory
/// as destination receives the source inside it. Logs and returns `None` when
/// the source is missing, the final destination already exists or lies inside
/// the source directory.
fn transfer_paths(session: &mut EditorSession, before: &str, after: &str) -> Option<(PathBuf, PathBuf)> {
    let resolver = session.resolver();
    let source = resolver.resolve(before);
    let mut target = resolver.resolve(after);

    if !source.exists() {
        session
            .log()
            .add_line(format!("not found: {}", source.display()));
        return None;
    }

    if target.is_dir() {
        if let Some(name) = source.file_name() {
            target.push(name);
        }
    }

    if target.exists() {
        session
            .log()
            .add_line(format!("already exists: {}", target.display()));
        return None;
    }

    // the walk would pick up the copy it is writing
    if source.is_dir() && target.starts_with(&source) {
        session
            .log()
            .add_line(format!("cannot copy into itself: {}", target.display()));
        return None;
    }

    Some((source, target))
}

async fn copy_any(source: PathBuf, target: PathBuf) -> Result<(), EditorError> {
    if source.is_dir() {
        tokio::task::spawn_blocking(move || copy_tree(&source, &target)).await??;
    } else {
        fs::copy(&source, &target).await?;
    }
    Ok(())
}

fn copy_tree(source: &Path, target: &Path) -> io::Result<()> {
    for entry in WalkDir::new(source) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(io::Error::other)?;
        let destination = target.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&destination)?;
        } else {
            std::fs::copy(entry.path(), &destination)?;
        }
    }
    Ok(())
}
