use log::info;

use crate::editor::EditorSession;
use crate::editor::utils::archive::{ArchiveKind, create_archive, extract_archive};
use crate::error::EditorError;

/// `freeze path [kind]`: writes `<last component>.<ext>` into the current
/// directory, with entries rooted at that last component.
pub async fn compress(session: &mut EditorSession, args: &[String]) -> Result<(), EditorError> {
    let requested = &args[0];
    let kind = match args.get(1).map(String::as_str).unwrap_or("zip").parse::<ArchiveKind>() {
        Ok(kind) => kind,
        Err(message) => {
            session.log().add_line(message);
            return Ok(());
        }
    };

    let source = session.resolver().resolve(requested);
    if !source.exists() {
        session
            .log()
            .add_line(format!("not found: {}", source.display()));
        return Ok(());
    }

    let Some(root_name) = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
    else {
        session
            .log()
            .add_line(format!("cannot archive: {}", source.display()));
        return Ok(());
    };

    let archive = session
        .state
        .current_dir
        .join(format!("{root_name}.{}", kind.extension()));
    let written = archive.clone();
    tokio::task::spawn_blocking(move || create_archive(kind, &source, &root_name, &archive))
        .await??;

    info!("created {} archive {:?}", kind, written);
    session.log().add_line(format!(
        "compressed: {requested} -> {}",
        written.display()
    ));
    Ok(())
}

/// `unfreeze archive`: extracts into the current directory.
pub async fn decompress(session: &mut EditorSession, args: &[String]) -> Result<(), EditorError> {
    let archive = session.resolver().resolve(&args[0]);

    if !archive.exists() {
        session
            .log()
            .add_line(format!("not found: {}", archive.display()));
        return Ok(());
    }

    let name = archive
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let Some(kind) = ArchiveKind::from_archive_name(&name) else {
        session.log().add_line(format!(
            "unsupported archive format: {}",
            archive.display()
        ));
        return Ok(());
    };

    let dest = session.state.current_dir.clone();
    let source = archive.clone();
    tokio::task::spawn_blocking(move || extract_archive(kind, &source, &dest)).await??;

    info!("extracted {:?} into {:?}", archive, session.state.current_dir);
    session
        .log()
        .add_line(format!("decompressed: {}", archive.display()));
    Ok(())
}
