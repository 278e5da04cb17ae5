use std::path::Path;

use log::warn;
use tokio::fs;

use crate::editor::EditorSession;
use crate::error::EditorError;

/// `check file` lints `file`; plain `check` lints the open file.
pub async fn lint_check(session: &mut EditorSession, args: &[String]) -> Result<(), EditorError> {
    let target = match args.first() {
        Some(name) => {
            let path = session.resolver().resolve(name);
            if !path.exists() {
                session
                    .log()
                    .add_line(format!("not found: {}", path.display()));
                return Ok(());
            }
            path
        }
        None => match session.state.opening_file.clone() {
            Some(path) => path,
            None => {
                session.log().add_line("specify a file name or open a file");
                return Ok(());
            }
        },
    };

    let argv = with_target(&session.config.tools.lint, &target);
    session.shell.exec(&argv).await;
    Ok(())
}

/// Formats a single file, or every matching file directly inside a directory.
pub async fn auto_format(session: &mut EditorSession, args: &[String]) -> Result<(), EditorError> {
    let relative = args.first().map(String::as_str).unwrap_or(".");
    let path = session.resolver().resolve(relative);
    let extension = session.config.tools.format_extension.clone();

    if !path.exists() {
        session
            .log()
            .add_line(format!("not found: {}", path.display()));
        return Ok(());
    }

    let targets = if path.is_dir() {
        let mut targets = Vec::new();
        let mut read_dir = fs::read_dir(&path).await?;
        while let Some(entry) = read_dir.next_entry().await? {
            let candidate = entry.path();
            if candidate.is_file() && has_extension(&candidate, &extension) {
                targets.push(candidate);
            }
        }
        if targets.is_empty() {
            warn!("no .{} files under {:?}", extension, path);
        }
        targets.sort();
        targets
    } else if has_extension(&path, &extension) {
        vec![path]
    } else {
        session.log().add_line(format!(
            "not a {extension} file or directory: {}",
            path.display()
        ));
        return Ok(());
    };

    for target in targets {
        let argv = with_target(&session.config.tools.format, &target);
        session.shell.exec(&argv).await;
    }
    Ok(())
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext == extension)
}

fn with_target(tool: &[String], target: &Path) -> Vec<String> {
    let mut argv = tool.to_vec();
    argv.push(target.to_string_lossy().into_owned());
    argv
}
