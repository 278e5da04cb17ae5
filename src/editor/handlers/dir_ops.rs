use log::info;

use crate::editor::EditorSession;
use crate::editor::tree::SortType;
use crate::error::EditorError;

/// Replaces the shell's `cd` so the listing and the shell move together.
pub async fn change_directory(session: &mut EditorSession, args: &[String]) -> Result<(), EditorError> {
    let requested = args[0].as_str();

    if session.update_dir(Some(requested)) {
        let current_dir = session.state.current_dir.clone();
        session.shell.change_dir(&current_dir);
        session
            .log()
            .add_line(format!("current directory: {}", current_dir.display()));
    } else {
        let path = session.resolver().resolve(requested);
        session
            .log()
            .add_line(format!("not a directory: {}", path.display()));
    }

    Ok(())
}

pub async fn set_sort(session: &mut EditorSession, args: &[String]) -> Result<(), EditorError> {
    match args[0].parse::<SortType>() {
        Ok(sort_type) => {
            info!("listing sorted by {}", sort_type);
            session.tree.sort_type = sort_type;
            session.log().add_line(format!("sort set to {sort_type}"));
        }
        Err(message) => session.log().add_line(message),
    }
    Ok(())
}

pub async fn toggle_reverse(session: &mut EditorSession, _args: &[String]) -> Result<(), EditorError> {
    let reverse = session.tree.toggle_reverse();
    let state = if reverse { "on" } else { "off" };
    session.log().add_line(format!("reverse order {state}"));
    Ok(())
}
