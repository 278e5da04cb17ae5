use log::info;

use crate::editor::EditorSession;
use crate::editor::utils::text::encoding_for_label;
use crate::error::EditorError;

pub async fn delete_log(session: &mut EditorSession, _args: &[String]) -> Result<(), EditorError> {
    session.log().clear();
    session.log().add_line("output cleared");
    Ok(())
}

pub async fn delete_history(session: &mut EditorSession, _args: &[String]) -> Result<(), EditorError> {
    session.command.history.clear();
    session.log().add_line("command history cleared");
    Ok(())
}

pub async fn show_history(session: &mut EditorSession, _args: &[String]) -> Result<(), EditorError> {
    for cmd in session.command.history.entries() {
        session.shell.log_mut().add_line(cmd.clone());
    }
    Ok(())
}

pub async fn set_open_encoding(session: &mut EditorSession, args: &[String]) -> Result<(), EditorError> {
    let Some(encoding) = encoding_for_label(&args[0]) else {
        session
            .log()
            .add_line(format!("unknown encoding: {}", args[0]));
        return Ok(());
    };

    info!("open encoding: {}", encoding.name());
    session.state.open_encoding = encoding;
    session
        .log()
        .add_line(format!("open encoding set to {}", encoding.name()));
    Ok(())
}

pub async fn set_save_encoding(session: &mut EditorSession, args: &[String]) -> Result<(), EditorError> {
    let Some(encoding) = encoding_for_label(&args[0]) else {
        session
            .log()
            .add_line(format!("unknown encoding: {}", args[0]));
        return Ok(());
    };

    info!("save encoding: {}", encoding.name());
    session.state.save_encoding = encoding;
    session
        .log()
        .add_line(format!("save encoding set to {}", encoding.name()));
    Ok(())
}

pub async fn show_venv(session: &mut EditorSession, _args: &[String]) -> Result<(), EditorError> {
    let line = match std::env::var("VIRTUAL_ENV") {
        Ok(venv) if !venv.is_empty() => venv,
        _ => "VIRTUAL_ENV is not set".to_string(),
    };
    session.log().add_line(line);
    Ok(())
}
