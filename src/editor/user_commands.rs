//! Site-specific commands. Anything registered here shadows a built-in of
//! the same name.

use chrono::Local;

use super::EditorSession;
use super::command::registry::handler;
use super::command::{Arity, CommandSpec};
use crate::error::EditorError;

pub const USER_COMMANDS: &[CommandSpec] = &[CommandSpec {
    name: "now",
    handler: handler!(now),
    arity: Arity::exactly(0),
    doc: "print the current local time",
}];

async fn now(session: &mut EditorSession, _args: &[String]) -> Result<(), EditorError> {
    let now = Local::now();
    session
        .log()
        .add_line(now.format("%Y-%m-%d %H:%M:%S%.6f%:z").to_string());
    Ok(())
}
