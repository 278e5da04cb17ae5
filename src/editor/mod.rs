pub mod command;
pub mod handlers;
pub mod session;
pub mod session_state;
pub mod shell;
pub mod tree;
pub mod types;
pub mod user_commands;
pub mod utils;

pub use session::EditorSession;
pub use session_state::*;
pub use types::{EditorRequest, EditorView};
