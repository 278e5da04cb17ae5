pub mod config;
pub mod editor;
pub mod error;
pub mod file_info;
pub mod server;

pub use config::EditorConfig;
pub use editor::{EditorRequest, EditorSession, EditorView};
pub use error::EditorError;
pub use server::Server;
