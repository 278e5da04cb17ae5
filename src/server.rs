use std::sync::Arc;

use tokio::sync::Mutex;

use crate::editor::{EditorRequest, EditorSession, EditorView};
use crate::error::EditorError;

/// Shares one editor session between every caller.
///
/// Requests are serialised by a single lock, one writer at a time. All
/// callers see and mutate the same history, open file and directory; there
/// is no per-user isolation.
#[derive(Clone)]
pub struct Server {
    session: Arc<Mutex<EditorSession>>,
}

impl Server {
    pub fn new(session: EditorSession) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }

    /// Runs the whole update pipeline for `request` and renders the result.
    pub async fn handle(&self, request: &EditorRequest) -> Result<EditorView, EditorError> {
        let mut session = self.session.lock().await;
        session.update(request).await?;
        Ok(session.view())
    }
}
