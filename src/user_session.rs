use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    // album intake: the next photo or document goes to the album
    AwaitingAlbumFile,
}

/// in-memory conversation state keyed by telegram user id, lost on restart
#[derive(Clone, Default)]
pub struct SessionManager {
    sessions: Arc<Mutex<HashMap<String, SessionState>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn get_session(&self, user_id: &str) -> SessionState {
        let sessions = self.sessions.lock().await;
        sessions
            .get(user_id)
            .cloned()
            .unwrap_or(SessionState::Idle)
    }

    pub async fn set_session(&self, user_id: &str, state: SessionState) {
        let mut sessions = self.sessions.lock().await;
        if state == SessionState::Idle {
            sessions.remove(user_id);
            return;
        }
        sessions.insert(user_id.to_string(), state);
    }

    pub async fn clear_session(&self, user_id: &str) {
        let mut sessions = self.sessions.lock().await;
        sessions.remove(user_id);
    }

    pub async fn is_awaiting_album(&self, user_id: &str) -> bool {
        self.get_session(user_id).await == SessionState::AwaitingAlbumFile
    }
}
