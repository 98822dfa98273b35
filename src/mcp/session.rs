use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// What we know about an HTTP client session.
#[derive(Debug, Clone)]
pub struct Session {
    pub client_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Manages MCP session IDs issued by the HTTP transport.
#[derive(Debug, Clone, Default)]
pub struct SessionManager {
    sessions: Arc<Mutex<HashMap<String, Session>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new session. Returns the session ID.
    pub fn create_session(&self, client_name: Option<&str>) -> String {
        let session_id = Uuid::new_v4().to_string();
        let session = Session {
            client_name: client_name.map(str::to_string),
            created_at: Utc::now(),
        };
        self.lock().insert(session_id.clone(), session);
        session_id
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.lock().contains_key(session_id)
    }

    /// Remove a session, returning it if it existed.
    pub fn remove_session(&self, session_id: &str) -> Option<Session> {
        self.lock().remove(session_id)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Session>> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
