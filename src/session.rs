//! Explicit per-login session state.
//!
//! Replaces ambient process-wide mutables: the viewer's identity and
//! preferred language are captured when the session is established, and
//! the pending-translation set lives and dies with the session.

use std::collections::HashSet;
use std::sync::Mutex;

/// State for one authenticated session: the viewing user plus the
/// transient set of message ids awaiting an external translation result.
#[derive(Debug)]
pub struct SessionState {
    user_id: String,
    username: String,
    language: Option<String>,
    pending: Mutex<HashSet<String>>,
}

impl SessionState {
    pub fn new(user_id: impl Into<String>, username: impl Into<String>, language: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            language: language.filter(|code| !code.is_empty()),
            pending: Mutex::new(HashSet::new()),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// The viewer's preferred language, if one is set on the account.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Record that a translation was requested for a message. Called by
    /// the host's request trigger; membership is consumed by the stream
    /// reconciliation.
    pub fn mark_awaiting(&self, message_id: &str) {
        let mut pending = self.pending.lock().expect("pending set poisoned");
        pending.insert(message_id.to_string());
    }

    pub fn is_awaiting(&self, message_id: &str) -> bool {
        let pending = self.pending.lock().expect("pending set poisoned");
        pending.contains(message_id)
    }

    /// Remove a reconciled id. Returns whether it was present.
    pub fn clear_awaiting(&self, message_id: &str) -> bool {
        let mut pending = self.pending.lock().expect("pending set poisoned");
        pending.remove(message_id)
    }

    pub fn awaiting_count(&self) -> usize {
        self.pending.lock().expect("pending set poisoned").len()
    }
}
