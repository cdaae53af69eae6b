//! Display-language resolution: the fallback chain and its cache.
//!
//! Resolution walks subscription language -> user language -> platform
//! default, then normalizes against the catalog (see [`crate::i18n`]).
//! Results are cached per room until the subscription changes; the
//! no-room case is cached under its own distinct key.

use crate::model::Subscription;
use std::collections::HashMap;
use std::sync::Mutex;

/// Pick the language to resolve before catalog normalization.
///
/// The subscription's room-level choice wins when set (an empty string
/// counts as unset), then the user's preferred language, then the
/// platform default. Absent subscriptions resolve silently through the
/// fallback chain.
pub fn preferred_language(
    subscription: Option<&Subscription>,
    user_language: Option<&str>,
    default_language: &str,
) -> String {
    subscription
        .and_then(|sub| sub.auto_translate_language.as_deref())
        .filter(|code| !code.is_empty())
        .or(user_language.filter(|code| !code.is_empty()))
        .unwrap_or(default_language)
        .to_string()
}

/// Cache of resolved display languages, keyed by room.
///
/// Entries are created lazily on resolve and dropped on subscription
/// change notifications; a missed or duplicate invalidation costs at most
/// one stale resolution. `None` keys the no-room fallback entry.
#[derive(Debug, Default)]
pub struct ResolverCache {
    entries: Mutex<HashMap<Option<String>, String>>,
}

impl ResolverCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached language for a room, if still valid.
    pub fn get(&self, room_id: Option<&str>) -> Option<String> {
        let entries = self.entries.lock().expect("resolver cache poisoned");
        entries.get(&room_id.map(str::to_string)).cloned()
    }

    /// Record a resolved language for a room.
    pub fn insert(&self, room_id: Option<&str>, language: &str) {
        let mut entries = self.entries.lock().expect("resolver cache poisoned");
        entries.insert(room_id.map(str::to_string), language.to_string());
    }

    /// Drop the entry for one room, forcing recomputation on the next
    /// resolve. Unconditional and idempotent.
    pub fn invalidate(&self, room_id: &str) {
        let mut entries = self.entries.lock().expect("resolver cache poisoned");
        entries.remove(&Some(room_id.to_string()));
    }

    /// Drop every entry (session change or teardown).
    pub fn clear(&self) {
        let mut entries = self.entries.lock().expect("resolver cache poisoned");
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("resolver cache poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
