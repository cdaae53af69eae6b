//! Core data model: messages, subscriptions, attachments, and the
//! partial-update verbs delegated to the host store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Key under which the pre-translation display text is preserved in a
/// message's translations map.
pub const ORIGINAL_KEY: &str = "original";

/// Field names used in persisted partial updates and in change
/// notifications. These match the serialized names of the corresponding
/// [`Message`] and [`Subscription`] fields.
pub mod fields {
    /// Translation requested, result not yet observed.
    pub const FETCHING: &str = "fetching";
    /// Viewer explicitly reverted this message to its original language.
    pub const SHOW_INVERSE: &str = "showInverse";
    /// Subscription: room-level auto-translate opt-in.
    pub const AUTO_TRANSLATE_ENABLED: &str = "autoTranslateEnabled";
    /// Subscription: room-level target language.
    pub const AUTO_TRANSLATE_LANGUAGE: &str = "autoTranslateLanguage";
}

/// A user's membership/preferences record for a room.
///
/// Owned by the host's live-collection layer; read-only to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub room_id: String,

    /// Room-level auto-translate opt-in.
    #[serde(default)]
    pub auto_translate_enabled: bool,

    /// Preferred target language for this room, if the user picked one.
    #[serde(default)]
    pub auto_translate_language: Option<String>,
}

/// A chat message as observed by the render and stream hooks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub room_id: String,
    pub author_id: String,

    /// Raw message text. Empty when the message carries only attachments.
    #[serde(default)]
    pub text: String,

    /// Rendered display content, substituted in place when a translation
    /// is applied.
    #[serde(default)]
    pub display_html: String,

    /// Translated variants keyed by language code. The [`ORIGINAL_KEY`]
    /// entry, once present, holds the display text captured before any
    /// substitution and is never overwritten.
    #[serde(default)]
    pub translations: HashMap<String, String>,

    #[serde(default)]
    pub attachments: Vec<Attachment>,

    /// Translation requested for this message, result not yet observed.
    #[serde(default)]
    pub fetching: bool,

    /// Viewer explicitly reverted this message to its original language.
    #[serde(default)]
    pub show_inverse: bool,

    #[serde(default = "Utc::now")]
    pub ts: DateTime<Utc>,
}

/// A (possibly nested) block of message content eligible for independent
/// translation. Depth is unbounded but finite per message.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(default)]
    pub author_name: Option<String>,

    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Translated variants of this node's content, keyed by language code.
    #[serde(default)]
    pub translations: HashMap<String, String>,

    #[serde(default)]
    pub children: Vec<Attachment>,
}

/// Ordered "set field" / "unset field" verbs applied to a persisted
/// message by the host store. No wire format is implied; the host maps
/// these onto whatever partial-update mechanism it has.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MessageUpdate {
    set: BTreeMap<String, Value>,
    unset: Vec<String>,
}

impl MessageUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field to set. Later sets of the same field win.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set.insert(field.into(), value.into());
        self
    }

    /// Add a field to unset.
    pub fn unset(mut self, field: impl Into<String>) -> Self {
        self.unset.push(field.into());
        self
    }

    pub fn set_fields(&self) -> &BTreeMap<String, Value> {
        &self.set
    }

    pub fn unset_fields(&self) -> &[String] {
        &self.unset
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.unset.is_empty()
    }
}
