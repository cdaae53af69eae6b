//! Render-time decision: original or translated display content.

use crate::attachments::translate_attachments;
use crate::model::{Message, Subscription, ORIGINAL_KEY};
use tracing::debug;

/// Decide and apply the displayed content for a message about to be
/// rendered.
///
/// For other-authored messages, the room's opt-in XOR'd with the
/// per-message inverse toggle decides whether the translated variant is
/// shown: `auto_translate_enabled != show_inverse`. The toggle flips the
/// subscription default in both directions, so the comparison must stay
/// exactly as written. Attachments are rewritten for every message,
/// whatever that decision was.
///
/// Missing subscription or missing translation degrades to the original
/// content; this never fails.
pub fn apply(
    message: &mut Message,
    subscription: Option<&Subscription>,
    language: &str,
    viewer_id: &str,
    viewer_name: &str,
) {
    if message.author_id != viewer_id {
        let wants_translation = subscription
            .map(|sub| sub.auto_translate_enabled)
            .unwrap_or(false);
        let apply_translation = wants_translation != message.show_inverse;

        if apply_translation {
            // Snapshot the pre-substitution display text exactly once;
            // repeating the render must not capture translated content.
            if !message.translations.contains_key(ORIGINAL_KEY) {
                message
                    .translations
                    .insert(ORIGINAL_KEY.to_string(), message.display_html.clone());
            }
            if let Some(translated) = message.translations.get(language) {
                debug!(message_id = %message.id, %language, "substituting translated display content");
                message.display_html = translated.clone();
            }
        }

        translate_attachments(&mut message.attachments, language, viewer_name);
    } else {
        // Self-authored: display text stays, but quoted content inside
        // attachments may still belong to others
        translate_attachments(&mut message.attachments, language, viewer_name);
    }
}
