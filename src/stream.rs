//! Stream-time reconciliation of the per-message translation flags.
//!
//! Each message observed on the live stream is classified into at most
//! one transition, and each transition persists exactly one partial
//! update through the host store. Classification is pure; the service
//! owns pending-set membership and update delivery.

use crate::model::{fields, Message, MessageUpdate, Subscription};

/// Flag transition for one stream event. `None` (no transition) is the
/// fourth state of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Translation should be requested: mark the message as in flight.
    Fetching,
    /// A result arrived for a room that no longer wants translation:
    /// record the explicit revert to original.
    ShowInverse,
    /// A previous in-flight marker is settled: clear it.
    Reconciled,
}

/// Classify a stream event for an other-authored message.
///
/// Branches are mutually exclusive and evaluated in priority order:
/// fetch-needed, then pending-but-disabled, then stale-fetching.
/// `awaiting_result` is the message's pending-set membership at the time
/// of the event.
pub fn classify(
    message: &Message,
    subscription: Option<&Subscription>,
    language: &str,
    awaiting_result: bool,
) -> Option<Transition> {
    let enabled = subscription
        .map(|sub| sub.auto_translate_enabled)
        .unwrap_or(false);

    if enabled && !message.text.is_empty() && !message.translations.contains_key(language) {
        Some(Transition::Fetching)
    } else if awaiting_result && !enabled {
        Some(Transition::ShowInverse)
    } else if message.fetching {
        Some(Transition::Reconciled)
    } else {
        None
    }
}

/// The single persisted update a transition issues.
pub fn update_for(transition: Transition) -> MessageUpdate {
    match transition {
        Transition::Fetching => MessageUpdate::new().set(fields::FETCHING, true),
        Transition::ShowInverse => MessageUpdate::new()
            .set(fields::SHOW_INVERSE, true)
            .unset(fields::FETCHING),
        Transition::Reconciled => MessageUpdate::new().unset(fields::FETCHING),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::Value;

    fn message(text: &str, translations: &[(&str, &str)], fetching: bool) -> Message {
        Message {
            id: "msg-1".to_string(),
            room_id: "room-1".to_string(),
            author_id: "other-id".to_string(),
            text: text.to_string(),
            display_html: text.to_string(),
            translations: translations
                .iter()
                .map(|(code, value)| (code.to_string(), value.to_string()))
                .collect(),
            attachments: Vec::new(),
            fetching,
            show_inverse: false,
            ts: Utc::now(),
        }
    }

    fn subscription(enabled: bool) -> Subscription {
        Subscription {
            room_id: "room-1".to_string(),
            auto_translate_enabled: enabled,
            auto_translate_language: Some("es".to_string()),
        }
    }

    // ==================== Branch Tests ====================

    #[test]
    fn test_enabled_untranslated_goes_fetching() {
        let msg = message("Hello", &[], false);
        let transition = classify(&msg, Some(&subscription(true)), "es", false);
        assert_eq!(transition, Some(Transition::Fetching));
    }

    #[test]
    fn test_already_translated_does_not_fetch() {
        let msg = message("Hello", &[("es", "Hola")], false);
        let transition = classify(&msg, Some(&subscription(true)), "es", false);
        assert_eq!(transition, None);
    }

    #[test]
    fn test_translation_for_other_language_still_fetches() {
        let msg = message("Hello", &[("de", "Hallo")], false);
        let transition = classify(&msg, Some(&subscription(true)), "es", false);
        assert_eq!(transition, Some(Transition::Fetching));
    }

    #[test]
    fn test_textless_message_does_not_fetch() {
        let msg = message("", &[], false);
        let transition = classify(&msg, Some(&subscription(true)), "es", false);
        assert_eq!(transition, None);
    }

    #[test]
    fn test_pending_with_disabled_subscription_goes_show_inverse() {
        let msg = message("Hello", &[("es", "Hola")], true);
        let transition = classify(&msg, Some(&subscription(false)), "es", true);
        assert_eq!(transition, Some(Transition::ShowInverse));
    }

    #[test]
    fn test_pending_without_subscription_goes_show_inverse() {
        let msg = message("Hello", &[("es", "Hola")], true);
        let transition = classify(&msg, None, "es", true);
        assert_eq!(transition, Some(Transition::ShowInverse));
    }

    #[test]
    fn test_stale_fetching_is_reconciled() {
        let msg = message("Hello", &[("es", "Hola")], true);
        let transition = classify(&msg, Some(&subscription(true)), "es", false);
        assert_eq!(transition, Some(Transition::Reconciled));
    }

    #[test]
    fn test_nothing_to_do() {
        let msg = message("Hello", &[("es", "Hola")], false);
        assert_eq!(classify(&msg, Some(&subscription(true)), "es", false), None);
        assert_eq!(classify(&msg, None, "es", false), None);
    }

    // ==================== Priority Tests ====================

    #[test]
    fn test_fetch_needed_wins_over_pending() {
        // Enabled room, untranslated, id still pending: requesting the
        // translation takes priority
        let msg = message("Hello", &[], false);
        let transition = classify(&msg, Some(&subscription(true)), "es", true);
        assert_eq!(transition, Some(Transition::Fetching));
    }

    #[test]
    fn test_fetch_needed_wins_over_stale_fetching() {
        let msg = message("Hello", &[], true);
        let transition = classify(&msg, Some(&subscription(true)), "es", false);
        assert_eq!(transition, Some(Transition::Fetching));
    }

    #[test]
    fn test_pending_wins_over_stale_fetching() {
        let msg = message("Hello", &[], true);
        let transition = classify(&msg, Some(&subscription(false)), "es", true);
        assert_eq!(transition, Some(Transition::ShowInverse));
    }

    // ==================== Update Tests ====================

    #[test]
    fn test_fetching_update() {
        let update = update_for(Transition::Fetching);
        assert_eq!(update.set_fields().get(fields::FETCHING), Some(&Value::Bool(true)));
        assert!(update.unset_fields().is_empty());
    }

    #[test]
    fn test_show_inverse_update() {
        let update = update_for(Transition::ShowInverse);
        assert_eq!(
            update.set_fields().get(fields::SHOW_INVERSE),
            Some(&Value::Bool(true))
        );
        assert_eq!(update.unset_fields(), [fields::FETCHING.to_string()]);
    }

    #[test]
    fn test_reconciled_update_clears_flag_only() {
        let update = update_for(Transition::Reconciled);
        assert!(update.set_fields().is_empty());
        assert_eq!(update.unset_fields(), [fields::FETCHING.to_string()]);
    }
}
