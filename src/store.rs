//! Live-collection store seams and their in-memory implementations.
//!
//! The host owns subscription and message persistence; this crate only
//! reads subscriptions, observes their field changes, and issues partial
//! updates against messages. The in-memory implementations back tests
//! and embedded hosts without a live-collection layer.

use crate::model::{fields, Message, MessageUpdate, Subscription};
use anyhow::{bail, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Observer of subscription field changes. `changed_fields` carries the
/// serialized names of the fields that changed.
pub trait SubscriptionObserver: Send + Sync {
    fn subscription_changed(&self, room_id: &str, changed_fields: &[String]);
}

/// Handle for an active change observation. Unsubscribes when consumed
/// explicitly or when dropped.
pub struct ObserverHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl ObserverHandle {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Stop the observation now.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for ObserverHandle {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for ObserverHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverHandle")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Read access to room subscriptions plus change observation.
pub trait SubscriptionStore: Send + Sync {
    fn find_by_room(&self, room_id: &str) -> Option<Subscription>;

    fn observe_changes(&self, observer: Arc<dyn SubscriptionObserver>) -> ObserverHandle;
}

/// Partial-update access to persisted messages.
pub trait MessageStore: Send + Sync {
    fn apply_partial_update(&self, message_id: &str, update: &MessageUpdate) -> Result<()>;
}

#[derive(Default)]
struct SubscriptionsInner {
    subscriptions: HashMap<String, Subscription>,
    observers: HashMap<u64, Arc<dyn SubscriptionObserver>>,
    next_observer_id: u64,
}

/// In-memory [`SubscriptionStore`].
#[derive(Clone, Default)]
pub struct InMemorySubscriptionStore {
    inner: Arc<Mutex<SubscriptionsInner>>,
}

impl InMemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a subscription. Observers are notified with the
    /// names of the fields that actually changed; inserting a brand-new
    /// record emits no change notification.
    pub fn upsert(&self, subscription: Subscription) {
        let (changed, observers) = {
            let mut inner = self.inner.lock().expect("subscription store poisoned");
            let previous = inner
                .subscriptions
                .insert(subscription.room_id.clone(), subscription.clone());

            let changed = match previous {
                None => Vec::new(),
                Some(previous) => {
                    let mut changed = Vec::new();
                    if previous.auto_translate_enabled != subscription.auto_translate_enabled {
                        changed.push(fields::AUTO_TRANSLATE_ENABLED.to_string());
                    }
                    if previous.auto_translate_language != subscription.auto_translate_language {
                        changed.push(fields::AUTO_TRANSLATE_LANGUAGE.to_string());
                    }
                    changed
                }
            };

            let observers: Vec<Arc<dyn SubscriptionObserver>> =
                inner.observers.values().cloned().collect();
            (changed, observers)
        };

        if changed.is_empty() {
            return;
        }

        // Notify outside the lock so observers may read the store
        for observer in observers {
            observer.subscription_changed(&subscription.room_id, &changed);
        }
    }

    pub fn remove(&self, room_id: &str) {
        let mut inner = self.inner.lock().expect("subscription store poisoned");
        inner.subscriptions.remove(room_id);
    }
}

impl SubscriptionStore for InMemorySubscriptionStore {
    fn find_by_room(&self, room_id: &str) -> Option<Subscription> {
        let inner = self.inner.lock().expect("subscription store poisoned");
        inner.subscriptions.get(room_id).cloned()
    }

    fn observe_changes(&self, observer: Arc<dyn SubscriptionObserver>) -> ObserverHandle {
        let observer_id = {
            let mut inner = self.inner.lock().expect("subscription store poisoned");
            let observer_id = inner.next_observer_id;
            inner.next_observer_id += 1;
            inner.observers.insert(observer_id, observer);
            observer_id
        };

        let store = Arc::clone(&self.inner);
        ObserverHandle::new(move || {
            let mut inner = store.lock().expect("subscription store poisoned");
            inner.observers.remove(&observer_id);
        })
    }
}

/// In-memory [`MessageStore`].
#[derive(Clone, Default)]
pub struct InMemoryMessageStore {
    messages: Arc<Mutex<HashMap<String, Message>>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, message: Message) {
        let mut messages = self.messages.lock().expect("message store poisoned");
        messages.insert(message.id.clone(), message);
    }

    pub fn get(&self, message_id: &str) -> Option<Message> {
        let messages = self.messages.lock().expect("message store poisoned");
        messages.get(message_id).cloned()
    }
}

impl MessageStore for InMemoryMessageStore {
    fn apply_partial_update(&self, message_id: &str, update: &MessageUpdate) -> Result<()> {
        let mut messages = self.messages.lock().expect("message store poisoned");
        let Some(message) = messages.get_mut(message_id) else {
            bail!("message {} not found", message_id);
        };

        for (field, value) in update.set_fields() {
            match field.as_str() {
                fields::FETCHING => message.fetching = value.as_bool().unwrap_or(false),
                fields::SHOW_INVERSE => message.show_inverse = value.as_bool().unwrap_or(false),
                // Fields this store doesn't materialize are ignored
                _ => {}
            }
        }
        for field in update.unset_fields() {
            match field.as_str() {
                fields::FETCHING => message.fetching = false,
                fields::SHOW_INVERSE => message.show_inverse = false,
                _ => {}
            }
        }

        Ok(())
    }
}
