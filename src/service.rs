//! The auto-translation service: dependency wiring, session lifecycle,
//! and the render/stream pipeline stages.

use crate::attachments;
use crate::config::Config;
use crate::host::{IdentityProvider, PermissionChecker, SettingsStore, UserIdentity};
use crate::i18n::{effective_code, LanguageCatalog, ProviderMetadata, SupportedLanguage};
use crate::model::{fields, Attachment, Message};
use crate::pipeline::{MessagePipeline, RenderStage, StageId, StreamStage};
use crate::remote::{RemoteError, RemoteGateway};
use crate::render;
use crate::resolver::{preferred_language, ResolverCache};
use crate::session::SessionState;
use crate::store::{MessageStore, ObserverHandle, SubscriptionObserver, SubscriptionStore};
use crate::stream::{self, Transition};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, info, warn};

/// Capability gating the supported-language fetch and hook registration.
pub const CAPABILITY_AUTO_TRANSLATE: &str = "auto-translate";

/// Host setting that turns the feature on globally.
pub const SETTING_AUTO_TRANSLATE_ENABLED: &str = "AutoTranslate_Enabled";

/// Stage id of the render hook.
pub const RENDER_STAGE: StageId = StageId("autotranslate");

/// Stage id of the stream hook.
pub const STREAM_STAGE: StageId = StageId("autotranslate-stream");

// Early enough that downstream formatting stages see translated content
const STAGE_PRIORITY: i32 = 30;

/// Per-session auto-translation coordinator.
///
/// Construct once with the host collaborators, share as an `Arc`, call
/// [`init`](Self::init) on login (and again whenever enablement or
/// permission state may have changed; it is idempotent), and
/// [`logout`](Self::logout) on logout.
pub struct AutoTranslate {
    config: Config,
    identity: Arc<dyn IdentityProvider>,
    permissions: Arc<dyn PermissionChecker>,
    settings: Arc<dyn SettingsStore>,
    subscriptions: Arc<dyn SubscriptionStore>,
    messages: Arc<dyn MessageStore>,
    remote: Arc<dyn RemoteGateway>,
    pipeline: Arc<MessagePipeline>,
    catalog: RwLock<LanguageCatalog>,
    cache: ResolverCache,
    session: Mutex<Option<Arc<SessionState>>>,
    catalog_populated: AtomicBool,
    change_observer: Mutex<Option<ObserverHandle>>,
}

impl AutoTranslate {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Config,
        identity: Arc<dyn IdentityProvider>,
        permissions: Arc<dyn PermissionChecker>,
        settings: Arc<dyn SettingsStore>,
        subscriptions: Arc<dyn SubscriptionStore>,
        messages: Arc<dyn MessageStore>,
        remote: Arc<dyn RemoteGateway>,
        pipeline: Arc<MessagePipeline>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            identity,
            permissions,
            settings,
            subscriptions,
            messages,
            remote,
            pipeline,
            catalog: RwLock::new(LanguageCatalog::new()),
            cache: ResolverCache::new(),
            session: Mutex::new(None),
            catalog_populated: AtomicBool::new(false),
            change_observer: Mutex::new(None),
        })
    }

    /// (Re)establish the service for the current login and permission
    /// state: refresh the session, populate the catalog once per
    /// session, wire cache invalidation, and register or deregister the
    /// pipeline stages. Idempotent; safe to call on every enablement or
    /// permission change notification.
    pub async fn init(self: &Arc<Self>) {
        let Some(user) = self.identity.current_user() else {
            return;
        };

        self.ensure_session(&user);
        self.ensure_change_observer();
        self.populate_catalog_once().await;

        let enabled = self
            .settings
            .get_bool(SETTING_AUTO_TRANSLATE_ENABLED)
            .unwrap_or(false)
            && self.permissions.has_any_capability(&[CAPABILITY_AUTO_TRANSLATE]);

        if enabled {
            self.register_stages();
        } else {
            self.unregister_stages();
        }
    }

    /// Tear the session down: drop session state and the pending set,
    /// clear caches and the catalog, stop observing subscription
    /// changes, remove the pipeline stages, and re-arm the one-shot
    /// catalog population for the next login.
    pub fn logout(&self) {
        *self.session.lock().expect("session poisoned") = None;
        self.cache.clear();
        *self.catalog.write().expect("catalog poisoned") = LanguageCatalog::new();
        self.catalog_populated.store(false, Ordering::SeqCst);

        if let Some(handle) = self
            .change_observer
            .lock()
            .expect("observer slot poisoned")
            .take()
        {
            handle.unsubscribe();
        }
        self.unregister_stages();
        info!("auto-translation torn down");
    }

    /// Effective display language for a room (or the no-room fallback):
    /// subscription language, then the viewer's preferred language, then
    /// the platform default, normalized against the supported set.
    /// Cached per room until the subscription changes.
    pub fn resolve_language(&self, room_id: Option<&str>) -> String {
        if let Some(cached) = self.cache.get(room_id) {
            return cached;
        }

        let subscription = room_id.and_then(|room| self.subscriptions.find_by_room(room));
        let session = self.current_session();
        let user_language = session.as_deref().and_then(|s| s.language());
        let preferred = preferred_language(
            subscription.as_ref(),
            user_language,
            &self.config.default_language,
        );

        let resolved = {
            let catalog = self.catalog.read().expect("catalog poisoned");
            effective_code(&preferred, &catalog)
        };

        debug!(room = ?room_id, language = %resolved, "resolved display language");
        self.cache.insert(room_id, &resolved);
        resolved
    }

    /// Rewrite an attachment tree for the current viewer.
    pub fn translate_attachments(&self, mut nodes: Vec<Attachment>, language: &str) -> Vec<Attachment> {
        let viewer = self
            .current_session()
            .map(|session| session.username().to_string())
            .unwrap_or_default();
        attachments::translate_attachments(&mut nodes, language, &viewer);
        nodes
    }

    /// Record that a translation was requested for a message. Called by
    /// the host's request trigger; the stream hook reconciles the id
    /// once the room's subscription no longer wants translations.
    pub fn await_translation(&self, message_id: &str) {
        if let Some(session) = self.current_session() {
            session.mark_awaiting(message_id);
        }
    }

    /// Snapshot of the session's language catalog.
    pub fn catalog(&self) -> LanguageCatalog {
        self.catalog.read().expect("catalog poisoned").clone()
    }

    fn current_session(&self) -> Option<Arc<SessionState>> {
        self.session.lock().expect("session poisoned").clone()
    }

    fn ensure_session(&self, user: &UserIdentity) {
        let mut session = self.session.lock().expect("session poisoned");
        let same_user = session
            .as_ref()
            .map(|existing| existing.user_id() == user.id)
            .unwrap_or(false);
        if same_user {
            return;
        }

        // New viewer: resolved languages derived from the previous
        // user's preference are no longer valid
        *session = Some(Arc::new(SessionState::new(
            user.id.clone(),
            user.username.clone(),
            user.language.clone(),
        )));
        self.cache.clear();
    }

    fn ensure_change_observer(self: &Arc<Self>) {
        let mut slot = self.change_observer.lock().expect("observer slot poisoned");
        if slot.is_none() {
            let observer: Arc<dyn SubscriptionObserver> = Arc::clone(self) as Arc<dyn SubscriptionObserver>;
            *slot = Some(self.subscriptions.observe_changes(observer));
        }
    }

    /// Populate the catalog once per session. The trigger is one-shot:
    /// it fires on the first init of a session and does not re-arm until
    /// logout, whatever the fetches returned.
    async fn populate_catalog_once(&self) {
        if self.catalog_populated.swap(true, Ordering::SeqCst) {
            return;
        }

        let metadata = self.remote.provider_ui_metadata();
        if self.permissions.has_capability(CAPABILITY_AUTO_TRANSLATE) {
            let languages = self.remote.supported_languages(&self.config.bootstrap_language);
            let (metadata, languages) = tokio::join!(metadata, languages);
            self.record_providers(metadata);
            self.record_languages(languages);
        } else {
            self.record_providers(metadata.await);
        }
    }

    fn record_providers(&self, result: Result<HashMap<String, ProviderMetadata>, RemoteError>) {
        match result {
            Ok(providers) => {
                self.catalog
                    .write()
                    .expect("catalog poisoned")
                    .set_providers(providers);
            }
            Err(error) => warn!(%error, "provider metadata fetch failed, keeping defaults"),
        }
    }

    fn record_languages(&self, result: Result<Vec<SupportedLanguage>, RemoteError>) {
        match result {
            Ok(languages) => {
                info!(count = languages.len(), "supported languages loaded");
                self.catalog
                    .write()
                    .expect("catalog poisoned")
                    .set_supported(languages);
            }
            Err(error) => warn!(%error, "supported-language fetch failed, keeping defaults"),
        }
    }

    fn register_stages(self: &Arc<Self>) {
        self.pipeline.register_render(
            RENDER_STAGE,
            STAGE_PRIORITY,
            Arc::new(RenderHook(Arc::clone(self))),
        );
        self.pipeline.register_stream(
            STREAM_STAGE,
            STAGE_PRIORITY,
            Arc::new(StreamHook(Arc::clone(self))),
        );
        info!("auto-translation stages registered");
    }

    fn unregister_stages(&self) {
        let removed = self.pipeline.unregister_render(RENDER_STAGE);
        self.pipeline.unregister_stream(STREAM_STAGE);
        if removed {
            info!("auto-translation stages removed");
        }
    }

    fn on_render(&self, mut message: Message) -> Message {
        let Some(session) = self.current_session() else {
            return message;
        };

        let language = self.resolve_language(Some(&message.room_id));
        let subscription = self.subscriptions.find_by_room(&message.room_id);
        render::apply(
            &mut message,
            subscription.as_ref(),
            &language,
            session.user_id(),
            session.username(),
        );
        message
    }

    fn on_stream(&self, message: &Message) {
        let Some(session) = self.current_session() else {
            return;
        };
        if message.author_id == session.user_id() {
            return;
        }

        let subscription = self.subscriptions.find_by_room(&message.room_id);
        let language = self.resolve_language(Some(&message.room_id));
        let awaiting = session.is_awaiting(&message.id);

        let Some(transition) =
            stream::classify(message, subscription.as_ref(), &language, awaiting)
        else {
            return;
        };

        debug!(message_id = %message.id, ?transition, "stream transition");
        let update = stream::update_for(transition);
        if let Err(error) = self.messages.apply_partial_update(&message.id, &update) {
            warn!(message_id = %message.id, %error, "partial update failed");
        }

        if transition == Transition::ShowInverse {
            session.clear_awaiting(&message.id);
        }
    }
}

impl SubscriptionObserver for AutoTranslate {
    fn subscription_changed(&self, room_id: &str, changed_fields: &[String]) {
        let relevant = changed_fields.iter().any(|field| {
            field == fields::AUTO_TRANSLATE_ENABLED || field == fields::AUTO_TRANSLATE_LANGUAGE
        });
        if relevant {
            debug!(%room_id, "subscription changed, dropping cached language");
            self.cache.invalidate(room_id);
        }
    }
}

struct RenderHook(Arc<AutoTranslate>);

impl RenderStage for RenderHook {
    fn process(&self, message: Message) -> Message {
        self.0.on_render(message)
    }
}

struct StreamHook(Arc<AutoTranslate>);

impl StreamStage for StreamHook {
    fn observe(&self, message: &Message) {
        self.0.on_stream(message)
    }
}
