//! Per-room auto-translation core for chat messages.
//!
//! Decides, per rendered message, whether the viewer sees original or
//! machine-translated content, and reconciles the "translation in
//! flight" flags for messages arriving on the live update stream. The
//! host supplies identity, permissions, settings, the
//! subscription/message stores, and the remote facility through the
//! traits in [`host`], [`store`], and [`remote`]; this crate computes
//! decisions and flag transitions, it never translates anything itself.
//!
//! # Usage
//!
//! ```rust,ignore
//! let config = Config::from_env()?;
//! let pipeline = Arc::new(MessagePipeline::new());
//! let service = AutoTranslate::new(
//!     config.clone(),
//!     identity, permissions, settings,
//!     subscriptions, messages,
//!     Arc::new(HttpRemoteGateway::new(&config)),
//!     Arc::clone(&pipeline),
//! );
//!
//! service.init().await; // on login, and on enablement changes
//!
//! // host message flow
//! let message = pipeline.run_render(message);
//! pipeline.run_stream(&incoming);
//! ```

pub mod attachments;
pub mod config;
pub mod host;
pub mod i18n;
pub mod model;
pub mod pipeline;
pub mod remote;
pub mod render;
pub mod resolver;
pub mod session;
pub mod store;
pub mod stream;

mod service;

pub use config::Config;
pub use model::{Attachment, Message, MessageUpdate, Subscription};
pub use pipeline::{MessagePipeline, RenderStage, StageId, StreamStage};
pub use remote::{HttpRemoteGateway, RemoteGateway};
pub use service::{
    AutoTranslate, CAPABILITY_AUTO_TRANSLATE, RENDER_STAGE, SETTING_AUTO_TRANSLATE_ENABLED,
    STREAM_STAGE,
};
