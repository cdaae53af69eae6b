//! Internationalization (i18n) module.
//!
//! Holds the session-scoped language catalog and the language-tag helpers
//! the resolver uses to normalize regioned codes.
//!
//! # Architecture
//!
//! - `catalog`: supported languages and provider display metadata, fetched
//!   once per session from the host's remote facility
//! - `language`: pure helpers for language-tag handling

mod catalog;
mod language;

pub use catalog::{LanguageCatalog, ProviderMetadata, SupportedLanguage};
pub use language::{base_code, effective_code, has_region_subtag};
