//! Language catalog: supported languages and provider display metadata.
//!
//! The catalog is session-scoped state owned by the service and populated
//! once per authenticated session from the host's remote facility. It
//! starts empty and stays empty if either fetch fails; every consumer
//! tolerates that (an unsupported tag merely resolves to its base code).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A language the translation provider can target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedLanguage {
    /// Language tag, possibly regioned (e.g. "en", "pt-BR")
    pub language: String,

    /// Display name, when the provider supplies one
    #[serde(default)]
    pub name: Option<String>,
}

/// Display metadata for one translation provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderMetadata {
    pub name: String,
    pub display_name: String,
}

/// Session-scoped catalog of supported languages and provider metadata.
#[derive(Debug, Clone, Default)]
pub struct LanguageCatalog {
    supported: Vec<SupportedLanguage>,
    providers: HashMap<String, ProviderMetadata>,
}

impl LanguageCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether the exact language tag is in the supported set.
    pub fn is_supported(&self, code: &str) -> bool {
        self.supported.iter().any(|lang| lang.language == code)
    }

    /// All supported languages, in provider order.
    pub fn supported(&self) -> &[SupportedLanguage] {
        &self.supported
    }

    /// Get metadata for a provider by name.
    pub fn provider(&self, name: &str) -> Option<&ProviderMetadata> {
        self.providers.get(name)
    }

    /// All known providers.
    pub fn providers(&self) -> &HashMap<String, ProviderMetadata> {
        &self.providers
    }

    /// Replace the supported-language list.
    pub fn set_supported(&mut self, languages: Vec<SupportedLanguage>) {
        self.supported = languages;
    }

    /// Replace the provider metadata map.
    pub fn set_providers(&mut self, providers: HashMap<String, ProviderMetadata>) {
        self.providers = providers;
    }

    /// True when neither fetch has populated anything yet.
    pub fn is_empty(&self) -> bool {
        self.supported.is_empty() && self.providers.is_empty()
    }
}
