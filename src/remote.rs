//! Remote facility for provider metadata and supported-language fetches.
//!
//! Both calls run once per session during catalog population; failures
//! are surfaced to the caller, which logs and keeps the empty defaults.

use crate::config::Config;
use crate::i18n::{ProviderMetadata, SupportedLanguage};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

/// Failure of a remote call.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
}

/// The host's remote-procedure facility, reduced to the two calls this
/// crate makes.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Display metadata for the configured translation providers,
    /// keyed by provider name.
    async fn provider_ui_metadata(&self) -> Result<HashMap<String, ProviderMetadata>, RemoteError>;

    /// Languages the provider can target, localized for `target_language`.
    async fn supported_languages(
        &self,
        target_language: &str,
    ) -> Result<Vec<SupportedLanguage>, RemoteError>;
}

#[derive(Debug, Deserialize)]
struct ProvidersResponse {
    providers: HashMap<String, ProviderMetadata>,
}

#[derive(Debug, Deserialize)]
struct LanguagesResponse {
    languages: Vec<SupportedLanguage>,
}

/// [`RemoteGateway`] over the host's HTTP API.
pub struct HttpRemoteGateway {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpRemoteGateway {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        }
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let mut request = self.client.get(format!("{}/{}", self.base_url, path));
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }
        request
    }
}

async fn into_error(response: reqwest::Response) -> RemoteError {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
    RemoteError::Status { status, body }
}

#[async_trait]
impl RemoteGateway for HttpRemoteGateway {
    async fn provider_ui_metadata(&self) -> Result<HashMap<String, ProviderMetadata>, RemoteError> {
        let response = self.get("autotranslate.getProviderUiMetadata").send().await?;

        if !response.status().is_success() {
            return Err(into_error(response).await);
        }

        let parsed: ProvidersResponse = response.json().await?;
        Ok(parsed.providers)
    }

    async fn supported_languages(
        &self,
        target_language: &str,
    ) -> Result<Vec<SupportedLanguage>, RemoteError> {
        let response = self
            .get("autotranslate.getSupportedLanguages")
            .query(&[("targetLanguage", target_language)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(into_error(response).await);
        }

        let parsed: LanguagesResponse = response.json().await?;
        Ok(parsed.languages)
    }
}
