use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Provider API (metadata and supported-language fetches)
    pub api_base_url: String,
    pub api_token: Option<String>,

    // Language fallbacks
    pub default_language: String,
    pub bootstrap_language: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Provider API
            api_base_url: std::env::var("AUTOTRANSLATE_API_URL")
                .context("AUTOTRANSLATE_API_URL not set")?,
            api_token: std::env::var("AUTOTRANSLATE_API_TOKEN").ok(),

            // Platform default shown when neither the subscription nor the
            // user carries a language preference
            default_language: std::env::var("DEFAULT_LANGUAGE")
                .unwrap_or_else(|_| "en".to_string()),

            // Fixed code used for the one supported-languages fetch at login
            bootstrap_language: std::env::var("BOOTSTRAP_LANGUAGE")
                .unwrap_or_else(|_| "en".to_string()),
        })
    }
}
