//! HTTP translation client for LibreTranslate-compatible endpoints.
//!
//! Speaks the `POST /translate` JSON protocol used by LibreTranslate and
//! its self-hosted forks. The engine treats translation as a degradable
//! signal, so transport and API errors surface as [`VordrError::Http`] /
//! [`VordrError::Api`] and the pipeline falls back to the untranslated text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::providers::traits::Translator;
use crate::{Result, VordrError};

/// Request timeout for translation calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for a LibreTranslate-compatible translation service.
#[derive(Clone)]
pub struct HttpTranslator {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpTranslator {
    /// Create a client for the given service base URL
    /// (e.g. `https://translate.example.org`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            base_url: base_url.into(),
            api_key: None,
        }
    }

    /// Attach an API key, sent in the request body per the LibreTranslate
    /// protocol.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

#[async_trait]
impl Translator for HttpTranslator {
    fn name(&self) -> &str {
        "http-translator"
    }

    async fn translate(&self, text: &str, source: &str) -> Result<String> {
        let url = format!("{}/translate", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(&TranslateRequest {
                q: text,
                source,
                target: "en",
                format: "text",
                api_key: self.api_key.as_deref(),
            })
            .send()
            .await
            .map_err(|e| VordrError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(VordrError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: TranslateResponse = response
            .json()
            .await
            .map_err(|e| VordrError::Http(e.to_string()))?;

        Ok(body.translated_text)
    }
}
