use super::types::ApiErrorBody;
use crate::{Error, Result};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Bearer-authenticated JSON client for OpenAI-compatible REST APIs.
pub struct OpenAiHttpClient {
    pub(crate) client: Client,
    api_key: Option<String>,
    pub(crate) base_url: String,
    service: &'static str,
    key_env: &'static str,
    headers: Vec<(&'static str, String)>,
}

impl OpenAiHttpClient {
    /// `service` names the provider in error messages and `key_env` names the
    /// variable a user should set when the key is missing.
    pub fn new(
        service: &'static str,
        key_env: &'static str,
        api_key: Option<String>,
        base_url: String,
        timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                Client::new()
            });

        Self {
            client,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
            service,
            key_env,
            headers: Vec::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Extra header sent with every request.
    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// The configured key, or a [`Error::Configuration`] naming the variable to set.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            Error::Configuration(format!(
                "{} API key is required. Please set {} in your environment.",
                self.service, self.key_env
            ))
        })
    }

    pub async fn post<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        path: &str,
        request: &Req,
    ) -> Result<Resp> {
        let api_key = self.require_api_key()?;
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("Sending request to {} ({})", self.service, path);

        let mut builder = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key));
        for (name, value) in &self.headers {
            builder = builder.header(*name, value);
        }

        let response = builder.json(request).send().await.map_err(|e| {
            tracing::error!("Failed to send request to {}: {}", self.service, e);
            e
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(
                "{} API error (status {}): {}",
                self.service,
                status,
                error_text
            );
            return Err(remote_error(status, &error_text));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse {} response: {}\nBody: {}", self.service, e, body);
            Error::remote(format!("Failed to parse {} response: {}", self.service, e))
        })
    }
}

/// Build a [`Error::RemoteService`] from a non-success response, preferring the
/// server's own `{"error": {"message", "code"}}` when the body carries one.
pub(crate) fn remote_error(status: StatusCode, body: &str) -> Error {
    let detail = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error);

    let code = detail.as_ref().and_then(|d| d.code_string());
    let message = detail
        .and_then(|d| d.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Status")
            )
        });

    Error::RemoteService {
        message,
        code,
        status: Some(status.as_u16()),
    }
}
