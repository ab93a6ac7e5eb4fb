use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use super::{parse_candidates, resolve_api_key, ExpanderError, PromptExpander};
use crate::record::EventRecord;
use crate::storage::ExpanderConfig;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Prompt expander backed by the Gemini `generateContent` REST endpoint.
pub struct GeminiExpander {
    client: Client,
    api_key: String,
    model: String,
    endpoint: Url,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GeminiExpander {
    pub fn new(api_key: impl Into<String>, config: &ExpanderConfig) -> Result<Self, ExpanderError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ExpanderError::MissingApiKey);
        }

        let mut endpoint = Url::parse(&config.endpoint)?;
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            endpoint,
        })
    }

    /// Build an expander with the key from the environment or keyring.
    pub fn from_config(config: &ExpanderConfig) -> Result<Self, ExpanderError> {
        let key = resolve_api_key().ok_or(ExpanderError::MissingApiKey)?;
        Self::new(key, config)
    }

    pub fn request_url(&self) -> Result<Url, ExpanderError> {
        Ok(self
            .endpoint
            .join(&format!("v1beta/models/{}:generateContent", self.model))?)
    }

    fn request_body(prompt: &str) -> serde_json::Value {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let text = format!(
            "Generate a JSON list of events based on this request: \"{prompt}\". \
             Each event must have a title and a future timestamp (ISO 8601 format). \
             Make sure dates are in the future relative to now ({now})."
        );

        json!({
            "contents": [{ "parts": [{ "text": text }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "id": { "type": "STRING" },
                            "title": { "type": "STRING" },
                            "time": { "type": "STRING" },
                            "description": { "type": "STRING" }
                        },
                        "required": ["title", "time"]
                    }
                }
            }
        })
    }

    /// Call the service and parse its answer, surfacing every failure.
    pub async fn try_expand(&self, prompt: &str) -> Result<Vec<EventRecord>, ExpanderError> {
        let resp = self
            .client
            .post(self.request_url()?)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&Self::request_body(prompt))
            .send()
            .await
            .map_err(timeout_or_http)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ExpanderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GenerateResponse = resp.json().await.map_err(timeout_or_http)?;
        let text: String = envelope
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .ok_or_else(|| ExpanderError::Envelope("no candidates".into()))?
            .parts
            .into_iter()
            .map(|p| p.text)
            .collect();

        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        parse_candidates(&text)
    }
}

impl PromptExpander for GeminiExpander {
    async fn expand(&self, prompt: &str) -> Vec<EventRecord> {
        match self.try_expand(prompt).await {
            Ok(records) => {
                tracing::info!(count = records.len(), "prompt expanded");
                records
            }
            Err(e) => {
                tracing::warn!("prompt expansion failed: {e}");
                Vec::new()
            }
        }
    }
}

fn timeout_or_http(e: reqwest::Error) -> ExpanderError {
    if e.is_timeout() {
        ExpanderError::Timeout
    } else {
        ExpanderError::Http(e)
    }
}
