//! AI Curator client
//!
//! Forwards one visitor message to a hosted generateContent-style endpoint
//! and returns the reply text. Stateless: no history, no retries.

use crate::config::CuratorConfig;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Reply shown whenever the curator cannot answer
pub const APOLOGY: &str = "I'm sorry, the curator is unavailable right now. \
    Please try again later or ask a member of staff at the front desk.";

/// Upper bound on a visitor message, in characters
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Client for the hosted conversational API
pub struct CuratorClient {
    config: CuratorConfig,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl CuratorClient {
    /// Create a client, resolving the API key from the environment
    pub fn new(config: CuratorConfig) -> Self {
        let api_key = config.resolve_api_key();
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build curator HTTP client, using defaults: {}", e);
                reqwest::Client::new()
            });

        Self {
            config,
            api_key,
            client,
        }
    }

    /// Override the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Whether a request would be attempted at all
    pub fn is_available(&self) -> bool {
        self.config.enabled && self.api_key.is_some()
    }

    /// Ask the curator. Never fails: any error yields [`APOLOGY`].
    pub async fn ask(&self, message: &str) -> String {
        match self.try_ask(message).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("Curator request failed: {}", e);
                APOLOGY.to_string()
            }
        }
    }

    /// Ask the curator, surfacing the failure reason
    pub async fn try_ask(&self, message: &str) -> Result<String> {
        if !self.config.enabled {
            return Err(Error::Curator("curator is disabled".to_string()));
        }
        let message = message.trim();
        if message.is_empty() {
            return Err(Error::Validation("message is empty".to_string()));
        }
        if message.chars().count() > MAX_MESSAGE_CHARS {
            return Err(Error::Validation(format!(
                "message exceeds {} characters",
                MAX_MESSAGE_CHARS
            )));
        }
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Curator("no API key configured".to_string()))?;

        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );
        let request = GenerateRequest::new(&self.config.system_prompt, message);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Curator(format!("API returned {}", status)));
        }

        let body: GenerateResponse = response.json().await?;
        body.text()
            .ok_or_else(|| Error::Curator("empty reply".to_string()))
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
}

impl GenerateRequest {
    fn new(system_prompt: &str, message: &str) -> Self {
        Self {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: system_prompt.to_string(),
                }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: message.to_string(),
                }],
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateResponse {
    /// Text of the first candidate, parts joined
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        let text = text.trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }
}
