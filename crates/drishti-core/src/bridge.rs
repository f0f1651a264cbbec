//! Generation bridge: the external content-generation service behind a trait.
//!
//! The engine only sees [`GuidanceGenerator`]; production uses
//! [`GuidanceBridge`], an OpenAI-compatible chat-completions client. The
//! bridge classifies failures for user messaging but performs no retries;
//! retry policy, if any, belongs to the caller.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::UserConfig;
use crate::error::BridgeError;
use crate::prompts::{dynamic_guidance_user_prompt, DYNAMIC_GUIDANCE_SYSTEM};
use crate::request::GenerationRequest;
use crate::validate::RawGenerationResult;

const DEFAULT_API_BASE: &str = "https://openrouter.ai/api/v1";
const DEFAULT_MODEL: &str = "meta-llama/llama-3.3-70b-instruct";
const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// The external generator: given a structured request, returns a raw result
/// or a classified failure. Implementations must be shareable across tasks.
#[async_trait]
pub trait GuidanceGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest)
        -> Result<RawGenerationResult, BridgeError>;
}

// OpenAI-compatible request/response envelope.
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: String,
}

/// Reqwest-backed guidance generator.
pub struct GuidanceBridge {
    api_key: String,
    model: String,
    api_base: String,
    client: reqwest::Client,
}

impl GuidanceBridge {
    /// Create a bridge from the user configuration, falling back to
    /// environment variables. Returns `None` when no API key is available.
    pub fn from_config(config: &UserConfig) -> Option<Self> {
        let api_key = config.resolved_api_key()?;
        let mut bridge = Self::new(api_key);
        if let Some(model) = config.resolved_model() {
            bridge.model = model;
        }
        if let Some(base) = config.resolved_api_base() {
            bridge.api_base = base.trim_end_matches('/').to_string();
        }
        Some(bridge)
    }

    pub fn new(api_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            api_key: api_key.trim().to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            client,
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Pulls the first JSON object out of a completion, tolerating code fences
/// and prose around it.
fn extract_json_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&content[start..=end])
}

fn classify_status(status: u16, detail: String) -> BridgeError {
    match status {
        429 => BridgeError::RateLimited(detail),
        404 if detail.contains("model") => BridgeError::MissingModel(detail),
        _ => BridgeError::Service { status, detail },
    }
}

#[async_trait]
impl GuidanceGenerator for GuidanceBridge {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<RawGenerationResult, BridgeError> {
        let url = format!("{}/chat/completions", self.api_base);
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: DYNAMIC_GUIDANCE_SYSTEM.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: dynamic_guidance_user_prompt(request),
                },
            ],
            temperature: Some(0.7),
            max_tokens: Some(1024),
        };

        let res = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| BridgeError::Transport(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let detail = res.text().await.unwrap_or_default();
            return Err(classify_status(status.as_u16(), detail));
        }

        let envelope: ChatResponse = res
            .json()
            .await
            .map_err(|e| BridgeError::Unreadable(format!("envelope parse failed: {}", e)))?;

        let content = envelope
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .unwrap_or_default();
        debug!(model = %self.model, bytes = content.len(), "generator responded");

        let json = extract_json_object(content)
            .ok_or_else(|| BridgeError::Unreadable("no JSON object in completion".to_string()))?;

        // Field-level gaps are the validator's concern; only a body that is
        // not an object at all is a hard failure here.
        serde_json::from_str::<RawGenerationResult>(json)
            .map_err(|e| BridgeError::Unreadable(format!("result parse failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_object_from_fenced_completion() {
        let content = "Here you go:\n```json\n{\"pattern_name\": \"X\"}\n```";
        let json = extract_json_object(content).expect("object");
        let raw: RawGenerationResult = serde_json::from_str(json).expect("parse");
        assert_eq!(raw.pattern_name.as_deref(), Some("X"));
    }

    #[test]
    fn no_object_is_none() {
        assert!(extract_json_object("no json here").is_none());
        assert!(extract_json_object("} inverted {").is_none());
    }

    #[test]
    fn status_classification_distinguishes_causes() {
        assert!(matches!(
            classify_status(429, "slow down".to_string()),
            BridgeError::RateLimited(_)
        ));
        assert!(matches!(
            classify_status(404, "no such model: x".to_string()),
            BridgeError::MissingModel(_)
        ));
        assert!(matches!(
            classify_status(404, "not found".to_string()),
            BridgeError::Service { status: 404, .. }
        ));
        assert!(matches!(
            classify_status(500, String::new()),
            BridgeError::Service { status: 500, .. }
        ));
    }

    #[test]
    fn bridge_from_config_requires_api_key() {
        // No key in config; env vars are absent in the test environment.
        let config = UserConfig::default();
        if std::env::var("DRISHTI_API_KEY").is_err() && std::env::var("OPENROUTER_API_KEY").is_err()
        {
            assert!(GuidanceBridge::from_config(&config).is_none());
        }
    }
}
