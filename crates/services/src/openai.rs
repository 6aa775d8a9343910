//! Script source backed by the OpenAI chat completions API.

use crate::{build_client, check_status};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use slides_core::request::{check_range, SLIDE_COUNT_RANGE};
use slides_core::script::script_prompt;
use slides_core::{Error, Result, Script, ScriptSource};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Connection and sampling settings for [`OpenAiScriptSource`].
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    response_format: ResponseFormat,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Writes slide scripts with a chat model in JSON mode.
pub struct OpenAiScriptSource {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiScriptSource {
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "OPENAI_API_KEY is not set; create a key at https://platform.openai.com/".to_string(),
            ));
        }
        let client = build_client(config.timeout)?;
        Ok(Self { config, client })
    }

    /// Send `prompt` and return the raw message content.
    fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.config.base_url.trim_end_matches('/'));
        let body = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            response_format: ResponseFormat { kind: "json_object" },
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .map_err(|e| Error::Upstream(format!("OpenAI request failed: {}", e)))?;
        let response = check_status("OpenAI", response)?;

        let text = response
            .text()
            .map_err(|e| Error::Upstream(format!("Failed to read OpenAI response: {}", e)))?;
        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| Error::upstream_format("$", e.to_string(), text.clone()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::upstream_format("choices[0].message.content", "missing", text))
    }
}

impl ScriptSource for OpenAiScriptSource {
    fn generate_script(&self, topic: &str, slides: usize, tone: &str) -> Result<Script> {
        check_range("slides", slides, &SLIDE_COUNT_RANGE)?;

        log::debug!("Requesting a {}-slide script on '{}' from {}", slides, topic, self.config.model);
        let raw = self.complete(&script_prompt(topic, slides, tone))?;
        Script::from_model_json(topic, &raw, slides)
    }
}
