//! Client for OpenAI-compatible `/chat/completions` endpoints.

use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use lograg_core::config::LlmSettings;
use lograg_core::traits::Completion;
use lograg_core::Error;
use serde::{Deserialize, Serialize};

pub struct OpenAiChat {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl OpenAiChat {
    pub fn new(base_url: &str, api_key: &str, model: &str, max_tokens: u32, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for chat completions")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            max_tokens,
        })
    }

    pub fn from_settings(settings: &LlmSettings) -> lograg_core::Result<Self> {
        let api_key = settings
            .api_key()
            .ok_or_else(|| Error::InvalidConfig("llm.api_key is not set and OPENAI_API_KEY is empty".into()))?;
        Self::new(&settings.base_url, &api_key, &settings.model, settings.max_tokens, Duration::from_secs(settings.timeout_secs))
            .map_err(|e| Error::InvalidConfig(format!("{e:#}")))
    }

    pub fn model(&self) -> &str { &self.model }
}

impl Completion for OpenAiChat {
    fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
            max_tokens: self.max_tokens,
        };
        tracing::debug!(url = %url, model = %self.model, prompt_len = prompt.len(), "sending chat completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .with_context(|| format!("Failed to send chat completion request to {}", self.base_url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            bail!("Chat completion endpoint returned {}: {}", status, body.trim());
        }
        let parsed: ChatResponse = response.json().context("Failed to parse chat completion response")?;
        first_choice(parsed)
    }
}

/// [`OpenAiChat`] built on first use, so a missing API key only fails the
/// calls that actually need the model.
pub struct LazyOpenAiChat {
    settings: LlmSettings,
    chat: OnceLock<OpenAiChat>,
}

impl LazyOpenAiChat {
    pub fn new(settings: LlmSettings) -> Self { Self { settings, chat: OnceLock::new() } }

    pub fn is_initialized(&self) -> bool { self.chat.get().is_some() }

    fn chat(&self) -> Result<&OpenAiChat> {
        if let Some(chat) = self.chat.get() { return Ok(chat); }
        let chat = OpenAiChat::from_settings(&self.settings)?;
        Ok(self.chat.get_or_init(|| chat))
    }
}

impl Completion for LazyOpenAiChat {
    fn complete(&self, prompt: &str) -> Result<String> { self.chat()?.complete(prompt) }
}

fn first_choice(response: ChatResponse) -> Result<String> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .context("Chat completion response is incomplete or missing")?;
    Ok(content.trim().to_string())
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}
