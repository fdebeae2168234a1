use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ChatConfig;

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Sends one user message and returns the assistant's reply text.
    async fn complete(&self, message: &str) -> anyhow::Result<String>;
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: String,
}

/// OpenAI-compatible chat completion endpoint (OpenRouter by default).
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_key: Option<String>,
    api_url: String,
    model: String,
    max_tokens: u32,
    referer: String,
}

impl OpenRouterClient {
    pub fn new(cfg: &ChatConfig, referer: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("build chat http client")?;
        Ok(Self {
            client,
            api_key: cfg.api_key.clone(),
            api_url: cfg.api_url.clone(),
            model: cfg.model.clone(),
            max_tokens: cfg.max_tokens,
            referer: referer.to_string(),
        })
    }
}

fn first_reply(body: CompletionResponse) -> anyhow::Result<String> {
    body.choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .context("completion response has no choices")
}

#[async_trait]
impl ChatClient for OpenRouterClient {
    async fn complete(&self, message: &str) -> anyhow::Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .context("CHAT_BOT_API_KEY is not configured")?;

        let payload = CompletionRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: message,
            }],
            max_tokens: self.max_tokens,
        };

        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.referer)
            .json(&payload)
            .send()
            .await
            .context("send completion request")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("completion API error {}: {}", status, body);
        }

        let body: CompletionResponse = resp.json().await.context("decode completion response")?;
        debug!(model = %self.model, "completion received");
        first_reply(body)
    }
}
