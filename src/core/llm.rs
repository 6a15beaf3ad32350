use crate::config::resolve_token;
use crate::domain::ports::{ConfigProvider, LlmClient};
use crate::utils::error::{AgentError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;

/// Client for the AI Pipe chat-completion gateway.
pub struct AiPipeClient {
    client: Client,
    base_url: String,
    model: String,
    token: String,
}

impl AiPipeClient {
    pub fn new(base_url: &str, model: &str, token: &str, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            model: model.to_string(),
            token: token.to_string(),
        })
    }

    /// Build a client from any config source, resolving the bearer token from
    /// the environment.
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let token = resolve_token(None)?;
        Self::new(
            config.base_url(),
            config.model(),
            &token,
            config.timeout_seconds(),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn chat_url(&self) -> String {
        if self.base_url.ends_with('/') {
            format!("{}chat/completions", self.base_url)
        } else {
            format!("{}/chat/completions", self.base_url)
        }
    }
}

#[async_trait]
impl LlmClient for AiPipeClient {
    async fn generate(&self, system: &str, user: &str) -> Result<String> {
        let url = self.chat_url();
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user}
            ],
            "temperature": 0
        });

        tracing::debug!("Sending completion request to {}", url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        tracing::debug!("AI Pipe response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::ApiStatusError { status, body });
        }

        let envelope: serde_json::Value = response.json().await?;

        envelope["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| AgentError::ModelOutputError {
                message: "response has no choices[0].message.content".to_string(),
            })
    }
}

/// Parse the model's completion text as one of the plan types. The raw output
/// is logged before the error propagates so malformed answers can be inspected.
pub fn decode_plan<T: DeserializeOwned>(raw: &str) -> Result<T> {
    match serde_json::from_str(raw.trim()) {
        Ok(plan) => Ok(plan),
        Err(e) => {
            tracing::error!("Invalid JSON from LLM: {}", raw);
            Err(AgentError::ModelOutputError {
                message: format!("completion is not valid JSON: {}", e),
            })
        }
    }
}
