//! # LLM Client
//!
//! Provides the `OllamaClient`, which sends routed tasks to an Ollama-compatible
//! `/api/generate` endpoint and hands the raw reply text back to the router.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::domain::config::InferenceConfig;
use crate::domain::traits::InferenceProvider;
use crate::domain::types::TransportError;
use crate::infrastructure::llm::types::{GenerateRequest, GenerateResponse};
use crate::strings::prompts;

pub struct OllamaClient {
    http: Client,
    url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(config: &InferenceConfig) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self {
            http,
            url: config.url.clone(),
            model: config.model.clone(),
        })
    }

    /// Send a raw prompt and return the trimmed `response` field.
    pub async fn generate(&self, prompt: &str) -> Result<String, TransportError> {
        let request = GenerateRequest::new(self.model.clone(), prompt);

        let response = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| TransportError::Decode(e.to_string()))?;

        Ok(parsed.response.trim().to_string())
    }
}

#[async_trait]
impl InferenceProvider for OllamaClient {
    async fn infer(&self, task: &str) -> Result<String, TransportError> {
        tracing::debug!(model = %self.model, url = %self.url, "Requesting routing decision");
        self.generate(&prompts::router_prompt(task)).await
    }
}
