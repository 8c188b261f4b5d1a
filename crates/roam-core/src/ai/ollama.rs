//! Ollama backend implementation
//!
//! HTTP client for the Ollama `/api/generate` endpoint. The prompt comes from
//! the prompt library; timeout and retries from the extraction config.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ExtractionConfig;
use crate::error::{Error, Result};
use crate::itinerary::ExtractedStop;
use crate::prompts::PromptLibrary;

use super::parsing::parse_itinerary_response;
use super::types::{BackendInfo, BackendKind};
use super::{render_extraction_prompt, with_retries, AIBackend, ExtractionPrompt};

#[derive(Clone)]
pub struct OllamaBackend {
    http_client: Client,
    base_url: String,
    model: String,
    config: ExtractionConfig,
    prompts: Arc<RwLock<PromptLibrary>>,
}

impl OllamaBackend {
    /// Create a new Ollama backend using `config.model`
    pub fn new(base_url: &str, config: ExtractionConfig) -> Self {
        let model = config.model.clone();
        Self::with_prompts(base_url, &model, config, PromptLibrary::new())
    }

    /// Create with an explicit model and prompt library
    pub fn with_prompts(
        base_url: &str,
        model: &str,
        config: ExtractionConfig,
        prompts: PromptLibrary,
    ) -> Self {
        Self {
            http_client: build_client(&config),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            config,
            prompts: Arc::new(RwLock::new(prompts)),
        }
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..self.clone()
        }
    }

    /// Create from environment variables
    ///
    /// Required: `OLLAMA_HOST`. Optional: `OLLAMA_MODEL`.
    pub fn from_env(config: ExtractionConfig) -> Option<Self> {
        let host = std::env::var("OLLAMA_HOST").ok()?;
        let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| config.model.clone());
        Some(Self::with_prompts(&host, &model, config, PromptLibrary::new()))
    }

    async fn generate(&self, prompt: &ExtractionPrompt) -> Result<String> {
        let request = OllamaRequest {
            model: &self.model,
            prompt: &prompt.user,
            system: prompt.system.as_deref(),
            stream: false,
        };

        let response = self
            .http_client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Extraction(format!(
                "Ollama API error {}: {}",
                status, body
            )));
        }

        let ollama_response: OllamaResponse = response.json().await?;
        debug!("Ollama response: {}", ollama_response.response);
        Ok(ollama_response.response)
    }
}

/// Shared HTTP client honoring the configured timeout
pub(super) fn build_client(config: &ExtractionConfig) -> Client {
    Client::builder()
        .timeout(config.timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Request to Ollama API
#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
}

/// Response from Ollama API
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

#[async_trait]
impl AIBackend for OllamaBackend {
    async fn extract_itinerary(&self, text: &str) -> Result<Vec<ExtractedStop>> {
        let prompt = render_extraction_prompt(&self.prompts, text, self.config.reference_year)?;

        let prompt = &prompt;
        with_retries(self.config.max_retries, move || async move {
            let raw = self.generate(prompt).await?;
            parse_itinerary_response(&raw)
        })
        .await
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }

    fn info(&self) -> BackendInfo {
        BackendInfo {
            kind: BackendKind::Ollama,
            model: self.model.clone(),
            host: self.base_url.clone(),
            max_retries: self.config.max_retries,
            timeout_secs: self.config.timeout.as_secs(),
        }
    }
}
