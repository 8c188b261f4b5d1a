//! Pluggable itinerary extraction backends
//!
//! Turns free-form travel descriptions into stop records by asking a language
//! model. The rest of the crate never talks to a model directly; it only sees
//! validated [`ExtractedStop`] records.
//!
//! # Architecture
//!
//! - `AIBackend` trait: the interface every backend implements
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OllamaBackend`, `OpenAICompatibleBackend`, `MockBackend`
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: Backend to use (ollama, openai_compatible, mock). Default: ollama
//! - `OLLAMA_HOST`: Ollama server URL (required for ollama backend)
//! - `OLLAMA_MODEL`: Model name (default: `model` from extraction config)
//! - `OPENAI_COMPATIBLE_HOST`: Server URL (required for openai_compatible backend)
//! - `OPENAI_COMPATIBLE_MODEL`: Model name (default: `model` from extraction config)
//! - `OPENAI_COMPATIBLE_API_KEY`: API key if required (optional)

mod mock;
mod ollama;
mod openai_compatible;
pub mod parsing;
pub mod types;

pub use mock::MockBackend;
pub use ollama::OllamaBackend;
pub use openai_compatible::OpenAICompatibleBackend;
pub use types::*;

use std::collections::HashMap;
use std::future::Future;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::ExtractionConfig;
use crate::error::{Error, Result};
use crate::itinerary::{from_extracted, ExtractedStop, ItineraryEntry};
use crate::normalize::NameNormalizer;
use crate::prompts::{PromptId, PromptLibrary};

/// Trait defining the interface for all extraction backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Extract stop records from a free-text travel description
    ///
    /// Fails with `Error::Extraction` when the model answers with anything
    /// other than a JSON array of objects.
    async fn extract_itinerary(&self, text: &str) -> Result<Vec<ExtractedStop>>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the model name
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;

    /// Backend identity and limits for status output
    fn info(&self) -> BackendInfo;
}

/// Concrete extraction client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// Ollama backend (HTTP API)
    Ollama(OllamaBackend),
    /// OpenAI-compatible backend (vLLM, LocalAI, llama-server, hosted APIs)
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for testing and offline demos
    Mock(MockBackend),
}

impl AIClient {
    /// Create a client from environment variables and the extraction config
    ///
    /// Checks `AI_BACKEND` to determine which backend to use. Returns None if
    /// the required environment variables are not set.
    pub fn from_env() -> Option<Self> {
        let config = ExtractionConfig::load().unwrap_or_else(|e| {
            warn!("Failed to load extraction config, using defaults: {}", e);
            ExtractionConfig::default()
        });
        Self::from_env_with_config(config)
    }

    /// Like [`AIClient::from_env`] with an explicit extraction config
    pub fn from_env_with_config(config: ExtractionConfig) -> Option<Self> {
        let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "ollama".to_string());

        let client = match backend.to_lowercase().as_str() {
            "ollama" => OllamaBackend::from_env(config).map(AIClient::Ollama),
            "openai_compatible" | "openai" | "vllm" | "localai" | "llamacpp" => {
                OpenAICompatibleBackend::from_env(config).map(AIClient::OpenAICompatible)
            }
            "mock" => Some(AIClient::Mock(MockBackend::new())),
            _ => {
                warn!(backend = %backend, "Unknown AI_BACKEND, falling back to ollama");
                OllamaBackend::from_env(config).map(AIClient::Ollama)
            }
        };

        match &client {
            Some(c) => info!(
                kind = %c.info().kind,
                model = c.model(),
                host = c.host(),
                "Extraction backend configured"
            ),
            None => debug!(backend = %backend, "No extraction backend configured"),
        }
        client
    }

    /// Create an Ollama backend directly
    pub fn ollama(host: &str, config: ExtractionConfig) -> Self {
        AIClient::Ollama(OllamaBackend::new(host, config))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        match self {
            AIClient::Ollama(b) => AIClient::Ollama(b.with_model(model)),
            AIClient::OpenAICompatible(b) => AIClient::OpenAICompatible(b.with_model(model)),
            AIClient::Mock(b) => AIClient::Mock(b.with_model(model)),
        }
    }
}

// Implement AIBackend for AIClient by delegating to the inner backend
#[async_trait]
impl AIBackend for AIClient {
    async fn extract_itinerary(&self, text: &str) -> Result<Vec<ExtractedStop>> {
        match self {
            AIClient::Ollama(b) => b.extract_itinerary(text).await,
            AIClient::OpenAICompatible(b) => b.extract_itinerary(text).await,
            AIClient::Mock(b) => b.extract_itinerary(text).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::Ollama(b) => b.health_check().await,
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::Ollama(b) => b.model(),
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::Ollama(b) => b.host(),
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }

    fn info(&self) -> BackendInfo {
        match self {
            AIClient::Ollama(b) => b.info(),
            AIClient::OpenAICompatible(b) => b.info(),
            AIClient::Mock(b) => b.info(),
        }
    }
}

/// Extract, validate and normalize an itinerary from free text
///
/// Records without a country are dropped; surviving ones get fresh ids and
/// canonical country names.
pub async fn parse_itinerary<B>(
    backend: &B,
    text: &str,
    normalizer: &NameNormalizer,
) -> Result<Vec<ItineraryEntry>>
where
    B: AIBackend + ?Sized,
{
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::InvalidData("Itinerary text is empty".into()));
    }

    let stops = backend.extract_itinerary(text).await?;
    debug!(records = stops.len(), model = backend.model(), "Extraction finished");
    Ok(from_extracted(stops, normalizer))
}

/// Rendered extraction prompt
pub(crate) struct ExtractionPrompt {
    pub system: Option<String>,
    pub user: String,
}

/// Render the itinerary prompt for `text`
pub(crate) fn render_extraction_prompt(
    prompts: &RwLock<PromptLibrary>,
    text: &str,
    reference_year: i32,
) -> Result<ExtractionPrompt> {
    let mut prompts = prompts
        .write()
        .map_err(|_| Error::InvalidData("Failed to acquire prompt library lock".into()))?;
    let template = prompts.get(PromptId::ParseItinerary)?;

    let year = reference_year.to_string();
    let mut vars = HashMap::new();
    vars.insert("text", text);
    vars.insert("reference_year", year.as_str());

    Ok(ExtractionPrompt {
        system: template.render_system(&vars),
        user: template.render_user(&vars),
    })
}

/// Run `attempt` until it succeeds or `max_retries` extra attempts are spent
pub(crate) async fn with_retries<T, F, Fut>(max_retries: u32, mut attempt: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut tries = 0;
    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) if tries < max_retries => {
                tries += 1;
                warn!("Extraction attempt {} failed, retrying: {}", tries, e);
            }
            Err(e) => return Err(e),
        }
    }
}
