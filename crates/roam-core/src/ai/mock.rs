//! Mock backend for testing
//!
//! Useful for unit tests and offline demos without a running model server.
//! By default every comma, semicolon or newline separated chunk of the input
//! text is treated as one destination without dates.

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::itinerary::ExtractedStop;

use super::types::{BackendInfo, BackendKind};
use super::AIBackend;

#[derive(Clone, Debug)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    model: String,
    /// Records returned regardless of the input text
    fixed: Option<Vec<ExtractedStop>>,
    /// Error message returned by every extraction
    failure: Option<String>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            model: "mock".to_string(),
            fixed: None,
            failure: None,
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    /// Always answer with `stops`
    pub fn with_stops(stops: Vec<ExtractedStop>) -> Self {
        Self {
            fixed: Some(stops),
            ..Self::new()
        }
    }

    /// Fail every extraction with `Error::Extraction(message)`
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::new()
        }
    }

    pub fn with_model(&self, model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..self.clone()
        }
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn extract_itinerary(&self, text: &str) -> Result<Vec<ExtractedStop>> {
        if let Some(ref message) = self.failure {
            return Err(Error::Extraction(message.clone()));
        }
        if let Some(ref stops) = self.fixed {
            return Ok(stops.clone());
        }

        Ok(text
            .split([',', ';', '\n'])
            .map(str::trim)
            .filter(|chunk| !chunk.is_empty())
            .map(|chunk| ExtractedStop {
                country: Some(chunk.to_string()),
                start_date: None,
                end_date: None,
            })
            .collect())
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }

    fn info(&self) -> BackendInfo {
        BackendInfo {
            kind: BackendKind::Mock,
            model: self.model.clone(),
            host: self.host().to_string(),
            max_retries: 0,
            timeout_secs: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_splits_text() {
        let backend = MockBackend::new();
        let stops = backend
            .extract_itinerary("Cina, Filippine;\nGiappone,, ")
            .await
            .unwrap();
        let countries: Vec<_> = stops.iter().filter_map(|s| s.country.as_deref()).collect();
        assert_eq!(countries, vec!["Cina", "Filippine", "Giappone"]);
    }

    #[tokio::test]
    async fn test_mock_fixed_stops() {
        let backend = MockBackend::with_stops(vec![ExtractedStop {
            country: Some("Brasile".to_string()),
            start_date: Some("01/02/2025".to_string()),
            end_date: None,
        }]);
        let stops = backend.extract_itinerary("anything").await.unwrap();
        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].start_date.as_deref(), Some("01/02/2025"));
    }

    #[tokio::test]
    async fn test_mock_failing_and_health() {
        let backend = MockBackend::failing("boom");
        assert!(backend.extract_itinerary("Cina").await.is_err());
        assert!(backend.health_check().await);
        assert!(!MockBackend::unhealthy().health_check().await);
    }

    #[test]
    fn test_with_model() {
        let backend = MockBackend::new().with_model("tiny");
        assert_eq!(backend.model(), "tiny");
        assert_eq!(backend.info().model, "tiny");
    }
}
