//! Recommendation and itinerary extraction handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{AppError, AppState, MAX_ITINERARY_STOPS, MAX_ITINERARY_TEXT};
use roam_core::{AIBackend, ItineraryEntry};

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    /// Stops in travel order; `id` and dates are optional
    #[serde(default)]
    pub itinerary: Vec<ItineraryEntry>,
}

/// POST /api/recommend - Ranked options for an itinerary
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if request.itinerary.len() > MAX_ITINERARY_STOPS {
        return Err(AppError::bad_request(&format!(
            "Too many stops (max {})",
            MAX_ITINERARY_STOPS
        )));
    }

    let result = state.reference.engine().recommend(&request.itinerary);
    debug!(
        stops = request.itinerary.len(),
        recommended = result.recommended.len(),
        "Recommendation computed"
    );

    Ok(Json(serde_json::to_value(&result)?))
}

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub text: String,
}

/// POST /api/itinerary/parse - Extract an itinerary from free text and recommend
pub async fn parse_itinerary(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ParseRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let client = state.ai.as_ref().ok_or_else(|| {
        AppError::service_unavailable("Itinerary extraction is not configured")
    })?;

    if request.text.len() > MAX_ITINERARY_TEXT {
        return Err(AppError::bad_request(&format!(
            "Text too long (max {} bytes)",
            MAX_ITINERARY_TEXT
        )));
    }

    let entries = roam_core::parse_itinerary(client, &request.text, &state.reference.normalizer)
        .await
        .map_err(AppError::from_core)?;
    info!(
        stops = entries.len(),
        model = client.model(),
        "Itinerary extracted"
    );

    let result = state.reference.engine().recommend(&entries);

    Ok(Json(serde_json::json!({
        "itinerary": entries,
        "recommendation": result,
    })))
}
