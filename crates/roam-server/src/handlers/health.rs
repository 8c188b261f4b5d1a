//! Service health handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use roam_core::{AIBackend, BackendInfo};

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub countries: usize,
    pub options: usize,
    /// `None` when no extraction backend is configured
    pub extraction: Option<ExtractionStatus>,
}

#[derive(Debug, Serialize)]
pub struct ExtractionStatus {
    #[serde(flatten)]
    pub backend: BackendInfo,
    pub available: bool,
}

/// GET /api/health - Service and extraction backend status
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    let extraction = match state.ai {
        Some(ref client) => Some(ExtractionStatus {
            backend: client.info(),
            available: client.health_check().await,
        }),
        None => None,
    };

    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        countries: state.reference.directory.len(),
        options: state.reference.catalog.len(),
        extraction,
    })
}
