//! Reference data handlers: countries, catalog browse view, name normalization

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState};
use roam_core::{Country, CoverageCategory, RoamingOption};

/// Maximum number of names accepted by the normalize endpoint
const MAX_NORMALIZE_NAMES: usize = 500;

/// Query parameters for the country list
#[derive(Debug, Deserialize)]
pub struct CountriesQuery {
    /// Only countries of this category (e.g. TOP16)
    pub category: Option<String>,
}

/// GET /api/countries - Country directory sorted by name
pub async fn list_countries(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CountriesQuery>,
) -> Result<Json<Vec<Country>>, AppError> {
    let category = params
        .category
        .as_deref()
        .map(|c| c.parse::<CoverageCategory>())
        .transpose()
        .map_err(|e| AppError::bad_request(&e))?;

    let countries = state
        .reference
        .directory
        .sorted_by_name()
        .into_iter()
        .filter(|c| category.map_or(true, |cat| c.category == cat))
        .cloned()
        .collect();

    Ok(Json(countries))
}

/// GET /api/catalog - Browse view (every option except usage-based ones)
pub async fn list_catalog(State(state): State<Arc<AppState>>) -> Json<Vec<RoamingOption>> {
    Json(
        state
            .reference
            .catalog
            .browsable()
            .into_iter()
            .cloned()
            .collect(),
    )
}

/// GET /api/catalog/:id - A single catalog entry
pub async fn get_option(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RoamingOption>, AppError> {
    state
        .reference
        .catalog
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found(&format!("Option '{}' not found", id)))
}

#[derive(Debug, Deserialize)]
pub struct NormalizeRequest {
    pub names: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct NormalizedName {
    pub input: String,
    pub name: String,
    /// Whether the name resolved to a directory country
    pub known: bool,
}

/// POST /api/normalize - Canonical names for free-form country names
pub async fn normalize_names(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NormalizeRequest>,
) -> Result<Json<Vec<NormalizedName>>, AppError> {
    if request.names.len() > MAX_NORMALIZE_NAMES {
        return Err(AppError::bad_request(&format!(
            "Too many names (max {})",
            MAX_NORMALIZE_NAMES
        )));
    }

    let normalizer = &state.reference.normalizer;
    let results = request
        .names
        .into_iter()
        .map(|input| {
            let name = normalizer.normalize(&input);
            let known = state.reference.directory.contains(&name);
            NormalizedName { input, name, known }
        })
        .collect();

    Ok(Json(results))
}
