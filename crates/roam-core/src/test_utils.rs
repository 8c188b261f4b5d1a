//! Test utilities for roam-core
//!
//! A mock model server speaking both the Ollama generate API and the
//! OpenAI-compatible chat API, for development and integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Json, State},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::oneshot;

/// Destinations the mock recognizes, as (keyword, reported country)
const KNOWN_DESTINATIONS: &[(&str, &str)] = &[
    ("cina", "Cina"),
    ("shanghai", "Cina"),
    ("filippine", "Filippine"),
    ("manila", "Filippine"),
    ("giappone", "Giappone"),
    ("tokyo", "Giappone"),
    ("stati uniti", "Stati Uniti"),
    ("usa", "USA"),
    ("new york", "Stati Uniti"),
    ("londra", "Regno Unito"),
    ("francia", "Francia"),
    ("parigi", "Francia"),
    ("spagna", "Spagna"),
    ("brasile", "Brasile"),
    ("argentina", "Argentina"),
    ("cuba", "Cuba"),
];

#[derive(Clone, Default)]
struct MockState {
    /// Raw model output returned for every request instead of the heuristic
    canned: Option<String>,
}

/// Mock model server for testing and development
pub struct MockOllamaServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockOllamaServer {
    /// Start the mock server on an available port
    ///
    /// Answers with a JSON array of the known destinations mentioned in the
    /// text, in order of appearance, or with prose when there are none.
    pub async fn start() -> Self {
        Self::start_with_state(MockState::default()).await
    }

    /// Start a server that returns `response` verbatim as model output
    pub async fn start_with_response(response: &str) -> Self {
        Self::start_with_state(MockState {
            canned: Some(response.to_string()),
        })
        .await
    }

    async fn start_with_state(state: MockState) -> Self {
        let app = Router::new()
            .route("/api/tags", get(handle_tags))
            .route("/api/generate", post(handle_generate))
            .route("/v1/models", get(handle_models))
            .route("/v1/chat/completions", post(handle_chat))
            .with_state(Arc::new(state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockOllamaServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_tags() -> Json<serde_json::Value> {
    Json(json!({
        "models": [{
            "name": "gemma3:latest",
            "modified_at": "2025-01-01T00:00:00Z",
            "size": 3_300_000_000u64
        }]
    }))
}

async fn handle_models() -> Json<serde_json::Value> {
    Json(json!({
        "object": "list",
        "data": [{"id": "mock-model", "object": "model"}]
    }))
}

async fn handle_generate(
    State(state): State<Arc<MockState>>,
    Json(request): Json<GenerateRequest>,
) -> Json<GenerateResponse> {
    Json(GenerateResponse {
        response: model_output(&state, &request.prompt),
        model: request.model,
        done: true,
    })
}

async fn handle_chat(
    State(state): State<Arc<MockState>>,
    Json(request): Json<ChatRequest>,
) -> Json<serde_json::Value> {
    let user = request
        .messages
        .iter()
        .rev()
        .find(|m| m.role == "user")
        .map(|m| m.content.as_str())
        .unwrap_or_default();

    Json(json!({
        "model": request.model,
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": model_output(&state, user)}
        }]
    }))
}

fn model_output(state: &MockState, prompt: &str) -> String {
    if let Some(ref canned) = state.canned {
        return canned.clone();
    }

    let text = travel_text(prompt).to_lowercase();
    let mut found: Vec<(usize, &str)> = KNOWN_DESTINATIONS
        .iter()
        .filter_map(|(keyword, country)| text.find(keyword).map(|pos| (pos, *country)))
        .collect();
    found.sort_by_key(|(pos, _)| *pos);

    let mut countries: Vec<&str> = Vec::new();
    for (_, country) in found {
        if !countries.contains(&country) {
            countries.push(country);
        }
    }

    if countries.is_empty() {
        return "I could not find any destination in the text.".to_string();
    }

    let stops: Vec<serde_json::Value> = countries
        .into_iter()
        .map(|c| json!({"country": c, "startDate": "", "endDate": ""}))
        .collect();
    serde_json::Value::Array(stops).to_string()
}

/// The traveller's text inside the rendered prompt (`Text: "..."`)
fn travel_text(prompt: &str) -> &str {
    match prompt.find("Text: \"") {
        Some(start) => {
            let rest = &prompt[start + 7..];
            match rest.rfind('"') {
                Some(end) => &rest[..end],
                None => rest,
            }
        }
        None => prompt,
    }
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
}

#[derive(Debug, Serialize)]
struct GenerateResponse {
    model: String,
    response: String,
    done: bool,
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}
