//! Free-text itinerary extraction command

use std::path::Path;

use anyhow::{bail, Context, Result};
use roam_core::{parse_itinerary, AIBackend, AIClient, ReferenceData};

use super::{print_itinerary, print_recommendation, recommendation_json};

pub async fn cmd_parse(
    data: &ReferenceData,
    text: Option<&str>,
    file: Option<&Path>,
    model: Option<&str>,
    json: bool,
) -> Result<()> {
    let text = match (text, file) {
        (Some(text), _) => text.to_string(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => bail!("Provide the travel description as an argument or with --file"),
    };

    let Some(client) = AIClient::from_env() else {
        eprintln!("⚠️  No extraction backend configured.");
        eprintln!();
        eprintln!("To enable free-text itineraries:");
        eprintln!("  1. Start Ollama: ollama serve");
        eprintln!("  2. Set environment variable: export OLLAMA_HOST=http://localhost:11434");
        eprintln!("  Or try it offline with: AI_BACKEND=mock roam parse \"Cina, Filippine\"");
        bail!("Itinerary extraction is not configured");
    };

    let client = match model {
        Some(model) => client.with_model(model),
        None => client,
    };

    run_parse(data, &client, &text, json).await
}

/// Extract with `backend`, then print the itinerary and its recommendation
pub async fn run_parse<B>(data: &ReferenceData, backend: &B, text: &str, json: bool) -> Result<()>
where
    B: AIBackend + ?Sized,
{
    if !json {
        println!(
            "🤖 Extracting itinerary with {} ({})...",
            backend.model(),
            backend.host()
        );
    }

    let entries = parse_itinerary(backend, text, &data.normalizer)
        .await
        .context("Itinerary extraction failed")?;
    let result = data.engine().recommend(&entries);

    if json {
        println!("{}", recommendation_json(&entries, &result)?);
        return Ok(());
    }

    println!();
    if entries.is_empty() {
        println!("🤷 No destination found in the text.");
        return Ok(());
    }
    print_itinerary(data, &entries);
    print_recommendation(&result);

    Ok(())
}
