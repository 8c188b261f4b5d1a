//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use clap::Parser;
use roam_core::{ExtractedStop, MockBackend, ReferenceData};
use tempfile::TempDir;

use crate::cli::{Cli, Commands, PromptsAction};
use crate::commands::{self, truncate};

fn reference() -> ReferenceData {
    ReferenceData::embedded().unwrap()
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_parse_recommend_args() {
    let cli = Cli::try_parse_from([
        "roam",
        "recommend",
        "--stop",
        "Cina:26/10/2025:09/11/2025",
        "-s",
        "Filippine",
        "--json",
    ])
    .unwrap();

    match cli.command {
        Commands::Recommend { stops, json } => {
            assert_eq!(stops, vec!["Cina:26/10/2025:09/11/2025", "Filippine"]);
            assert!(json);
        }
        _ => panic!("expected recommend"),
    }
}

#[test]
fn test_recommend_requires_a_stop() {
    assert!(Cli::try_parse_from(["roam", "recommend"]).is_err());
}

#[test]
fn test_parse_text_and_file_conflict() {
    assert!(Cli::try_parse_from(["roam", "parse", "Cina", "--file", "trip.txt"]).is_err());
}

#[test]
fn test_global_data_dir() {
    let cli = Cli::try_parse_from(["roam", "catalog", "--data-dir", "/tmp/roam", "-v"]).unwrap();
    assert_eq!(cli.data_dir.as_deref(), Some(std::path::Path::new("/tmp/roam")));
    assert!(cli.verbose);
}

#[test]
fn test_parse_model_override() {
    let cli = Cli::try_parse_from(["roam", "parse", "Cina", "--model", "llama3.2"]).unwrap();
    match cli.command {
        Commands::Parse { text, model, .. } => {
            assert_eq!(text.as_deref(), Some("Cina"));
            assert_eq!(model.as_deref(), Some("llama3.2"));
        }
        _ => panic!("expected parse"),
    }
}

#[test]
fn test_prompts_default_action() {
    let cli = Cli::try_parse_from(["roam", "prompts"]).unwrap();
    assert!(matches!(cli.command, Commands::Prompts { action: None }));

    let cli = Cli::try_parse_from(["roam", "prompts", "show", "parse_itinerary"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Prompts {
            action: Some(PromptsAction::Show { .. })
        }
    ));
}

// ========== Recommend Command Tests ==========

#[test]
fn test_cmd_recommend() {
    let data = reference();
    let stops = vec!["Cina:26/10/2025:09/11/2025".to_string(), "usa".to_string()];
    assert!(commands::cmd_recommend(&data, &stops, false).is_ok());
    assert!(commands::cmd_recommend(&data, &stops, true).is_ok());
}

#[test]
fn test_cmd_recommend_bad_date() {
    let data = reference();
    let stops = vec!["Cina:31/02/2025".to_string()];
    assert!(commands::cmd_recommend(&data, &stops, false).is_err());
}

#[test]
fn test_recommendation_json_shape() {
    let data = reference();
    let entries = vec![commands::parse_stop("Francia").unwrap()];
    let result = data.engine().recommend(&entries);

    let json: serde_json::Value =
        serde_json::from_str(&commands::recommendation_json(&entries, &result).unwrap()).unwrap();
    assert_eq!(json["itinerary"][0]["country"], "Francia");
    assert_eq!(
        json["recommendation"]["base_coverage"]["covered_itinerary_countries"][0],
        "Francia"
    );
}

// ========== Parse Command Tests ==========

#[tokio::test]
async fn test_run_parse_with_mock_backend() {
    let data = reference();
    let backend = MockBackend::new();
    assert!(commands::run_parse(&data, &backend, "Cina, Filippine", false)
        .await
        .is_ok());
    assert!(commands::run_parse(&data, &backend, "Cina", true).await.is_ok());
}

#[tokio::test]
async fn test_run_parse_no_destinations() {
    let data = reference();
    let backend = MockBackend::with_stops(vec![ExtractedStop::default()]);
    assert!(commands::run_parse(&data, &backend, "ciao", false).await.is_ok());
}

#[tokio::test]
async fn test_run_parse_backend_failure() {
    let data = reference();
    let backend = MockBackend::failing("model offline");
    let err = commands::run_parse(&data, &backend, "Cina", false)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("extraction failed"));
}

#[tokio::test]
async fn test_cmd_parse_requires_input() {
    let data = reference();
    assert!(commands::cmd_parse(&data, None, None, None, false).await.is_err());
}

#[tokio::test]
async fn test_cmd_parse_missing_file() {
    let data = reference();
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.txt");
    let err = commands::cmd_parse(&data, None, Some(&missing), None, false)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Failed to read"));
}

// ========== Reference Command Tests ==========

#[test]
fn test_cmd_catalog() {
    let data = reference();
    assert!(commands::cmd_catalog(&data, false).is_ok());
    assert!(commands::cmd_catalog(&data, true).is_ok());
}

#[test]
fn test_cmd_countries() {
    let data = reference();
    assert!(commands::cmd_countries(&data, None, false).is_ok());
    assert!(commands::cmd_countries(&data, Some("top16"), true).is_ok());
    assert!(commands::cmd_countries(&data, Some("MARS"), false).is_err());
}

#[test]
fn test_cmd_normalize() {
    let data = reference();
    let names = vec!["USA".to_string(), "Atlantide".to_string()];
    assert!(commands::cmd_normalize(&data, &names).is_ok());
}

#[test]
fn test_load_reference_with_override_dir() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("countries.toml"),
        r#"
countries = [
    { name = "Cina", category = "TOP16", display_code = "CN" },
]
"#,
    )
    .unwrap();

    let data = commands::load_reference(Some(dir.path())).unwrap();
    assert_eq!(data.directory.len(), 1);
    // options fall back to the built-in catalog
    assert!(!data.catalog.is_empty());
}

#[test]
fn test_load_reference_invalid_override() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("options.toml"), "not = [valid").unwrap();

    let err = commands::load_reference(Some(dir.path())).unwrap_err();
    assert!(err.to_string().contains("reference data"));
}

// ========== Prompts Command Tests ==========

#[test]
fn test_cmd_prompts_show() {
    assert!(commands::cmd_prompts_show("parse_itinerary").is_ok());

    // unknown ids list the available ones and fail
    let err = commands::cmd_prompts_show("nope").unwrap_err();
    assert!(err.to_string().contains("nope"));
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a longer description", 10), "a longe...");
    assert_eq!(truncate("città del vaticano", 8), "città...");
}
