//! Roam Core Library
//!
//! Shared functionality for the roaming add-on advisor:
//! - Country directory and option catalog (embedded reference data)
//! - Country name normalization with an alias table
//! - Coverage resolution and the recommendation engine
//! - Itinerary entries and manual editing
//! - Pluggable itinerary extraction backends (Ollama, OpenAI-compatible, mock)
//! - Prompt library for customizable extraction prompts

pub mod ai;
pub mod catalog;
pub mod config;
pub mod coverage;
pub mod directory;
pub mod error;
pub mod itinerary;
pub mod models;
pub mod normalize;
pub mod prompts;
pub mod recommend;
pub mod reference;

/// Test utilities including mock Ollama server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{
    parse_itinerary, AIBackend, AIClient, BackendInfo, BackendKind, MockBackend, OllamaBackend,
    OpenAICompatibleBackend,
};
pub use catalog::OptionCatalog;
pub use config::ExtractionConfig;
pub use coverage::CoverageResolver;
pub use directory::CountryDirectory;
pub use error::{Error, Result};
pub use itinerary::{ExtractedStop, Itinerary, ItineraryEntry, StopField};
pub use models::{
    CostUnit, Country, CoverageCategory, IncludedServices, OptionCoverageRule, PlanKind,
    RoamingOption,
};
pub use normalize::NameNormalizer;
pub use prompts::{Prompt, PromptId, PromptInfo, PromptLibrary};
pub use recommend::{MatchedOption, Recommendation, RecommendationEngine};
pub use reference::ReferenceData;
