//! Reference data loading
//!
//! The country directory, alias table and option catalog ship embedded in the
//! binary. Each file can be replaced by a copy in a data directory.
//!
//! ## Data Resolution
//!
//! For each of `countries.toml` and `options.toml`:
//! 1. `<dir>/<file>` where `<dir>` is the explicit directory, else
//!    `ROAM_DATA_DIR`, else ~/.local/share/roaming-advisor/data
//! 2. Fall back to the embedded default

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::catalog::OptionCatalog;
use crate::config::APP_DIR;
use crate::directory::CountryDirectory;
use crate::error::{Error, Result};
use crate::models::{Country, OptionCoverageRule, RoamingOption};
use crate::normalize::NameNormalizer;
use crate::recommend::RecommendationEngine;

/// Embedded reference data (compiled into binary)
pub mod embedded {
    pub const COUNTRIES: &str = include_str!("../../../data/countries.toml");
    pub const OPTIONS: &str = include_str!("../../../data/options.toml");
}

pub const COUNTRIES_FILE: &str = "countries.toml";
pub const OPTIONS_FILE: &str = "options.toml";

/// Environment variable naming the reference data override directory
pub const DATA_DIR_ENV: &str = "ROAM_DATA_DIR";

/// Immutable reference data, built once and shared by reference
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub directory: CountryDirectory,
    pub catalog: OptionCatalog,
    pub normalizer: NameNormalizer,
}

impl ReferenceData {
    /// Embedded defaults only
    pub fn embedded() -> Result<Self> {
        Self::from_sources(embedded::COUNTRIES, embedded::OPTIONS)
    }

    /// Load with per-file overrides from `data_dir` (see module docs)
    pub fn load(data_dir: Option<&Path>) -> Result<Self> {
        let dir = data_dir.map(Path::to_path_buf).or_else(resolve_data_dir);

        let countries = read_or_embedded(dir.as_deref(), COUNTRIES_FILE, embedded::COUNTRIES)?;
        let options = read_or_embedded(dir.as_deref(), OPTIONS_FILE, embedded::OPTIONS)?;

        let data = Self::from_sources(&countries, &options)?;
        info!(
            countries = data.directory.len(),
            options = data.catalog.len(),
            aliases = data.normalizer.len().saturating_sub(data.directory.len()),
            "Reference data loaded"
        );
        Ok(data)
    }

    /// Build from the TOML text of both files
    pub fn from_sources(countries_toml: &str, options_toml: &str) -> Result<Self> {
        let raw_countries: RawCountries = toml::from_str(countries_toml)?;
        let raw_options: RawOptions = toml::from_str(options_toml)?;

        let directory = CountryDirectory::new(raw_countries.countries)?;
        let normalizer = NameNormalizer::new(
            &directory,
            raw_countries
                .aliases
                .iter()
                .map(|(alias, target)| (alias.as_str(), target.as_str())),
        )?;
        let catalog = OptionCatalog::new(raw_options.options, raw_options.base_coverage)?;

        check_country_lists(&directory, &catalog);

        Ok(Self {
            directory,
            catalog,
            normalizer,
        })
    }

    /// Recommendation engine borrowing this data
    pub fn engine(&self) -> RecommendationEngine<'_> {
        RecommendationEngine::new(&self.directory, &self.catalog, &self.normalizer)
    }
}

/// Default reference data override directory
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join(APP_DIR).join("data"))
}

fn resolve_data_dir() -> Option<PathBuf> {
    match std::env::var(DATA_DIR_ENV) {
        Ok(dir) if !dir.trim().is_empty() => Some(PathBuf::from(dir)),
        _ => default_data_dir(),
    }
}

fn read_or_embedded(dir: Option<&Path>, file: &str, default: &str) -> Result<String> {
    if let Some(path) = dir.map(|d| d.join(file)).filter(|p| p.exists()) {
        debug!("Loading {} from {}", file, path.display());
        return fs::read_to_string(&path).map_err(|e| {
            Error::InvalidData(format!("Failed to read {}: {}", path.display(), e))
        });
    }
    Ok(default.to_string())
}

/// Country-list entries that are not in the directory can never match
fn check_country_lists(directory: &CountryDirectory, catalog: &OptionCatalog) {
    for option in catalog.options() {
        if let OptionCoverageRule::ByCountryList { countries } = &option.coverage {
            for name in countries.iter().filter(|n| !directory.contains(n)) {
                warn!(option = %option.id, country = %name, "Option lists an unknown country");
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawCountries {
    countries: Vec<Country>,
    #[serde(default)]
    aliases: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct RawOptions {
    base_coverage: RoamingOption,
    #[serde(default)]
    options: Vec<RoamingOption>,
}
