//! Coverage resolution
//!
//! Decides whether a single option applies to a single canonical country.

use crate::directory::CountryDirectory;
use crate::models::{OptionCoverageRule, RoamingOption};

/// Answers "does this option cover this country?" against a directory
#[derive(Debug, Clone, Copy)]
pub struct CoverageResolver<'a> {
    directory: &'a CountryDirectory,
}

impl<'a> CoverageResolver<'a> {
    pub fn new(directory: &'a CountryDirectory) -> Self {
        Self { directory }
    }

    /// Whether `option` covers the canonical `country`
    ///
    /// Countries missing from the directory are never covered, even by an
    /// explicit country list.
    pub fn covers(&self, option: &RoamingOption, country: &str) -> bool {
        let Some(category) = self.directory.category_of(country) else {
            return false;
        };

        match &option.coverage {
            OptionCoverageRule::ByCountryList { countries } => countries.contains(country),
            OptionCoverageRule::ByCategory { category: rule } => rule.contains(category),
            OptionCoverageRule::Special => false,
        }
    }

    /// Countries from `countries` covered by `option`, preserving input order
    pub fn covered<'c, I>(&self, option: &RoamingOption, countries: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'c String>,
    {
        countries
            .into_iter()
            .filter(|country| self.covers(option, country))
            .cloned()
            .collect()
    }
}
