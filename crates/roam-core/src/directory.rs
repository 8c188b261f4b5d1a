//! Country directory
//!
//! Immutable mapping from canonical country name to coverage category and
//! display code. Built once from reference data and shared by reference.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::models::{Country, CoverageCategory};

/// Lookup table of known countries, keyed by canonical name
#[derive(Debug, Clone)]
pub struct CountryDirectory {
    countries: Vec<Country>,
    by_name: HashMap<String, usize>,
}

impl CountryDirectory {
    /// Build a directory, rejecting blank or duplicate names
    pub fn new(countries: Vec<Country>) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(countries.len());

        for (idx, country) in countries.iter().enumerate() {
            if country.name.trim().is_empty() {
                return Err(Error::InvalidData(format!(
                    "Country #{} has an empty name",
                    idx + 1
                )));
            }
            if by_name.insert(country.name.clone(), idx).is_some() {
                return Err(Error::InvalidData(format!(
                    "Duplicate country in directory: {}",
                    country.name
                )));
            }
        }

        Ok(Self { countries, by_name })
    }

    /// Look up a country by its canonical name (exact match)
    pub fn get(&self, name: &str) -> Option<&Country> {
        self.by_name.get(name).map(|&idx| &self.countries[idx])
    }

    /// Category of a canonical country name, `None` if unknown
    pub fn category_of(&self, name: &str) -> Option<CoverageCategory> {
        self.get(name).map(|c| c.category)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Countries in reference-data order
    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    /// Countries sorted by name, as shown in pickers
    pub fn sorted_by_name(&self) -> Vec<&Country> {
        let mut sorted: Vec<&Country> = self.countries.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        sorted
    }

    /// Countries assigned to one category, in reference-data order
    pub fn in_category(&self, category: CoverageCategory) -> Vec<&Country> {
        self.countries
            .iter()
            .filter(|c| c.category == category)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn country(name: &str, category: CoverageCategory, code: &str) -> Country {
        Country {
            name: name.to_string(),
            category,
            display_code: code.to_string(),
        }
    }

    #[test]
    fn test_lookup_is_exact() {
        let directory = CountryDirectory::new(vec![
            country("Francia", CoverageCategory::Eu, "FR"),
            country("Cina", CoverageCategory::Top16, "CN"),
        ])
        .unwrap();

        assert_eq!(directory.category_of("Cina"), Some(CoverageCategory::Top16));
        assert_eq!(directory.category_of("cina"), None);
        assert_eq!(directory.get("Francia").unwrap().display_code, "FR");
        assert!(!directory.contains("Nazione Inventata"));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let result = CountryDirectory::new(vec![
            country("Cina", CoverageCategory::Top16, "CN"),
            country("Cina", CoverageCategory::ExtraUeWorld, "CN"),
        ]);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Duplicate"));
    }

    #[test]
    fn test_blank_name_rejected() {
        let result = CountryDirectory::new(vec![country("  ", CoverageCategory::Eu, "XX")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_sorted_and_filtered_views() {
        let directory = CountryDirectory::new(vec![
            country("Spagna", CoverageCategory::Eu, "ES"),
            country("Cina", CoverageCategory::Top16, "CN"),
            country("Austria", CoverageCategory::Eu, "AT"),
        ])
        .unwrap();

        let names: Vec<&str> = directory
            .sorted_by_name()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Austria", "Cina", "Spagna"]);

        let eu: Vec<&str> = directory
            .in_category(CoverageCategory::Eu)
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(eu, vec!["Spagna", "Austria"]);
        assert_eq!(directory.len(), 3);
    }
}
