//! Country name normalization
//!
//! Maps free-form names ("usa", " FRANCIA ", "England") to canonical
//! directory entries. Unknown names pass through untouched; they simply fail
//! to match anything later on.

use std::collections::HashMap;

use crate::directory::CountryDirectory;
use crate::error::{Error, Result};

/// Immutable lookup from case-insensitive name or alias to canonical name
#[derive(Debug, Clone)]
pub struct NameNormalizer {
    lookup: HashMap<String, String>,
}

impl NameNormalizer {
    /// Build the lookup from every directory name plus an alias table
    ///
    /// Directory names must be distinct ignoring case. Alias targets must be
    /// canonical directory names, and an alias may not shadow a different
    /// country's name.
    pub fn new<'a, I>(directory: &CountryDirectory, aliases: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut lookup: HashMap<String, String> = HashMap::new();
        for country in directory.countries() {
            if let Some(existing) = lookup.insert(lookup_key(&country.name), country.name.clone()) {
                return Err(Error::InvalidData(format!(
                    "Country '{}' differs from '{}' only by case",
                    country.name, existing
                )));
            }
        }

        for (alias, target) in aliases {
            if !directory.contains(target) {
                return Err(Error::InvalidData(format!(
                    "Alias '{}' points to unknown country '{}'",
                    alias, target
                )));
            }
            let key = lookup_key(alias);
            match lookup.get(&key) {
                Some(existing) if existing != target => {
                    return Err(Error::InvalidData(format!(
                        "Alias '{}' conflicts with country '{}'",
                        alias, existing
                    )));
                }
                _ => {
                    lookup.insert(key, target.to_string());
                }
            }
        }

        Ok(Self { lookup })
    }

    /// Canonical name for `raw`, or `raw` unchanged when it is unknown
    pub fn normalize(&self, raw: &str) -> String {
        match self.canonical(raw) {
            Some(name) => name.to_string(),
            None => raw.to_string(),
        }
    }

    /// Canonical name for `raw` if it is a known name or alias
    pub fn canonical(&self, raw: &str) -> Option<&str> {
        self.lookup.get(&lookup_key(raw)).map(String::as_str)
    }

    /// Number of lookup keys (names and aliases)
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }
}

fn lookup_key(name: &str) -> String {
    name.trim().to_lowercase()
}
