//! Itinerary entries and the boundary with extracted records
//!
//! Entries are what the engine consumes. They arrive either from manual
//! editing (blank stop, then field updates) or from the extraction service,
//! whose records are validated here before they become entries.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::normalize::NameNormalizer;

/// Date format used for every itinerary date string
pub const DATE_FORMAT: &str = "%d/%m/%Y";

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Allocate an id unique for the lifetime of the process
///
/// Never returns an id passed to [`reserve_id`].
pub fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Keep `id` out of future [`next_id`] allocations
pub fn reserve_id(id: u64) {
    NEXT_ID.fetch_max(id.saturating_add(1), Ordering::Relaxed);
}

fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let id = u64::deserialize(deserializer)?;
    reserve_id(id);
    Ok(id)
}

/// One stop of a trip
///
/// `country` may be empty or not yet canonical; dates are carried through
/// as `DD/MM/YYYY` strings and never affect matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryEntry {
    /// Allocated on deserialization when absent, reserved when present
    #[serde(default = "next_id", deserialize_with = "deserialize_id")]
    pub id: u64,
    #[serde(default)]
    pub country: String,
    #[serde(default, alias = "startDate")]
    pub start_date: String,
    #[serde(default, alias = "endDate")]
    pub end_date: String,
}

impl ItineraryEntry {
    /// New entry with a freshly allocated id
    pub fn new(
        country: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            id: next_id(),
            country: country.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }

    /// Entry with a fresh id and every field empty
    pub fn blank() -> Self {
        Self::new("", "", "")
    }

    pub fn start(&self) -> Option<NaiveDate> {
        parse_date(&self.start_date)
    }

    pub fn end(&self) -> Option<NaiveDate> {
        parse_date(&self.end_date)
    }

    /// Number of calendar days of the stay, both ends included
    ///
    /// `None` when either date is missing, malformed, or the range is reversed.
    pub fn stay_days(&self) -> Option<i64> {
        let (start, end) = (self.start()?, self.end()?);
        if end < start {
            return None;
        }
        Some((end - start).num_days() + 1)
    }

    /// Human-readable date range ("26/10/2025 - 09/11/2025"), empty if no dates
    pub fn date_range(&self) -> String {
        match (self.start_date.is_empty(), self.end_date.is_empty()) {
            (true, true) => String::new(),
            (false, true) => format!("dal {}", self.start_date),
            (true, false) => format!("fino al {}", self.end_date),
            (false, false) => format!("{} - {}", self.start_date, self.end_date),
        }
    }
}

/// Parse a `DD/MM/YYYY` date, `None` if empty or malformed
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// A record as returned by the extraction service
///
/// `country` is required; records without one are dropped when converting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedStop {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default, alias = "startDate")]
    pub start_date: Option<String>,
    #[serde(default, alias = "endDate")]
    pub end_date: Option<String>,
}

/// Turn extracted records into entries
///
/// Country names are normalized, missing dates become empty strings and
/// every surviving record gets a fresh id. Records without a country are
/// dropped with a warning.
pub fn from_extracted(stops: Vec<ExtractedStop>, normalizer: &NameNormalizer) -> Vec<ItineraryEntry> {
    let total = stops.len();
    let entries: Vec<ItineraryEntry> = stops
        .into_iter()
        .enumerate()
        .filter_map(|(idx, stop)| {
            let country = match stop.country.as_deref().map(str::trim) {
                Some(c) if !c.is_empty() => normalizer.normalize(c),
                _ => {
                    warn!("Dropping extracted record #{} without a country", idx + 1);
                    return None;
                }
            };

            let start_date = stop.start_date.unwrap_or_default();
            let end_date = stop.end_date.unwrap_or_default();
            for date in [&start_date, &end_date] {
                if !date.is_empty() && parse_date(date).is_none() {
                    warn!("Extracted date '{}' for {} is not DD/MM/YYYY", date, country);
                }
            }

            Some(ItineraryEntry::new(country, start_date, end_date))
        })
        .collect();

    debug!("Converted {} of {} extracted records", entries.len(), total);
    entries
}

/// Editable field of an itinerary entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopField {
    Country,
    StartDate,
    EndDate,
}

/// Ordered list of stops with the manual editing operations
///
/// Ids are unique within an itinerary; a stop arriving with an id already in
/// use is given a fresh one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ItineraryEntry>", into = "Vec<ItineraryEntry>")]
pub struct Itinerary {
    entries: Vec<ItineraryEntry>,
}

impl Itinerary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ItineraryEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ItineraryEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a stop and return the id it ends up with
    pub fn push(&mut self, mut entry: ItineraryEntry) -> u64 {
        reserve_id(entry.id);
        if self.entries.iter().any(|e| e.id == entry.id) {
            let id = next_id();
            debug!("Stop id {} already in use, renumbered to {}", entry.id, id);
            entry.id = id;
        }
        let id = entry.id;
        self.entries.push(entry);
        id
    }

    /// Append an empty stop and return its id
    pub fn add_blank(&mut self) -> u64 {
        let entry = ItineraryEntry::blank();
        let id = entry.id;
        self.entries.push(entry);
        id
    }

    /// Set one field of the stop with `id`
    pub fn update(&mut self, id: u64, field: StopField, value: impl Into<String>) -> Result<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| Error::NotFound(format!("itinerary stop {}", id)))?;

        let value = value.into();
        match field {
            StopField::Country => entry.country = value,
            StopField::StartDate => entry.start_date = value,
            StopField::EndDate => entry.end_date = value,
        }
        Ok(())
    }

    /// Remove the stop with `id`, returning whether one was removed
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }
}

impl From<Vec<ItineraryEntry>> for Itinerary {
    fn from(entries: Vec<ItineraryEntry>) -> Self {
        let mut itinerary = Self::default();
        for entry in entries {
            itinerary.push(entry);
        }
        itinerary
    }
}

impl From<Itinerary> for Vec<ItineraryEntry> {
    fn from(itinerary: Itinerary) -> Self {
        itinerary.entries
    }
}
