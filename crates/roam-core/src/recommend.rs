//! Recommendation engine
//!
//! Given an itinerary, select and rank the roaming options that cover its
//! non-EU destinations. Pure and deterministic: same reference data and same
//! itinerary always give the same ordered result.
//!
//! Ranking, applied as a stable sort so ties keep catalog order:
//! 1. options covering every non-EU destination first
//! 2. plan kind: monthly, then weekly, then daily
//! 3. more covered destinations first

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::catalog::OptionCatalog;
use crate::coverage::CoverageResolver;
use crate::directory::CountryDirectory;
use crate::itinerary::ItineraryEntry;
use crate::models::{CoverageCategory, RoamingOption};
use crate::normalize::NameNormalizer;

/// A catalog option annotated for a specific itinerary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedOption<'a> {
    #[serde(flatten)]
    pub option: &'a RoamingOption,
    /// Itinerary countries this option covers, unique, in first-seen order
    pub covered_itinerary_countries: Vec<String>,
    pub is_recommended: bool,
}

impl MatchedOption<'_> {
    pub fn covered_count(&self) -> usize {
        self.covered_itinerary_countries.len()
    }
}

/// Ranked result for one itinerary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Recommendation<'a> {
    /// Synthetic entry for the EU allowance, present iff an EU country is visited
    pub base_coverage: Option<MatchedOption<'a>>,
    pub recommended: Vec<MatchedOption<'a>>,
    /// Usage-based options, always listed
    pub special: Vec<&'a RoamingOption>,
    /// Normalized names that are not in the directory
    pub unmatched_countries: Vec<String>,
}

impl<'a> Recommendation<'a> {
    /// Whether there is anything to show besides the special options
    pub fn has_results(&self) -> bool {
        self.base_coverage.is_some() || !self.recommended.is_empty()
    }

    /// Options that cover the whole non-EU part of the trip
    pub fn full_matches(&self) -> impl Iterator<Item = &MatchedOption<'a>> {
        self.recommended.iter().filter(|m| m.is_recommended)
    }
}

/// Borrowing view over the reference data that answers recommendation queries
#[derive(Debug, Clone, Copy)]
pub struct RecommendationEngine<'a> {
    directory: &'a CountryDirectory,
    catalog: &'a OptionCatalog,
    normalizer: &'a NameNormalizer,
}

impl<'a> RecommendationEngine<'a> {
    pub fn new(
        directory: &'a CountryDirectory,
        catalog: &'a OptionCatalog,
        normalizer: &'a NameNormalizer,
    ) -> Self {
        Self {
            directory,
            catalog,
            normalizer,
        }
    }

    /// Recommend options for an itinerary
    pub fn recommend(&self, itinerary: &[ItineraryEntry]) -> Recommendation<'a> {
        self.recommend_countries(itinerary.iter().map(|e| e.country.as_str()))
    }

    /// Recommend options for a plain sequence of country names
    pub fn recommend_countries<I, S>(&self, countries: I) -> Recommendation<'a>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let special = self.catalog.special();

        let countries = self.unique_countries(countries);
        if countries.is_empty() {
            debug!("Empty itinerary, nothing to match");
            return Recommendation {
                special,
                ..Default::default()
            };
        }

        let mut eu = Vec::new();
        let mut non_eu = Vec::new();
        let mut unmatched = Vec::new();
        for country in countries {
            match self.directory.category_of(&country) {
                Some(CoverageCategory::Eu) => eu.push(country),
                Some(_) => non_eu.push(country),
                None => unmatched.push(country),
            }
        }
        debug!(
            eu = eu.len(),
            non_eu = non_eu.len(),
            unmatched = unmatched.len(),
            "Partitioned itinerary"
        );

        let base_coverage = (!eu.is_empty()).then(|| MatchedOption {
            option: self.catalog.base_coverage(),
            covered_itinerary_countries: eu,
            is_recommended: true,
        });

        let resolver = CoverageResolver::new(self.directory);
        let mut recommended: Vec<MatchedOption<'a>> = self
            .catalog
            .matchable()
            .filter_map(|option| {
                let covered = resolver.covered(option, &non_eu);
                if covered.is_empty() {
                    return None;
                }
                let is_recommended = covered.len() == non_eu.len();
                Some(MatchedOption {
                    option,
                    covered_itinerary_countries: covered,
                    is_recommended,
                })
            })
            .collect();

        recommended.sort_by(|a, b| {
            b.is_recommended
                .cmp(&a.is_recommended)
                .then_with(|| {
                    a.option
                        .plan_kind
                        .sort_priority()
                        .cmp(&b.option.plan_kind.sort_priority())
                })
                .then_with(|| b.covered_count().cmp(&a.covered_count()))
        });

        Recommendation {
            base_coverage,
            recommended,
            special,
            unmatched_countries: unmatched,
        }
    }

    /// Normalized, non-empty, unique names in first-seen order
    fn unique_countries<I, S>(&self, countries: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        countries
            .into_iter()
            .filter(|c| !c.as_ref().trim().is_empty())
            .map(|c| self.normalizer.normalize(c.as_ref()))
            .filter(|c| seen.insert(c.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Country, CostUnit, IncludedServices, OptionCoverageRule, PlanKind};

    struct Fixture {
        directory: CountryDirectory,
        catalog: OptionCatalog,
        normalizer: NameNormalizer,
    }

    impl Fixture {
        fn engine(&self) -> RecommendationEngine<'_> {
            RecommendationEngine::new(&self.directory, &self.catalog, &self.normalizer)
        }
    }

    fn option(id: &str, plan_kind: PlanKind, coverage: OptionCoverageRule) -> RoamingOption {
        RoamingOption {
            id: id.to_string(),
            name: id.to_string(),
            plan_kind,
            cost: "€1".to_string(),
            cost_unit: CostUnit::Day,
            description: String::new(),
            included_services: IncludedServices::default(),
            coverage,
            notes: None,
        }
    }

    fn category(id: &str, plan_kind: PlanKind, category: CoverageCategory) -> RoamingOption {
        option(id, plan_kind, OptionCoverageRule::ByCategory { category })
    }

    fn fixture() -> Fixture {
        let countries = [
            ("Francia", CoverageCategory::Eu),
            ("Spagna", CoverageCategory::Eu),
            ("Cina", CoverageCategory::Top16),
            ("Filippine", CoverageCategory::Top16),
            ("Stati Uniti", CoverageCategory::Usa),
            ("Argentina", CoverageCategory::ExtraUeWorld),
            ("Cuba", CoverageCategory::ExcludedMondoNew),
        ];
        let directory = CountryDirectory::new(
            countries
                .iter()
                .map(|(name, category)| Country {
                    name: name.to_string(),
                    category: *category,
                    display_code: String::new(),
                })
                .collect(),
        )
        .unwrap();

        let catalog = OptionCatalog::new(
            vec![
                option("home", PlanKind::Base, OptionCoverageRule::Special),
                category("day-world", PlanKind::Daily, CoverageCategory::ExtraUeWorld),
                category("week-top16", PlanKind::Weekly, CoverageCategory::Top16),
                category("month-usa", PlanKind::Monthly, CoverageCategory::Usa),
                category("month-top16", PlanKind::Monthly, CoverageCategory::Top16),
                category("week-world", PlanKind::Weekly, CoverageCategory::ExtraUeWorld),
                option(
                    "day-cina",
                    PlanKind::Daily,
                    OptionCoverageRule::ByCountryList {
                        countries: ["Cina".to_string()].into_iter().collect(),
                    },
                ),
                option("ship", PlanKind::Special, OptionCoverageRule::Special),
                option("plane", PlanKind::Special, OptionCoverageRule::Special),
            ],
            category("eu-base", PlanKind::Base, CoverageCategory::Eu),
        )
        .unwrap();

        let normalizer = NameNormalizer::new(&directory, [("usa", "Stati Uniti")]).unwrap();

        Fixture {
            directory,
            catalog,
            normalizer,
        }
    }

    fn ids<'a>(matched: &'a [MatchedOption<'_>]) -> Vec<&'a str> {
        matched.iter().map(|m| m.option.id.as_str()).collect()
    }

    #[test]
    fn test_empty_itinerary() {
        let fx = fixture();
        let result = fx.engine().recommend(&[]);
        assert!(result.base_coverage.is_none());
        assert!(result.recommended.is_empty());
        assert!(!result.has_results());
        // usage-based options are always offered
        assert_eq!(result.special.len(), 2);

        let blanks = vec![ItineraryEntry::blank(), ItineraryEntry::new("  ", "", "")];
        let result = fx.engine().recommend(&blanks);
        assert!(!result.has_results());
        assert!(result.unmatched_countries.is_empty());
    }

    #[test]
    fn test_eu_only_itinerary() {
        let fx = fixture();
        let result = fx.engine().recommend_countries(["Francia", "Spagna", "Francia"]);

        let base = result.base_coverage.unwrap();
        assert_eq!(base.option.id, "eu-base");
        assert!(base.is_recommended);
        assert_eq!(base.covered_itinerary_countries, vec!["Francia", "Spagna"]);
        assert!(result.recommended.is_empty());
    }

    #[test]
    fn test_full_match_ranking() {
        let fx = fixture();
        let result = fx.engine().recommend_countries(["Cina", "Filippine"]);

        assert!(result.base_coverage.is_none());
        assert_eq!(
            ids(&result.recommended),
            vec!["month-top16", "week-top16", "week-world", "day-world", "day-cina"]
        );
        for matched in &result.recommended[..4] {
            assert!(matched.is_recommended);
            assert_eq!(matched.covered_itinerary_countries, vec!["Cina", "Filippine"]);
        }
        let partial = &result.recommended[4];
        assert!(!partial.is_recommended);
        assert_eq!(partial.covered_itinerary_countries, vec!["Cina"]);
    }

    #[test]
    fn test_partial_matches_not_recommended() {
        let fx = fixture();
        let result = fx.engine().recommend_countries(["Cina", "Stati Uniti"]);

        // world options cover both; narrow ones only one
        assert_eq!(
            ids(&result.recommended),
            vec!["week-world", "day-world", "month-usa", "month-top16", "week-top16", "day-cina"]
        );
        let recommended: Vec<&str> = result.full_matches().map(|m| m.option.id.as_str()).collect();
        assert_eq!(recommended, vec!["week-world", "day-world"]);

        let top16 = result
            .recommended
            .iter()
            .find(|m| m.option.id == "month-top16")
            .unwrap();
        assert!(!top16.is_recommended);
        assert_eq!(top16.covered_itinerary_countries, vec!["Cina"]);
    }

    #[test]
    fn test_partial_sort_by_covered_count() {
        let fx = fixture();
        let result = fx
            .engine()
            .recommend_countries(["Cina", "Filippine", "Stati Uniti", "Cuba"]);

        // nothing covers Cuba, so nothing is a full match
        assert!(result.recommended.iter().all(|m| !m.is_recommended));
        assert_eq!(
            ids(&result.recommended),
            vec!["month-top16", "month-usa", "week-world", "week-top16", "day-world", "day-cina"]
        );
        assert_eq!(result.recommended[2].covered_count(), 3);
    }

    #[test]
    fn test_mixed_eu_and_world() {
        let fx = fixture();
        let result = fx.engine().recommend_countries(["Francia", "Argentina"]);

        let base = result.base_coverage.as_ref().unwrap();
        assert_eq!(base.covered_itinerary_countries, vec!["Francia"]);
        assert_eq!(ids(&result.recommended), vec!["week-world", "day-world"]);
        assert!(result.recommended.iter().all(|m| m.is_recommended));
    }

    #[test]
    fn test_unknown_country_excluded() {
        let fx = fixture();
        let result = fx.engine().recommend_countries(["Nazione Inventata"]);
        assert!(!result.has_results());
        assert_eq!(result.unmatched_countries, vec!["Nazione Inventata"]);

        let with_known = fx.engine().recommend_countries(["Nazione Inventata", "Cina"]);
        let without = fx.engine().recommend_countries(["Cina"]);
        assert_eq!(with_known.recommended, without.recommended);
    }

    #[test]
    fn test_alias_normalized() {
        let fx = fixture();
        let upper = fx.engine().recommend_countries(["USA"]);
        let lower = fx.engine().recommend_countries(["usa"]);
        let canonical = fx.engine().recommend_countries(["Stati Uniti"]);

        assert_eq!(upper, lower);
        assert_eq!(upper, canonical);
        assert_eq!(
            ids(&upper.recommended),
            vec!["month-usa", "week-world", "day-world"]
        );
        assert_eq!(
            upper.recommended[0].covered_itinerary_countries,
            vec!["Stati Uniti"]
        );
    }

    #[test]
    fn test_duplicates_collapse_after_normalization() {
        let fx = fixture();
        let result = fx.engine().recommend_countries(["usa", "Stati Uniti", " USA "]);
        assert_eq!(
            result.recommended[0].covered_itinerary_countries,
            vec!["Stati Uniti"]
        );
    }

    #[test]
    fn test_deterministic() {
        let fx = fixture();
        let itinerary = vec![
            ItineraryEntry::new("Cina", "26/10/2025", "09/11/2025"),
            ItineraryEntry::new("Francia", "", ""),
            ItineraryEntry::new("Stati Uniti", "", ""),
        ];
        let first = fx.engine().recommend(&itinerary);
        for _ in 0..5 {
            assert_eq!(fx.engine().recommend(&itinerary), first);
        }
    }

    #[test]
    fn test_base_and_special_never_matched() {
        let fx = fixture();
        let result = fx
            .engine()
            .recommend_countries(["Cina", "Stati Uniti", "Argentina", "Francia"]);
        assert!(result
            .recommended
            .iter()
            .all(|m| m.option.plan_kind.is_matchable()));
        let special: Vec<&str> = result.special.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(special, vec!["ship", "plane"]);
    }

    #[test]
    fn test_serializes_flattened_option() {
        let fx = fixture();
        let result = fx.engine().recommend_countries(["Cina"]);
        let json = serde_json::to_value(&result).unwrap();

        let first = &json["recommended"][0];
        assert_eq!(first["id"], "month-top16");
        assert_eq!(first["plan_kind"], "monthly");
        assert_eq!(first["is_recommended"], true);
        assert_eq!(first["covered_itinerary_countries"][0], "Cina");
        assert!(json["base_coverage"].is_null());
    }
}
