//! Option catalog
//!
//! The list of roaming plans a customer can add, plus the fixed template
//! describing the allowance already included for EU travel. Entries are
//! immutable once loaded; matching only ever borrows them.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::models::{PlanKind, RoamingOption};

#[derive(Debug, Clone)]
pub struct OptionCatalog {
    options: Vec<RoamingOption>,
    base_coverage: RoamingOption,
}

impl OptionCatalog {
    /// Build a catalog
    ///
    /// Option ids must be unique (the base coverage template included) and
    /// the template must be of kind `base`.
    pub fn new(options: Vec<RoamingOption>, base_coverage: RoamingOption) -> Result<Self> {
        if base_coverage.plan_kind != PlanKind::Base {
            return Err(Error::InvalidData(format!(
                "Base coverage template '{}' must have plan kind 'base', found '{}'",
                base_coverage.id, base_coverage.plan_kind
            )));
        }

        let mut seen = HashSet::with_capacity(options.len() + 1);
        seen.insert(base_coverage.id.as_str());
        for option in &options {
            if option.id.trim().is_empty() {
                return Err(Error::InvalidData(format!(
                    "Option '{}' has an empty id",
                    option.name
                )));
            }
            if !seen.insert(option.id.as_str()) {
                return Err(Error::InvalidData(format!(
                    "Duplicate option id in catalog: {}",
                    option.id
                )));
            }
        }

        Ok(Self {
            options,
            base_coverage,
        })
    }

    /// All catalog entries in catalog order
    pub fn options(&self) -> &[RoamingOption] {
        &self.options
    }

    /// Template for the synthetic EU base-coverage entry
    pub fn base_coverage(&self) -> &RoamingOption {
        &self.base_coverage
    }

    pub fn get(&self, id: &str) -> Option<&RoamingOption> {
        if self.base_coverage.id == id {
            return Some(&self.base_coverage);
        }
        self.options.iter().find(|o| o.id == id)
    }

    /// Options that take part in itinerary matching (neither base nor special)
    pub fn matchable(&self) -> impl Iterator<Item = &RoamingOption> {
        self.options.iter().filter(|o| o.plan_kind.is_matchable())
    }

    /// Usage-based options, shown regardless of the itinerary
    pub fn special(&self) -> Vec<&RoamingOption> {
        self.options
            .iter()
            .filter(|o| o.plan_kind == PlanKind::Special)
            .collect()
    }

    /// Browse view: every catalog entry except usage-based ones
    pub fn browsable(&self) -> Vec<&RoamingOption> {
        self.options
            .iter()
            .filter(|o| o.plan_kind != PlanKind::Special)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CostUnit, CoverageCategory, IncludedServices, OptionCoverageRule};

    fn option(id: &str, plan_kind: PlanKind, coverage: OptionCoverageRule) -> RoamingOption {
        RoamingOption {
            id: id.to_string(),
            name: id.to_uppercase(),
            plan_kind,
            cost: "€1".to_string(),
            cost_unit: CostUnit::Month,
            description: String::new(),
            included_services: IncludedServices::default(),
            coverage,
            notes: None,
        }
    }

    fn base() -> RoamingOption {
        option(
            "eu-base",
            PlanKind::Base,
            OptionCoverageRule::ByCategory {
                category: CoverageCategory::Eu,
            },
        )
    }

    #[test]
    fn test_views() {
        let catalog = OptionCatalog::new(
            vec![
                option("home", PlanKind::Base, OptionCoverageRule::Special),
                option(
                    "month-usa",
                    PlanKind::Monthly,
                    OptionCoverageRule::ByCategory {
                        category: CoverageCategory::Usa,
                    },
                ),
                option("ship", PlanKind::Special, OptionCoverageRule::Special),
            ],
            base(),
        )
        .unwrap();

        let matchable: Vec<&str> = catalog.matchable().map(|o| o.id.as_str()).collect();
        assert_eq!(matchable, vec!["month-usa"]);

        let special: Vec<&str> = catalog.special().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(special, vec!["ship"]);

        let browse: Vec<&str> = catalog.browsable().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(browse, vec!["home", "month-usa"]);

        assert_eq!(catalog.get("eu-base").unwrap().plan_kind, PlanKind::Base);
        assert!(catalog.get("missing").is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = OptionCatalog::new(
            vec![
                option("a", PlanKind::Daily, OptionCoverageRule::Special),
                option("a", PlanKind::Weekly, OptionCoverageRule::Special),
            ],
            base(),
        );
        assert!(result.is_err());

        let result = OptionCatalog::new(
            vec![option("eu-base", PlanKind::Daily, OptionCoverageRule::Special)],
            base(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_template_must_be_base_kind() {
        let result = OptionCatalog::new(
            vec![],
            option("eu-base", PlanKind::Monthly, OptionCoverageRule::Special),
        );
        assert!(result.unwrap_err().to_string().contains("plan kind"));
    }
}
