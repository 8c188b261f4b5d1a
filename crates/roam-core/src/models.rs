//! Domain models for the roaming advisor

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Coverage bucket every known country is assigned to
///
/// The wire names match the catalog data (`"EU"`, `"TOP16"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CoverageCategory {
    #[serde(rename = "EU")]
    Eu,
    #[serde(rename = "USA")]
    Usa,
    #[serde(rename = "TOP16")]
    Top16,
    #[serde(rename = "ExtraUE_World")]
    ExtraUeWorld,
    #[serde(rename = "Excluded_MondoNew")]
    ExcludedMondoNew,
}

impl CoverageCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eu => "EU",
            Self::Usa => "USA",
            Self::Top16 => "TOP16",
            Self::ExtraUeWorld => "ExtraUE_World",
            Self::ExcludedMondoNew => "Excluded_MondoNew",
        }
    }

    /// Get all categories
    pub fn all() -> &'static [CoverageCategory] {
        &[
            Self::Eu,
            Self::Usa,
            Self::Top16,
            Self::ExtraUeWorld,
            Self::ExcludedMondoNew,
        ]
    }

    /// Categories an option tagged with this category covers
    ///
    /// `ExtraUE_World` is the only broad bucket: it also covers `TOP16` and
    /// `USA`. Every other category covers only itself.
    pub fn covered_categories(&self) -> &'static [CoverageCategory] {
        match self {
            Self::ExtraUeWorld => &[Self::ExtraUeWorld, Self::Top16, Self::Usa],
            Self::Eu => &[Self::Eu],
            Self::Usa => &[Self::Usa],
            Self::Top16 => &[Self::Top16],
            Self::ExcludedMondoNew => &[Self::ExcludedMondoNew],
        }
    }

    /// Whether a rule of this category covers a country of `other` category
    pub fn contains(&self, other: CoverageCategory) -> bool {
        self.covered_categories().contains(&other)
    }
}

impl std::str::FromStr for CoverageCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "eu" | "ue" => Ok(Self::Eu),
            "usa" => Ok(Self::Usa),
            "top16" | "top_16" => Ok(Self::Top16),
            "extraue_world" | "extraueworld" | "world" => Ok(Self::ExtraUeWorld),
            "excluded_mondonew" | "excludedmondonew" | "mondonew" => Ok(Self::ExcludedMondoNew),
            _ => Err(format!("Unknown coverage category: {}", s)),
        }
    }
}

impl std::fmt::Display for CoverageCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of roaming plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanKind {
    /// Home allowance, already part of the customer's contract
    Base,
    Monthly,
    Weekly,
    Daily,
    /// Usage-based plans (ships, planes) with no geographic matching
    Special,
}

impl PlanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Monthly => "monthly",
            Self::Weekly => "weekly",
            Self::Daily => "daily",
            Self::Special => "special",
        }
    }

    /// Ranking priority among matched options (lower sorts first)
    pub fn sort_priority(&self) -> u8 {
        match self {
            Self::Monthly => 1,
            Self::Weekly => 2,
            Self::Daily => 3,
            Self::Base | Self::Special => 4,
        }
    }

    /// Whether options of this kind take part in itinerary matching
    pub fn is_matchable(&self) -> bool {
        !matches!(self, Self::Base | Self::Special)
    }
}

impl std::str::FromStr for PlanKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "base" => Ok(Self::Base),
            "monthly" => Ok(Self::Monthly),
            "weekly" => Ok(Self::Weekly),
            "daily" => Ok(Self::Daily),
            "special" => Ok(Self::Special),
            _ => Err(format!("Unknown plan kind: {}", s)),
        }
    }
}

impl std::fmt::Display for PlanKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Billing period a plan's cost refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CostUnit {
    #[serde(rename = "mese")]
    Month,
    #[serde(rename = "settimana")]
    Week,
    #[serde(rename = "giorno")]
    Day,
    #[serde(rename = "consumo")]
    Usage,
}

impl CostUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Month => "mese",
            Self::Week => "settimana",
            Self::Day => "giorno",
            Self::Usage => "consumo",
        }
    }
}

impl std::fmt::Display for CostUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A country in the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// Canonical name, unique across the directory
    pub name: String,
    pub category: CoverageCategory,
    /// Short code shown next to the name (ISO 3166 alpha-2)
    pub display_code: String,
}

/// Which destinations an option applies to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OptionCoverageRule {
    /// Exact, enumerated canonical country names
    #[serde(rename = "countries")]
    ByCountryList { countries: BTreeSet<String> },
    /// Every country whose category is contained in `category`
    #[serde(rename = "category")]
    ByCategory { category: CoverageCategory },
    /// Usage-based, never matched by geography
    Special,
}

/// Allowances bundled in an option, as display text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludedServices {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calls: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calls_originated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calls_received: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub international_calls: Option<String>,
}

impl IncludedServices {
    /// Labelled, non-empty allowances in display order
    pub fn labelled(&self) -> Vec<(&'static str, &str)> {
        [
            ("Chiamate", &self.calls),
            ("Chiamate Originate", &self.calls_originated),
            ("Chiamate Ricevute", &self.calls_received),
            ("Dati", &self.data),
            ("SMS", &self.sms),
            ("Chiamate Internazionali", &self.international_calls),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.as_deref().map(|v| (label, v)))
        .collect()
    }
}

/// A roaming plan from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoamingOption {
    pub id: String,
    pub name: String,
    pub plan_kind: PlanKind,
    /// Price as shown to the customer (e.g. "€10")
    pub cost: String,
    pub cost_unit: CostUnit,
    pub description: String,
    #[serde(default)]
    pub included_services: IncludedServices,
    pub coverage: OptionCoverageRule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_contains_top16_and_usa() {
        assert!(CoverageCategory::ExtraUeWorld.contains(CoverageCategory::Top16));
        assert!(CoverageCategory::ExtraUeWorld.contains(CoverageCategory::Usa));
        assert!(CoverageCategory::ExtraUeWorld.contains(CoverageCategory::ExtraUeWorld));
        assert!(!CoverageCategory::ExtraUeWorld.contains(CoverageCategory::Eu));
        assert!(!CoverageCategory::ExtraUeWorld.contains(CoverageCategory::ExcludedMondoNew));
    }

    #[test]
    fn test_narrow_categories_only_contain_themselves() {
        for category in CoverageCategory::all() {
            if *category == CoverageCategory::ExtraUeWorld {
                continue;
            }
            for other in CoverageCategory::all() {
                assert_eq!(category.contains(*other), category == other);
            }
        }
    }

    #[test]
    fn test_category_wire_names() {
        let json = serde_json::to_string(&CoverageCategory::ExtraUeWorld).unwrap();
        assert_eq!(json, "\"ExtraUE_World\"");
        let parsed: CoverageCategory = serde_json::from_str("\"TOP16\"").unwrap();
        assert_eq!(parsed, CoverageCategory::Top16);
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("top16".parse::<CoverageCategory>().unwrap(), CoverageCategory::Top16);
        assert_eq!(
            "ExtraUE_World".parse::<CoverageCategory>().unwrap(),
            CoverageCategory::ExtraUeWorld
        );
        assert!("mars".parse::<CoverageCategory>().is_err());
    }

    #[test]
    fn test_plan_kind_priority() {
        assert!(PlanKind::Monthly.sort_priority() < PlanKind::Weekly.sort_priority());
        assert!(PlanKind::Weekly.sort_priority() < PlanKind::Daily.sort_priority());
        assert!(!PlanKind::Base.is_matchable());
        assert!(!PlanKind::Special.is_matchable());
        assert!(PlanKind::Daily.is_matchable());
    }

    #[test]
    fn test_coverage_rule_tagged_form() {
        let rule: OptionCoverageRule =
            serde_json::from_str(r#"{"type": "category", "category": "USA"}"#).unwrap();
        assert_eq!(
            rule,
            OptionCoverageRule::ByCategory {
                category: CoverageCategory::Usa
            }
        );

        let rule: OptionCoverageRule = serde_json::from_str(r#"{"type": "special"}"#).unwrap();
        assert_eq!(rule, OptionCoverageRule::Special);
    }

    #[test]
    fn test_included_services_labelled() {
        let services = IncludedServices {
            data: Some("5 GB".to_string()),
            sms: Some("100".to_string()),
            ..Default::default()
        };
        assert_eq!(services.labelled(), vec![("Dati", "5 GB"), ("SMS", "100")]);
    }
}
