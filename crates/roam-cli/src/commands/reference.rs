//! Catalog, country directory and name normalization commands

use anyhow::{anyhow, Result};
use roam_core::{CoverageCategory, OptionCoverageRule, ReferenceData, RoamingOption};

use super::truncate;

/// Show the browse view of the catalog
pub fn cmd_catalog(data: &ReferenceData, json: bool) -> Result<()> {
    let options = data.catalog.browsable();

    if json {
        println!("{}", serde_json::to_string_pretty(&options)?);
        return Ok(());
    }

    println!("📚 Option catalog ({} options)\n", options.len());
    println!(
        "{:<22} {:<8} {:>10} {:<10} {:<20} {}",
        "ID", "KIND", "COST", "PER", "COVERAGE", "DESCRIPTION"
    );
    println!("{}", "-".repeat(110));

    for option in options {
        println!(
            "{:<22} {:<8} {:>10} {:<10} {:<20} {}",
            option.id,
            option.plan_kind.as_str(),
            option.cost,
            option.cost_unit.as_str(),
            coverage_label(option),
            truncate(&option.description, 40)
        );
    }

    println!();
    println!("Usage-based options (always offered):");
    for option in data.catalog.special() {
        println!("   🚢 {} - {}", option.name, option.cost);
    }

    Ok(())
}

fn coverage_label(option: &RoamingOption) -> String {
    match &option.coverage {
        OptionCoverageRule::ByCategory { category } => category.to_string(),
        OptionCoverageRule::ByCountryList { countries } => {
            truncate(&countries.iter().cloned().collect::<Vec<_>>().join(", "), 20)
        }
        OptionCoverageRule::Special => "special".to_string(),
    }
}

/// List known countries, optionally filtered by category
pub fn cmd_countries(data: &ReferenceData, category: Option<&str>, json: bool) -> Result<()> {
    let category = category
        .map(|c| c.parse::<CoverageCategory>())
        .transpose()
        .map_err(|e| anyhow!(e))?;

    let countries: Vec<_> = data
        .directory
        .sorted_by_name()
        .into_iter()
        .filter(|c| category.map_or(true, |cat| c.category == cat))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&countries)?);
        return Ok(());
    }

    match category {
        Some(cat) => println!("🌍 Countries in {} ({})\n", cat, countries.len()),
        None => println!("🌍 Known countries ({})\n", countries.len()),
    }
    for country in &countries {
        println!(
            "   {:<4} {:<28} {}",
            country.display_code, country.name, country.category
        );
    }

    Ok(())
}

/// Print the canonical name of each input
pub fn cmd_normalize(data: &ReferenceData, names: &[String]) -> Result<()> {
    for name in names {
        let canonical = data.normalizer.normalize(name);
        if data.directory.contains(&canonical) {
            println!("  \"{}\" → {}", name, canonical);
        } else {
            println!("  \"{}\" → ❓ not a known country", name);
        }
    }

    Ok(())
}
