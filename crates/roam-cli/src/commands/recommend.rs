//! Recommendation command and result output

use anyhow::{bail, Result};
use roam_core::itinerary::parse_date;
use roam_core::{ItineraryEntry, MatchedOption, Recommendation, ReferenceData, RoamingOption};

/// Parse a `COUNTRY[:START[:END]]` stop argument
pub fn parse_stop(arg: &str) -> Result<ItineraryEntry> {
    let mut parts = arg.splitn(3, ':').map(str::trim);
    let country = parts.next().unwrap_or_default();
    if country.is_empty() {
        bail!("Stop '{}' has no country", arg);
    }

    let start = parts.next().unwrap_or_default();
    let end = parts.next().unwrap_or_default();
    for date in [start, end] {
        if !date.is_empty() && parse_date(date).is_none() {
            bail!("Invalid date '{}' in stop '{}' (expected DD/MM/YYYY)", date, arg);
        }
    }

    Ok(ItineraryEntry::new(country, start, end))
}

pub fn cmd_recommend(data: &ReferenceData, stops: &[String], json: bool) -> Result<()> {
    let mut entries = stops
        .iter()
        .map(|s| parse_stop(s))
        .collect::<Result<Vec<_>>>()?;
    for entry in &mut entries {
        entry.country = data.normalizer.normalize(&entry.country);
    }

    let result = data.engine().recommend(&entries);

    if json {
        println!("{}", recommendation_json(&entries, &result)?);
    } else {
        print_itinerary(data, &entries);
        print_recommendation(&result);
    }

    Ok(())
}

/// `{ itinerary, recommendation }` as pretty JSON
pub fn recommendation_json(
    entries: &[ItineraryEntry],
    result: &Recommendation<'_>,
) -> Result<String> {
    Ok(serde_json::to_string_pretty(&serde_json::json!({
        "itinerary": entries,
        "recommendation": result,
    }))?)
}

pub fn print_itinerary(data: &ReferenceData, entries: &[ItineraryEntry]) {
    println!("🧳 Itinerary ({} stops)", entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        let category = data
            .directory
            .get(&entry.country)
            .map(|c| format!("{} · {}", c.display_code, c.category))
            .unwrap_or_else(|| "❓ unknown country".to_string());

        let mut line = format!("   {}. {} ({})", idx + 1, entry.country, category);
        let range = entry.date_range();
        if !range.is_empty() {
            line.push_str(&format!("  {}", range));
        }
        if let Some(days) = entry.stay_days() {
            line.push_str(&format!(" [{} giorni]", days));
        }
        println!("{}", line);
    }
    println!();
}

pub fn print_recommendation(result: &Recommendation<'_>) {
    if let Some(ref base) = result.base_coverage {
        println!("🇪🇺 EU coverage");
        print_matched(base);
        println!();
    }

    if result.recommended.is_empty() {
        if result.base_coverage.is_none() {
            println!("🤷 No option covers this itinerary.");
            println!();
        }
    } else {
        println!("📶 Options");
        for matched in &result.recommended {
            print_matched(matched);
        }
        println!();
    }

    if !result.unmatched_countries.is_empty() {
        println!(
            "⚠️  Unknown countries (not matched): {}",
            result.unmatched_countries.join(", ")
        );
        println!("   Run 'roam countries' to see the known names.");
        println!();
    }

    if !result.special.is_empty() {
        println!("🚢 Special options");
        for option in &result.special {
            print_option_line("  ", option);
        }
    }
}

fn print_matched(matched: &MatchedOption<'_>) {
    let marker = if matched.is_recommended { "⭐" } else { "  " };
    print_option_line(marker, matched.option);
    println!(
        "      covers: {}",
        matched.covered_itinerary_countries.join(", ")
    );
}

fn print_option_line(marker: &str, option: &RoamingOption) {
    println!(
        "   {} {:<45} {:>10} / {:<9} [{}]",
        marker,
        option.name,
        option.cost,
        option.cost_unit.as_str(),
        option.plan_kind.as_str()
    );
}
