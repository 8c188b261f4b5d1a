//! Roam CLI - Roaming add-on advisor
//!
//! Usage:
//!   roam recommend --stop Cina --stop Filippine   Recommend options for stops
//!   roam parse "Shanghai e poi Manila"            Extract an itinerary, then recommend
//!   roam catalog                                  Browse the option catalog
//!   roam serve --port 3000                        Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let data_dir = cli.data_dir.as_deref();

    match cli.command {
        Commands::Recommend { stops, json } => {
            let data = commands::load_reference(data_dir)?;
            commands::cmd_recommend(&data, &stops, json)
        }
        Commands::Parse {
            text,
            file,
            model,
            json,
        } => {
            let data = commands::load_reference(data_dir)?;
            commands::cmd_parse(
                &data,
                text.as_deref(),
                file.as_deref(),
                model.as_deref(),
                json,
            )
            .await
        }
        Commands::Catalog { json } => {
            let data = commands::load_reference(data_dir)?;
            commands::cmd_catalog(&data, json)
        }
        Commands::Countries { category, json } => {
            let data = commands::load_reference(data_dir)?;
            commands::cmd_countries(&data, category.as_deref(), json)
        }
        Commands::Normalize { names } => {
            let data = commands::load_reference(data_dir)?;
            commands::cmd_normalize(&data, &names)
        }
        Commands::Prompts { action } => match action {
            None | Some(PromptsAction::List) => commands::cmd_prompts_list(),
            Some(PromptsAction::Show { prompt_id }) => commands::cmd_prompts_show(&prompt_id),
            Some(PromptsAction::Path) => commands::cmd_prompts_path(),
        },
        Commands::Serve {
            port,
            host,
            static_dir,
        } => commands::cmd_serve(data_dir, &host, port, static_dir.as_deref()).await,
    }
}
