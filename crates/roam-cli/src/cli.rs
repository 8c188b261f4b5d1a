//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Roam - Pick the right roaming add-on for a business trip
#[derive(Parser)]
#[command(name = "roam")]
#[command(about = "Roaming add-on advisor for business travellers", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory with reference data overrides (countries.toml, options.toml)
    ///
    /// Defaults to ROAM_DATA_DIR, then the platform data directory. Files
    /// that are not present there fall back to the built-in data.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Recommend options for a manually entered itinerary
    Recommend {
        /// A stop as COUNTRY[:START[:END]], dates as DD/MM/YYYY (repeatable)
        ///
        /// Example: --stop "Cina:26/10/2025:09/11/2025" --stop Filippine
        #[arg(short, long = "stop", required = true)]
        stops: Vec<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Extract an itinerary from free text, then recommend options
    ///
    /// Needs an extraction backend (set OLLAMA_HOST, or AI_BACKEND=mock).
    Parse {
        /// Travel description, e.g. "Shanghai dal 26/10 al 9/11, poi Manila"
        #[arg(conflicts_with = "file")]
        text: Option<String>,

        /// Read the travel description from a file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Model to use instead of the configured one
        #[arg(short, long)]
        model: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Browse the option catalog (usage-based options excluded)
    Catalog {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List known countries
    Countries {
        /// Only countries of this category: EU, USA, TOP16, ExtraUE_World, Excluded_MondoNew
        #[arg(short, long)]
        category: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the canonical name for country names
    Normalize {
        /// Names to normalize
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Manage extraction prompts
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List all available prompts and their override status
    List,

    /// Show the content of a specific prompt
    Show {
        /// Prompt ID (e.g., parse_itinerary)
        prompt_id: String,
    },

    /// Show the path where prompt overrides should be placed
    Path,
}
