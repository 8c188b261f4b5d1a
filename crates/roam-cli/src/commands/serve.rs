//! Server command implementation

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use super::load_reference;

pub async fn cmd_serve(
    data_dir: Option<&Path>,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
) -> Result<()> {
    let reference = load_reference(data_dir)?;

    println!("🚀 Starting roaming advisor web server...");
    println!("   Listening: http://{}:{}", host, port);
    println!(
        "   Reference data: {} countries, {} options",
        reference.directory.len(),
        reference.catalog.len()
    );
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let static_dir_str = static_dir
        .map(|p| p.to_str().context("static_dir path must be valid UTF-8"))
        .transpose()?;
    roam_server::serve(Arc::new(reference), host, port, static_dir_str).await?;

    Ok(())
}
