//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `shared` - Shared utilities (load_reference)
//! - `recommend` - Manual itinerary recommendation and result output
//! - `parse` - Free-text itinerary extraction
//! - `reference` - Catalog, country and name normalization commands
//! - `prompts` - Prompt library management commands
//! - `serve` - Web server command

pub mod parse;
pub mod prompts;
pub mod recommend;
pub mod reference;
pub mod serve;
pub mod shared;

// Re-export command functions for main.rs
pub use parse::*;
pub use prompts::*;
pub use recommend::*;
pub use reference::*;
pub use serve::*;
pub use shared::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
