//! Content loaders for reading rules data from files.
//!
//! Actors and encounters are RON documents, automation settings are TOML.

pub mod actors;
pub mod config;
pub mod encounter;
pub mod factory;

pub use actors::ActorLoader;
pub use config::ConfigLoader;
pub use encounter::{CombatantSpec, EncounterLoader, EncounterSpec};
pub use factory::ContentFactory;

use std::path::Path;

use serde::de::DeserializeOwned;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Reads a whole file, naming it in the error.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Parses a RON document; `what` names the document kind in the error.
pub(crate) fn parse_ron<T: DeserializeOwned>(content: &str, what: &str) -> LoadResult<T> {
    ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse {} RON: {}", what, e))
}
