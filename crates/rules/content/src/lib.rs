//! Data-driven content loaders for the rules engine.
//!
//! Actor documents are authored in RON and automation settings in TOML:
//! - Actor catalogs (`actors.ron`, or one file per actor in `actors/`)
//! - Rules configuration (`rules.toml`)
//! - Encounter scenarios (`encounter.ron`)
//!
//! All loaders deserialize `rules-core` types directly through its `serde`
//! feature and report failures with `anyhow` context.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ActorLoader, CombatantSpec, ConfigLoader, ContentFactory, EncounterLoader, EncounterSpec};
