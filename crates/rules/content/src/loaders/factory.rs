//! Content factory loading everything a session needs from a data directory.

use std::path::{Path, PathBuf};

use rules_core::{ActorSource, RulesConfig};

use crate::loaders::{ActorLoader, ConfigLoader, EncounterLoader, EncounterSpec, LoadResult};

/// Content factory that loads rules content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── rules.toml      (optional, defaults otherwise)
/// ├── actors.ron      (catalog)
/// ├── actors/         (optional, one actor per file)
/// └── encounter.ron   (optional)
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load automation settings from `rules.toml`, or the defaults.
    pub fn load_config(&self) -> LoadResult<RulesConfig> {
        let path = self.data_dir.join("rules.toml");
        if path.exists() {
            ConfigLoader::load(&path)
        } else {
            Ok(RulesConfig::default())
        }
    }

    /// Load `actors.ron` followed by every file under `actors/`.
    pub fn load_actors(&self) -> LoadResult<Vec<ActorSource>> {
        let mut actors = Vec::new();
        let catalog = self.data_dir.join("actors.ron");
        if catalog.exists() {
            actors.extend(ActorLoader::load(&catalog)?);
        }
        let dir = self.data_dir.join("actors");
        if dir.is_dir() {
            for actor in ActorLoader::load_dir(&dir)? {
                if actors.iter().any(|a| a.id == actor.id) {
                    anyhow::bail!("Duplicate actor id '{}' in {}", actor.id, dir.display());
                }
                actors.push(actor);
            }
        }
        Ok(actors)
    }

    /// Load `encounter.ron` if present.
    pub fn load_encounter(&self) -> LoadResult<Option<EncounterSpec>> {
        let path = self.data_dir.join("encounter.ron");
        if path.exists() {
            EncounterLoader::load(&path).map(Some)
        } else {
            Ok(None)
        }
    }
}
