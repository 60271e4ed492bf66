//! Actor catalog loader.
//!
//! Loads persisted actor documents (with their items, rule elements and
//! spellcasting entries) from RON files.

use std::collections::BTreeSet;
use std::path::Path;

use rules_core::ActorSource;

use crate::loaders::{LoadResult, parse_ron, read_file};

/// Loader for actor catalogs from RON files.
pub struct ActorLoader;

impl ActorLoader {
    /// Load an actor catalog from a RON file.
    ///
    /// RON format: `Vec<ActorSource>`. Actor ids must be unique.
    pub fn load(path: &Path) -> LoadResult<Vec<ActorSource>> {
        let content = read_file(path)?;
        let actors = Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))?;
        Ok(actors)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<ActorSource>> {
        let actors: Vec<ActorSource> = parse_ron(content, "actor catalog")?;
        ensure_unique(&actors)?;
        Ok(actors)
    }

    /// Load a single actor document.
    pub fn load_one(path: &Path) -> LoadResult<ActorSource> {
        let content = read_file(path)?;
        parse_ron(&content, "actor").map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    /// Load every `*.ron` file of a directory as one actor, in file name order.
    pub fn load_dir(dir: &Path) -> LoadResult<Vec<ActorSource>> {
        let entries = std::fs::read_dir(dir)
            .map_err(|e| anyhow::anyhow!("Failed to read directory {}: {}", dir.display(), e))?;
        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "ron") {
                paths.push(path);
            }
        }
        paths.sort();

        let actors = paths
            .iter()
            .map(|path| Self::load_one(path))
            .collect::<LoadResult<Vec<_>>>()?;
        ensure_unique(&actors)?;
        Ok(actors)
    }
}

fn ensure_unique(actors: &[ActorSource]) -> LoadResult<()> {
    let mut seen = BTreeSet::new();
    for actor in actors {
        if !seen.insert(&actor.id) {
            anyhow::bail!("Duplicate actor id '{}'", actor.id);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rules_core::ActorKind;

    use super::*;

    const GOBLIN: &str = r#"
        (
            id: "goblin",
            name: "Goblin Warrior",
            level: 1,
            traits: ["goblin", "humanoid"],
            hp: (value: 6, max: 6),
            details: Npc((perception: 5, ac: 16)),
            items: [
                (
                    id: "regen",
                    name: "Regeneration",
                    rules: [(key: "FastHealing", value: Some(2))],
                    data: Feat,
                ),
            ],
        )
    "#;

    #[test]
    fn parses_a_catalog() {
        let actors = ActorLoader::parse(&format!("[{GOBLIN}]")).unwrap();
        assert_eq!(actors.len(), 1);
        let goblin = &actors[0];
        assert_eq!(goblin.kind(), ActorKind::Npc);
        assert_eq!(goblin.hp.max, 6);
        assert_eq!(goblin.items[0].rules[0].key, "FastHealing");
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = ActorLoader::parse(&format!("[{GOBLIN}, {GOBLIN}]")).unwrap_err();
        assert!(err.to_string().contains("Duplicate actor id"));
    }
}
