//! Encounter scenario loader.

use std::path::Path;

use serde::Deserialize;

use rules_core::encounter::{Combatant, InitiativeUpdate};
use rules_core::{ActorId, CombatantId};

use crate::loaders::{LoadResult, parse_ron, read_file};

/// One combatant of a scenario.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CombatantSpec {
    pub id: CombatantId,
    pub actor: ActorId,
    #[serde(default)]
    pub initiative: Option<i32>,
    /// Override priority for the rolled initiative.
    #[serde(default)]
    pub priority: Option<i32>,
}

impl CombatantSpec {
    pub fn to_combatant(&self) -> Combatant {
        let combatant = Combatant::new(self.id.clone(), self.actor.clone());
        match (self.initiative, self.priority) {
            (Some(initiative), Some(priority)) => combatant
                .with_initiative(initiative)
                .with_override(initiative, priority),
            (Some(initiative), None) => combatant.with_initiative(initiative),
            (None, _) => combatant,
        }
    }

    pub fn initiative_update(&self) -> Option<InitiativeUpdate> {
        let initiative = self.initiative?;
        let update = InitiativeUpdate::new(self.id.clone(), initiative);
        Some(match self.priority {
            Some(priority) => update.with_priority(priority),
            None => update,
        })
    }
}

/// Encounter scenario: starting clock and combatants.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EncounterSpec {
    pub world_time: i64,
    pub combatants: Vec<CombatantSpec>,
}

impl EncounterSpec {
    pub fn combatants(&self) -> Vec<Combatant> {
        self.combatants.iter().map(CombatantSpec::to_combatant).collect()
    }
}

/// Loader for encounter scenarios from RON files.
pub struct EncounterLoader;

impl EncounterLoader {
    pub fn load(path: &Path) -> LoadResult<EncounterSpec> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<EncounterSpec> {
        let spec: EncounterSpec = parse_ron(content, "encounter")?;
        let mut ids: Vec<&CombatantId> = spec.combatants.iter().map(|c| &c.id).collect();
        ids.sort();
        if let Some(pair) = ids.windows(2).find(|pair| pair[0] == pair[1]) {
            anyhow::bail!("Duplicate combatant id '{}'", pair[0]);
        }
        Ok(spec)
    }
}
