use std::collections::BTreeMap;

use crate::config::RulesConfig;
use crate::ids::{ActorId, CombatantId};

/// A participant slot in an encounter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: CombatantId,
    pub actor: ActorId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub initiative: Option<i32>,
    /// Tie priority chosen for a specific initiative value.
    #[cfg_attr(feature = "serde", serde(default))]
    pub override_priority: BTreeMap<i32, i32>,
    /// The actor's own tiebreak priority, absent for actors without initiative.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tiebreak_priority: Option<i32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub round_of_last_turn: Option<u32>,
}

impl Combatant {
    pub fn new(id: impl Into<CombatantId>, actor: impl Into<ActorId>) -> Self {
        Self {
            id: id.into(),
            actor: actor.into(),
            initiative: None,
            override_priority: BTreeMap::new(),
            tiebreak_priority: None,
            round_of_last_turn: None,
        }
    }

    #[must_use]
    pub fn with_initiative(mut self, initiative: i32) -> Self {
        self.initiative = Some(initiative);
        self
    }

    #[must_use]
    pub fn with_tiebreak(mut self, priority: i32) -> Self {
        self.tiebreak_priority = Some(priority);
        self
    }

    #[must_use]
    pub fn with_override(mut self, initiative: i32, priority: i32) -> Self {
        self.override_priority.insert(initiative, priority);
        self
    }

    /// Priority used to break an initiative tie; lower acts first.
    pub fn tie_priority(&self) -> i32 {
        self.override_priority
            .get(&self.initiative.unwrap_or(0))
            .copied()
            .or(self.tiebreak_priority)
            .unwrap_or(RulesConfig::DEFAULT_TIEBREAK_PRIORITY)
    }

    pub fn has_rolled(&self) -> bool {
        self.initiative.is_some()
    }
}
