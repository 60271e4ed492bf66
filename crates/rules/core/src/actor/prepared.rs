//! Output of a preparation pass.
use std::collections::BTreeMap;

use crate::effects::RemainingDuration;
use crate::ids::{ActorId, ItemId};
use crate::options::RollOptionRegistry;
use crate::rules::{RollToggle, RuleElement, Synthetics, ToggleError, TogglePlan, ToggleRequest, plan_toggle};
use crate::spellcasting::SpellcastingCollection;
use crate::stats::Statistic;

use super::source::{ActorKind, ActorSource};
use super::update::ActorPatch;

/// Expiry state of one effect item at preparation time.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectState {
    pub item: ItemId,
    pub slug: String,
    pub remaining: RemainingDuration,
    pub from_aura: bool,
}

/// An actor with every derived value of one pass.
///
/// Immutable snapshot: operations that change the actor return update
/// requests against [`PreparedActor::source`] instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedActor {
    /// Persisted data with class features applied.
    pub source: ActorSource,
    pub options: RollOptionRegistry,
    /// Rule elements sorted by priority.
    pub rules: Vec<RuleElement>,
    pub synthetics: Synthetics,
    pub toggles: Vec<RollToggle>,
    pub statistics: BTreeMap<String, Statistic>,
    pub spellcasting: SpellcastingCollection,
    pub effects: Vec<EffectState>,
    /// Effects granted by auras.
    pub auras: Vec<ItemId>,
    pub initiative_tiebreak: Option<i32>,
}

impl PreparedActor {
    pub fn id(&self) -> &ActorId {
        &self.source.id
    }

    pub fn kind(&self) -> ActorKind {
        self.source.kind()
    }

    /// True options over `domains` plus `all`, sorted and de-duplicated.
    pub fn roll_options(&self, domains: &[&str]) -> Vec<String> {
        self.options.get(domains)
    }

    pub fn statistic(&self, slug: &str) -> Option<&Statistic> {
        self.statistics.get(slug)
    }

    pub fn is_expired(&self, item: &ItemId) -> bool {
        self.effects
            .iter()
            .any(|effect| &effect.item == item && effect.remaining.expired)
    }

    /// Lets every rule element adjust the option list of a roll.
    pub fn before_roll(&self, domains: &[&str], roll_options: &mut Vec<String>) {
        for rule in &self.rules {
            rule.before_roll(domains, roll_options, &self.options);
        }
    }

    /// Merged updates of every rule element's start-of-turn hook.
    pub fn turn_start_updates(&self) -> Option<ActorPatch> {
        let mut patch = ActorPatch::default();
        for rule in &self.rules {
            if let Some(update) = rule.on_turn_start(self) {
                patch.merge(update);
            }
        }
        (!patch.is_empty()).then_some(patch)
    }

    /// Finds the persisted change that flips a toggleable roll option.
    pub fn toggle(&self, request: &ToggleRequest) -> Result<Option<TogglePlan>, ToggleError> {
        plan_toggle(self, request)
    }

    /// SHA-256 over the derived state: every roll option, every statistic
    /// total and DC, and every spellcasting entry's attack and DC.
    ///
    /// Two passes over the same source and context produce the same value.
    #[cfg(feature = "serde")]
    pub fn fingerprint(&self) -> [u8; 32] {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();

        if let Ok(bytes) = bincode::serialize(&self.options) {
            hasher.update(&bytes);
        }
        for (slug, statistic) in &self.statistics {
            let summary = (slug, statistic.total(), statistic.dc_value());
            if let Ok(bytes) = bincode::serialize(&summary) {
                hasher.update(&bytes);
            }
        }
        for entry in self.spellcasting.iter() {
            let summary = (entry.id(), entry.attack(), entry.dc());
            if let Ok(bytes) = bincode::serialize(&summary) {
                hasher.update(&bytes);
            }
        }

        hasher.finalize().into()
    }
}
