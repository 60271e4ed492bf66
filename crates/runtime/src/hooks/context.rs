//! Execution context provided to hooks during evaluation.

use rules_core::encounter::Combatant;
use rules_core::{PreparedActor, RulesConfig};

/// Context provided to start-of-turn hooks.
///
/// Bundles the freshly prepared actor whose turn begins with the encounter
/// state hooks may consult, without exposing the runtime itself.
pub struct HookContext<'a> {
    /// Actor of the combatant starting its turn, prepared for this turn.
    pub actor: &'a PreparedActor,

    pub combatant: &'a Combatant,

    pub round: u32,

    pub world_time: i64,

    pub settings: &'a RulesConfig,
}
