//! Event payloads for each topic.

use rules_core::spellcasting::SpellMessage;
use rules_core::{ActorId, CombatantId, ItemId};
use serde::{Deserialize, Serialize};

/// A user-facing notice, identified by a localization key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub key: String,
    pub actor: Option<ActorId>,
    /// Spell or item name interpolated into the notice.
    pub subject: Option<String>,
}

impl Notification {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            actor: None,
            subject: None,
        }
    }

    pub fn for_actor(mut self, actor: &ActorId) -> Self {
        self.actor = Some(actor.clone());
        self
    }

    pub fn about(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellCastEvent {
    pub actor: ActorId,
    pub message: SpellMessage,
}

/// Emitted after every preparation pass the runtime runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorPreparedEvent {
    pub actor: ActorId,
    /// Hex-encoded SHA-256 of the derived state.
    pub fingerprint: String,
    /// Validation warnings raised during the pass.
    pub warnings: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnEvent {
    pub combatant: CombatantId,
    pub actor: ActorId,
    pub round: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectsExpiredEvent {
    pub actor: ActorId,
    pub items: Vec<ItemId>,
    /// Whether the items were deleted rather than only marked expired.
    pub removed: bool,
}
