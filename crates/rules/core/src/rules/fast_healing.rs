//! `FastHealing`: restores hit points when the owner starts its turn.
use crate::actor::{ActorPatch, PreparedActor};

use super::{
    InjectionScope, RuleBase, RuleBehavior, RuleElementSource, RuleKind, RuleValue, ValidationError,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FastHealingRule {
    pub value: i32,
}

impl FastHealingRule {
    pub fn construct(
        source: &RuleElementSource,
        scope: &InjectionScope<'_>,
    ) -> Result<RuleKind, ValidationError> {
        let value = match &source.value {
            Some(RuleValue::Number(value)) => Some(*value),
            Some(RuleValue::Text(text)) => scope.resolve(text)?.trim().parse().ok(),
            _ => None,
        };
        match value {
            Some(value) if value > 0 => Ok(RuleKind::FastHealing(Self { value })),
            _ => Err(ValidationError::field("value", "must be a positive number")),
        }
    }
}

impl RuleBehavior for FastHealingRule {
    fn on_turn_start(&self, base: &RuleBase, actor: &PreparedActor) -> Option<ActorPatch> {
        let hp = actor.source.hp;
        if hp.value >= hp.max || !base.test(&actor.options.option_set(&[])) {
            return None;
        }
        Some(ActorPatch::hit_points((hp.value + self.value).min(hp.max)))
    }
}
