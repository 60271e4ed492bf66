//! Hook running the `on_turn_start` callbacks of rule elements.

use rules_core::ActorChanges;

use super::{HookContext, HookCriticality, HookError, TurnStartHook};

/// Collects the start-of-turn updates of every rule element on the actor
/// (fast healing and the like) into one write.
#[derive(Debug, Clone, Copy)]
pub struct RuleElementHook;

impl TurnStartHook for RuleElementHook {
    fn name(&self) -> &'static str {
        "rule_elements"
    }

    fn priority(&self) -> i32 {
        -10
    }

    fn should_trigger(&self, ctx: &HookContext<'_>) -> bool {
        !ctx.actor.rules.is_empty()
    }

    fn criticality(&self) -> HookCriticality {
        HookCriticality::Important
    }

    fn on_turn_start(&self, ctx: &HookContext<'_>) -> Result<Option<ActorChanges>, HookError> {
        Ok(ctx.actor.turn_start_updates().map(ActorChanges::from_patch))
    }
}
