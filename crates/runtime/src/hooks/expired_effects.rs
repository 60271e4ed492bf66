//! Hook deleting the acting actor's expired effects at the start of its turn.

use rules_core::ActorChanges;

use super::{HookContext, HookCriticality, HookError, TurnStartHook};

/// Deletes expired effects when automatic removal is enabled.
#[derive(Debug, Clone, Copy)]
pub struct ExpiredEffectHook;

impl TurnStartHook for ExpiredEffectHook {
    fn name(&self) -> &'static str {
        "expired_effects"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn criticality(&self) -> HookCriticality {
        HookCriticality::Optional
    }

    fn should_trigger(&self, ctx: &HookContext<'_>) -> bool {
        ctx.settings.remove_expired_effects
    }

    fn on_turn_start(&self, ctx: &HookContext<'_>) -> Result<Option<ActorChanges>, HookError> {
        let delete_items: Vec<_> = ctx
            .actor
            .effects
            .iter()
            .filter(|effect| effect.remaining.expired)
            .map(|effect| effect.item.clone())
            .collect();
        if delete_items.is_empty() {
            return Ok(None);
        }
        Ok(Some(ActorChanges {
            delete_items,
            ..ActorChanges::default()
        }))
    }
}
