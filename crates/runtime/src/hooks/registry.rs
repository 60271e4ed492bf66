//! Hook registry for managing and executing start-of-turn hooks.

use std::sync::Arc;

use rules_core::ActorChanges;
use tracing::{debug, error};

use super::{ExpiredEffectHook, HookContext, HookCriticality, HookError, RuleElementHook, TurnStartHook};

/// Registry that executes start-of-turn hooks in priority order.
pub struct HookRegistry {
    hooks: Arc<[Arc<dyn TurnStartHook>]>,
}

impl HookRegistry {
    /// Creates a registry; hooks are sorted by priority (lower values first).
    pub fn new(mut hooks: Vec<Arc<dyn TurnStartHook>>) -> Self {
        hooks.sort_by_key(|h| h.priority());
        Self { hooks: hooks.into() }
    }

    /// Creates a registry with the default set of hooks.
    ///
    /// - RuleElementHook: rule element `on_turn_start` callbacks
    /// - ExpiredEffectHook: deletes expired effects when removal is automated
    pub fn default_hooks() -> Self {
        Self::new(vec![
            Arc::new(RuleElementHook) as Arc<dyn TurnStartHook>,
            Arc::new(ExpiredEffectHook) as Arc<dyn TurnStartHook>,
        ])
    }

    /// Evaluates every triggered hook and merges their requests.
    ///
    /// Failures are handled by criticality: a critical failure aborts and is
    /// returned, the others are logged and skipped.
    pub fn execute_hooks(&self, ctx: &HookContext<'_>) -> Result<Option<ActorChanges>, HookError> {
        let mut merged = ActorChanges::default();
        for hook in self.hooks.iter() {
            if !hook.should_trigger(ctx) {
                continue;
            }
            match hook.on_turn_start(ctx) {
                Ok(Some(changes)) => {
                    debug!(
                        target: "runtime::hooks",
                        hook = hook.name(),
                        actor = %ctx.actor.id(),
                        "hook requested changes"
                    );
                    merged.merge(changes);
                }
                Ok(None) => {}
                Err(e) => self.handle_hook_error(hook.as_ref(), e)?,
            }
        }
        Ok((!merged.is_empty()).then_some(merged))
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Returns an iterator over hook names and priorities (for debugging).
    pub fn hooks(&self) -> impl Iterator<Item = (&'static str, i32)> + '_ {
        self.hooks.iter().map(|h| (h.name(), h.priority()))
    }

    fn handle_hook_error(&self, hook: &dyn TurnStartHook, error: HookError) -> Result<(), HookError> {
        match hook.criticality() {
            HookCriticality::Critical => {
                error!(
                    target: "runtime::hooks",
                    hook = hook.name(),
                    criticality = "critical",
                    error = %error,
                    "Critical hook failed, aborting turn start"
                );
                Err(error)
            }
            HookCriticality::Important => {
                error!(
                    target: "runtime::hooks",
                    hook = hook.name(),
                    criticality = "important",
                    error = %error,
                    "Hook failed, continuing"
                );
                Ok(())
            }
            HookCriticality::Optional => {
                debug!(
                    target: "runtime::hooks",
                    hook = hook.name(),
                    criticality = "optional",
                    error = %error,
                    "Optional hook failed"
                );
                Ok(())
            }
        }
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::default_hooks()
    }
}
