//! Inputs of a preparation pass that do not belong to the actor.
use crate::config::RulesConfig;
use crate::encounter::Encounter;
use crate::users::UserInfo;

/// World state a preparation pass reads.
///
/// Passing it explicitly keeps a pass a pure function of
/// `(actor source, context)`.
#[derive(Clone, Copy, Debug)]
pub struct PrepareContext<'a> {
    /// Monotonic world clock in seconds.
    pub world_time: i64,
    pub combat: Option<&'a Encounter>,
    pub users: &'a [UserInfo],
    pub settings: &'a RulesConfig,
}

static DEFAULT_SETTINGS: RulesConfig = RulesConfig::new();

impl<'a> PrepareContext<'a> {
    pub fn new(settings: &'a RulesConfig) -> Self {
        Self {
            world_time: 0,
            combat: None,
            users: &[],
            settings,
        }
    }

    #[must_use]
    pub fn at(mut self, world_time: i64) -> Self {
        self.world_time = world_time;
        self
    }

    #[must_use]
    pub fn in_combat(mut self, combat: &'a Encounter) -> Self {
        self.combat = Some(combat);
        self
    }

    #[must_use]
    pub fn with_users(mut self, users: &'a [UserInfo]) -> Self {
        self.users = users;
        self
    }

    /// Encounter that is running, if any.
    pub fn active_combat(&self) -> Option<&'a Encounter> {
        self.combat.filter(|c| c.active && c.started)
    }
}

impl Default for PrepareContext<'_> {
    fn default() -> Self {
        Self::new(&DEFAULT_SETTINGS)
    }
}
