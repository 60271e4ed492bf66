/// Automation settings and compile-time limits shared by every preparation pass.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RulesConfig {
    /// Delete effects as soon as they expire (and encounter-length effects when
    /// the encounter ends).
    pub remove_expired_effects: bool,

    /// Mark encounter-length effects expired when the encounter ends. Ignored
    /// when `remove_expired_effects` is set.
    pub effect_expiration: bool,

    /// Maximum number of distinct diagnostics retained between two flushes.
    pub diagnostic_capacity: usize,
}

impl RulesConfig {
    // ===== compile-time constants used as type parameters =====
    /// Highest spell level; slot tables hold `MAX_SPELL_LEVEL + 1` levels.
    pub const MAX_SPELL_LEVEL: u8 = 10;
    pub const SLOT_LEVELS: usize = Self::MAX_SPELL_LEVEL as usize + 1;
    /// Upper bound on diagnostics kept by a single sink.
    pub const MAX_DIAGNOSTICS: usize = 32;

    // ===== rules constants =====
    pub const DEFAULT_TIEBREAK_PRIORITY: i32 = 3;
    pub const DEFAULT_RULE_PRIORITY: i32 = 100;
    pub const ROLL_OPTION_PRIORITY: i32 = 50;
    pub const DC_BASE: i32 = 10;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_DIAGNOSTIC_CAPACITY: usize = 16;

    pub const fn new() -> Self {
        Self {
            remove_expired_effects: false,
            effect_expiration: true,
            diagnostic_capacity: Self::DEFAULT_DIAGNOSTIC_CAPACITY,
        }
    }

    #[must_use]
    pub fn with_remove_expired_effects(mut self, enabled: bool) -> Self {
        self.remove_expired_effects = enabled;
        self
    }

    #[must_use]
    pub fn with_effect_expiration(mut self, enabled: bool) -> Self {
        self.effect_expiration = enabled;
        self
    }

    /// Diagnostic capacity clamped to the sink's static bound.
    pub fn diagnostic_capacity(&self) -> usize {
        self.diagnostic_capacity.clamp(1, Self::MAX_DIAGNOSTICS)
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self::new()
    }
}
