//! Discriminator registry mapping rule element keys to constructors.
use std::collections::BTreeMap;

use crate::config::RulesConfig;

use super::{
    FastHealingRule, FlatModifierRule, InjectionScope, NoteRule, RollOptionRule, RuleBase,
    RuleElement, RuleElementSource, RuleKind, ValidationError,
};

/// Validates a source descriptor and builds the variant payload.
pub type RuleConstructor =
    fn(&RuleElementSource, &InjectionScope<'_>) -> Result<RuleKind, ValidationError>;

#[derive(Clone, Copy)]
struct Registration {
    constructor: RuleConstructor,
    default_priority: i32,
}

/// Maps the `key` of a [`RuleElementSource`] to its constructor.
#[derive(Clone, Default)]
pub struct RuleRegistry {
    entries: BTreeMap<&'static str, Registration>,
}

impl RuleRegistry {
    /// Empty registry. Every key is unknown.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in variant.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(
            "RollOption",
            RulesConfig::ROLL_OPTION_PRIORITY,
            RollOptionRule::construct,
        );
        registry.register(
            "FlatModifier",
            RulesConfig::DEFAULT_RULE_PRIORITY,
            FlatModifierRule::construct,
        );
        registry.register("Note", RulesConfig::DEFAULT_RULE_PRIORITY, NoteRule::construct);
        registry.register(
            "FastHealing",
            RulesConfig::DEFAULT_RULE_PRIORITY,
            FastHealingRule::construct,
        );
        registry
    }

    /// Registers (or replaces) the constructor for `key`.
    pub fn register(&mut self, key: &'static str, default_priority: i32, constructor: RuleConstructor) {
        self.entries.insert(
            key,
            Registration {
                constructor,
                default_priority,
            },
        );
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    /// Instantiates the `index`-th rule element of `scope.item`.
    pub fn instantiate(
        &self,
        source: &RuleElementSource,
        scope: &InjectionScope<'_>,
        index: usize,
    ) -> Result<RuleElement, ValidationError> {
        let registration = self
            .entries
            .get(source.key.as_str())
            .ok_or_else(|| ValidationError::UnknownKey(source.key.clone()))?;

        let predicate = source.predicate.clone().unwrap_or_default();
        if !predicate.is_valid() {
            return Err(ValidationError::InvalidPredicate);
        }

        let kind = (registration.constructor)(source, scope)?;
        let base = RuleBase {
            key: source.key.clone(),
            label: source.label.clone().unwrap_or_else(|| scope.item.name.clone()),
            slug: source.slug.clone(),
            priority: source.priority.unwrap_or(registration.default_priority),
            predicate,
            item: scope.item.id.clone(),
            index,
        };
        Ok(RuleElement { base, kind })
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ActorDetails, ActorSource, ItemData, ItemSource};

    fn scope_fixture() -> (ActorSource, ItemSource) {
        (
            ActorSource::new("a1", "Ezren", ActorDetails::Loot),
            ItemSource::new("i1", "Shield Block", ItemData::Feat),
        )
    }

    #[test]
    fn unknown_key_is_rejected() {
        let (actor, item) = scope_fixture();
        let scope = InjectionScope::new(&actor, &item);
        let result = RuleRegistry::standard().instantiate(&RuleElementSource::new("Aura"), &scope, 0);
        assert_eq!(result, Err(ValidationError::UnknownKey("Aura".to_owned())));
    }

    #[test]
    fn default_priority_and_label() {
        let (actor, item) = scope_fixture();
        let scope = InjectionScope::new(&actor, &item);
        let registry = RuleRegistry::standard();

        let option = registry
            .instantiate(&RuleElementSource::roll_option("all", "raised"), &scope, 0)
            .unwrap();
        assert_eq!(option.priority(), RulesConfig::ROLL_OPTION_PRIORITY);
        assert_eq!(option.base.label, "Shield Block");

        let modifier = registry
            .instantiate(
                &RuleElementSource::flat_modifier("ac", 1).with_priority(10),
                &scope,
                1,
            )
            .unwrap();
        assert_eq!(modifier.priority(), 10);
        assert_eq!(modifier.base.index, 1);
    }

    #[test]
    fn empty_registry_knows_nothing() {
        let registry = RuleRegistry::new();
        assert!(!registry.contains("RollOption"));
        assert_eq!(RuleRegistry::standard().keys().count(), 4);
    }
}
